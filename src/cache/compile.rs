//! Path-keyed compile cache
//!
//! Compiles a source file into `{cache_root}/{key}` where `key` is derived from
//! the source path. Every successful compile fully replaces the previous
//! artifact; a failed compile leaves it untouched.
//!
//! # Write protocol
//!
//! 1. Compile (optionally from a freshly staged link of the source)
//! 2. Write output to `{key}.{uuid}.tmp` and fsync it
//! 3. Remove the previous artifact, rename the temp file into place
//!
//! Steps 1-3 run under a per-key lock, so concurrent requests for the same
//! source compile one at a time and the last one to finish wins.

use crate::cache::key::CacheKey;
use crate::cache::locks::KeyedLocks;
use crate::cache::root::{CacheRoot, STAGED_MARKER, TEMP_SUFFIX};
use crate::compiler::SourceCompiler;
use crate::error::{CompileErrorKind, PluginError, PluginResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// Options controlling how the compile cache behaves
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Compile from `{key}.local.{ext}` instead of the original file
    pub stage_sources: bool,
    /// Return an existing artifact without recompiling
    pub reuse_artifacts: bool,
    /// Give up on the compiler after this long
    pub timeout: Option<Duration>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            stage_sources: true,
            reuse_artifacts: false,
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

/// Compile cache for file-type plugins
pub struct CompileCache {
    root: CacheRoot,
    compiler: Arc<dyn SourceCompiler>,
    locks: KeyedLocks,
    options: CompileOptions,
}

impl CompileCache {
    pub fn new(root: CacheRoot, compiler: Arc<dyn SourceCompiler>, options: CompileOptions) -> Self {
        Self {
            root,
            compiler,
            locks: KeyedLocks::new(),
            options,
        }
    }

    pub fn root(&self) -> &CacheRoot {
        &self.root
    }

    /// Artifact location for a source path, whether or not it exists yet
    pub fn artifact_path(&self, source: &Path) -> PathBuf {
        self.root.artifact_path(&CacheKey::for_path(source))
    }

    /// Compile `source` and return the path of its artifact
    pub async fn compile(&self, source: &Path) -> PluginResult<PathBuf> {
        let key = CacheKey::for_path(source);
        let target = self.root.artifact_path(&key);

        let _guard = self.locks.lock(&key).await;
        self.root.ensure().await?;

        if self.options.reuse_artifacts && fs::metadata(&target).await.is_ok_and(|m| m.is_file())
        {
            debug!("Reusing artifact {} for {}", target.display(), source.display());
            return Ok(target);
        }

        info!(
            "Compiling plugin {} to {} with {}",
            source.display(),
            target.display(),
            self.compiler.compiler_name()
        );

        let output = if self.options.stage_sources {
            let staged = self.stage_source(source, &key).await?;
            let result = self.run_compiler(&staged).await;
            remove_if_exists(&staged).await.unwrap_or_else(|e| {
                warn!("Failed to remove staged source {}: {}", staged.display(), e);
            });
            result
        } else {
            self.run_compiler(source).await
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                error!("Error compiling {}: {}", source.display(), e);
                return Err(e);
            }
        };

        self.write_artifact(&key, &target, output.as_bytes()).await?;
        Ok(target)
    }

    async fn run_compiler(&self, source: &Path) -> PluginResult<String> {
        match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.compiler.compile(source))
                .await
                .map_err(|_| {
                    PluginError::compile(
                        source,
                        CompileErrorKind::TimedOut,
                        format!("no output after {}s", limit.as_secs_f32()),
                    )
                })?,
            None => self.compiler.compile(source).await,
        }
    }

    /// Link the source into the cache root, replacing any stale copy
    async fn stage_source(&self, source: &Path, key: &CacheKey) -> PluginResult<PathBuf> {
        let extension = source
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let staged = self
            .root
            .path()
            .join(format!("{}{}{}", key, STAGED_MARKER, extension));

        remove_if_exists(&staged).await.map_err(|e| {
            PluginError::io(format!("removing stale staged source {}", staged.display()), e)
        })?;

        if let Err(link_err) = fs::hard_link(source, &staged).await {
            if link_err.kind() == ErrorKind::NotFound {
                return Err(PluginError::compile(
                    source,
                    CompileErrorKind::ModuleNotFound,
                    link_err.to_string(),
                ));
            }
            debug!("Hard link failed ({}), copying {}", link_err, source.display());
            fs::copy(source, &staged).await.map_err(|e| {
                PluginError::io(format!("staging {} for compilation", source.display()), e)
            })?;
        }

        Ok(staged)
    }

    /// Replace the artifact with `contents`, all or nothing
    async fn write_artifact(&self, key: &CacheKey, target: &Path, contents: &[u8]) -> PluginResult<()> {
        let temp_path = self
            .root
            .path()
            .join(format!("{}.{}{}", key, uuid::Uuid::new_v4().simple(), TEMP_SUFFIX));

        if let Err(e) = write_synced(&temp_path, contents).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(PluginError::io(
                format!("writing artifact {}", temp_path.display()),
                e,
            ));
        }

        let replaced = match remove_if_exists(target).await {
            Ok(()) => fs::rename(&temp_path, target).await,
            Err(e) => Err(e),
        };

        if let Err(e) = replaced {
            let _ = fs::remove_file(&temp_path).await;
            return Err(PluginError::io(
                format!("replacing artifact {}", target.display()),
                e,
            ));
        }

        debug!("Wrote {} bytes to {}", contents.len(), target.display());
        Ok(())
    }
}

async fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_all().await
}

async fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
