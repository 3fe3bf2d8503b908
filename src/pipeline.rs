//! Plugin loading pipeline
//!
//! identifier → resolve → classify → (compile, files only) → load
//!
//! Each stage hands its result to the next as a return value. The pipeline
//! is the only place that applies strict/lenient handling.

use crate::cache::{CacheRoot, CompileCache, CompileOptions};
use crate::classify::{classify, PluginType};
use crate::compiler::{create_compiler, SourceCompiler};
use crate::config::Config;
use crate::error::{PluginError, PluginResult};
use crate::loader::{self, JsonModuleHost, ModuleHost};
use crate::report::{Disposition, ErrorReporter};
use crate::resolve::{FsResolver, ModuleResolver};
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// A successfully loaded plugin
#[derive(Debug, Clone, Serialize)]
pub struct LoadedPlugin {
    /// Identifier as requested
    pub identifier: String,
    /// Absolute path the identifier resolved to
    pub resolved_path: PathBuf,
    pub plugin_type: PluginType,
    /// Compiled artifact, for file plugins
    pub artifact: Option<PathBuf>,
    /// The plugin value
    pub module: Value,
}

/// A resolved and classified identifier, before compilation
#[derive(Debug, Clone)]
pub struct ResolvedPlugin {
    pub resolved_path: PathBuf,
    pub plugin_type: PluginType,
}

/// Loads plugins for one workspace
pub struct PluginLoader {
    resolver: Arc<dyn ModuleResolver>,
    cache: CompileCache,
    host: Arc<dyn ModuleHost>,
}

impl PluginLoader {
    pub fn new(
        resolver: Arc<dyn ModuleResolver>,
        cache: CompileCache,
        host: Arc<dyn ModuleHost>,
    ) -> Self {
        Self {
            resolver,
            cache,
            host,
        }
    }

    /// Build a loader with the default collaborators.
    ///
    /// Path identifiers resolve against `base_dir`; packages and the cache
    /// root live under `workspace_root`.
    pub fn from_config(workspace_root: &Path, base_dir: &Path, config: &Config) -> Self {
        let resolver = Arc::new(FsResolver::new(workspace_root, base_dir, &config.resolve));
        let compiler: Arc<dyn SourceCompiler> = create_compiler(&config.compiler);
        let root = CacheRoot::new(workspace_root, &config.cache.dir_name);
        let options = CompileOptions {
            stage_sources: config.cache.stage_sources,
            reuse_artifacts: config.cache.reuse_artifacts,
            timeout: match config.compiler.timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        };

        Self::new(
            resolver,
            CompileCache::new(root, compiler, options),
            Arc::new(JsonModuleHost),
        )
    }

    pub fn cache(&self) -> &CompileCache {
        &self.cache
    }

    /// Resolve, check readability and classify, without compiling
    pub async fn resolve(&self, identifier: &str) -> PluginResult<ResolvedPlugin> {
        let resolved_path = self.resolver.resolve(identifier).await?;
        check_readable(identifier, &resolved_path).await?;
        let plugin_type = classify(&resolved_path).await;

        Ok(ResolvedPlugin {
            resolved_path,
            plugin_type,
        })
    }

    /// Run the whole pipeline for one identifier
    pub async fn load(&self, identifier: &str) -> PluginResult<LoadedPlugin> {
        info!("Scanning plugin at {}", identifier);

        let ResolvedPlugin {
            resolved_path,
            plugin_type,
        } = self.resolve(identifier).await?;

        let artifact = if plugin_type.needs_compile() {
            Some(self.cache.compile(&resolved_path).await?)
        } else {
            None
        };

        let module = loader::load(
            self.host.as_ref(),
            plugin_type,
            &resolved_path,
            artifact.as_deref(),
        )
        .await?;

        info!("Resolved plugin at {}", resolved_path.display());

        Ok(LoadedPlugin {
            identifier: identifier.to_string(),
            resolved_path,
            plugin_type,
            artifact,
            module,
        })
    }

    /// Load a plugin, reporting failures.
    ///
    /// Returns `Ok(None)` when a failure was reported in lenient mode and
    /// `Err` when strict mode requires the host to stop.
    pub async fn load_plugin(
        &self,
        identifier: &str,
        strict: bool,
    ) -> Result<Option<LoadedPlugin>, PluginError> {
        let reporter = ErrorReporter::new(strict);

        match self.load(identifier).await {
            Ok(plugin) => Ok(Some(plugin)),
            Err(err) => match reporter.report(identifier, &err) {
                Disposition::Continue => Ok(None),
                Disposition::Abort => Err(err),
            },
        }
    }
}

/// Fail early if a resolved path exists but cannot be read.
///
/// Paths with no filesystem entry are left to the classifier.
async fn check_readable(identifier: &str, path: &Path) -> PluginResult<()> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(_) => return Ok(()),
    };

    let result = if metadata.is_dir() {
        tokio::fs::read_dir(path).await.map(|_| ())
    } else if metadata.is_file() {
        tokio::fs::File::open(path).await.map(|_| ())
    } else {
        Ok(())
    };

    result.map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => PluginError::PermissionDenied {
            path: path.to_path_buf(),
            source: e,
        },
        ErrorKind::NotFound => {
            PluginError::not_found(identifier, format!("{} disappeared", path.display()))
        }
        _ => PluginError::io(format!("reading {}", path.display()), e),
    })
}
