//! Cache root directory management
//!
//! The cache root is a single directory beneath the workspace root. It is
//! created on first use and holds one artifact per cache key, plus short-lived
//! staged sources and temp files while a compile is in flight.

use crate::cache::key::CacheKey;
use crate::error::{PluginError, PluginResult};
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Suffix of in-flight artifact writes
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

/// Marker of staged source copies
pub(crate) const STAGED_MARKER: &str = ".local";

/// An artifact found in the cache root
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    pub key: CacheKey,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Handle on the cache directory of one workspace
#[derive(Debug, Clone)]
pub struct CacheRoot {
    path: PathBuf,
}

impl CacheRoot {
    /// Cache root `{workspace_root}/{dir_name}`
    pub fn new(workspace_root: &Path, dir_name: &str) -> Self {
        Self {
            path: workspace_root.join(dir_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the artifact for `key` lives
    pub fn artifact_path(&self, key: &CacheKey) -> PathBuf {
        self.path.join(key.as_str())
    }

    /// Make sure the cache root exists and is usable.
    ///
    /// Creation is idempotent: losing a creation race to another caller is
    /// not an error. A missing parent or a permission problem is fatal.
    pub async fn ensure(&self) -> PluginResult<()> {
        if is_writable_dir(&self.path).await {
            return Ok(());
        }

        warn!(
            "Plugin cache directory {} either does not exist or is not accessible",
            self.path.display()
        );

        match fs::create_dir(&self.path).await {
            Ok(()) => {
                debug!("Created plugin cache directory {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && is_writable_dir(&self.path).await => {
                Ok(())
            }
            Err(e) => Err(PluginError::io(
                format!("creating plugin cache directory {}", self.path.display()),
                e,
            )),
        }
    }

    /// List all artifacts, sorted by key
    pub async fn list(&self) -> PluginResult<Vec<ArtifactInfo>> {
        let mut entries = match fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(PluginError::io(
                    format!("reading cache directory {}", self.path.display()),
                    e,
                ))
            }
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PluginError::io("reading cache entry", e))?
        {
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(CacheKey::from_file_name) else {
                continue;
            };
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| PluginError::io(format!("inspecting artifact {}", key), e))?;
            if !metadata.is_file() {
                continue;
            }

            artifacts.push(ArtifactInfo {
                key,
                path: entry.path(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        artifacts.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(artifacts)
    }

    /// Remove every artifact plus leftover staged sources and temp files.
    ///
    /// Returns the number of files removed. Unrelated files are left alone.
    pub async fn clear(&self) -> PluginResult<usize> {
        let mut entries = match fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(PluginError::io(
                    format!("reading cache directory {}", self.path.display()),
                    e,
                ))
            }
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PluginError::io("reading cache entry", e))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_cache_file(name) {
                continue;
            }

            fs::remove_file(entry.path()).await.map_err(|e| {
                PluginError::io(format!("removing {}", entry.path().display()), e)
            })?;
            removed += 1;
        }

        debug!("Cleared {} file(s) from {}", removed, self.path.display());
        Ok(removed)
    }
}

/// Whether a file in the cache root was written by the compile cache
fn is_cache_file(name: &str) -> bool {
    let prefix = match name.get(..CacheKey::LEN) {
        Some(prefix) => prefix,
        None => return false,
    };
    if CacheKey::from_file_name(prefix).is_none() {
        return false;
    }

    let rest = &name[CacheKey::LEN..];
    rest.is_empty() || rest.starts_with(STAGED_MARKER) || rest.ends_with(TEMP_SUFFIX)
}

async fn is_writable_dir(path: &Path) -> bool {
    match fs::metadata(path).await {
        Ok(metadata) => metadata.is_dir() && !metadata.permissions().readonly(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn ensure_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = CacheRoot::new(temp.path(), ".__plugin__");

        root.ensure().await.unwrap();

        assert!(temp.path().join(".__plugin__").is_dir());
    }

    #[tokio::test]
    async fn ensure_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = CacheRoot::new(temp.path(), ".__plugin__");

        root.ensure().await.unwrap();
        root.ensure().await.unwrap();

        assert!(root.path().is_dir());
    }

    #[tokio::test]
    async fn ensure_concurrent_callers_both_succeed() {
        let temp = TempDir::new().unwrap();
        let a = CacheRoot::new(temp.path(), ".__plugin__");
        let b = a.clone();

        let (ra, rb) = tokio::join!(
            tokio::spawn(async move { a.ensure().await }),
            tokio::spawn(async move { b.ensure().await }),
        );

        assert!(ra.unwrap().is_ok());
        assert!(rb.unwrap().is_ok());

        let dirs: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(dirs.len(), 1);
    }

    #[tokio::test]
    async fn ensure_missing_parent_is_fatal() {
        let temp = TempDir::new().unwrap();
        let root = CacheRoot::new(&temp.path().join("missing"), ".__plugin__");

        let err = root.ensure().await.unwrap_err();
        assert!(matches!(err, PluginError::FatalIo { .. }));
    }

    #[tokio::test]
    async fn ensure_file_in_the_way_is_fatal() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".__plugin__"), "not a dir").unwrap();
        let root = CacheRoot::new(temp.path(), ".__plugin__");

        assert!(root.ensure().await.is_err());
    }

    #[tokio::test]
    async fn list_only_reports_artifacts() {
        let temp = TempDir::new().unwrap();
        let root = CacheRoot::new(temp.path(), ".__plugin__");
        root.ensure().await.unwrap();

        let key = CacheKey::for_path(Path::new("/plugins/a.toml"));
        std::fs::write(root.artifact_path(&key), "{}").unwrap();
        std::fs::write(root.path().join("README"), "hello").unwrap();
        std::fs::write(root.path().join(format!("{}.local.toml", key)), "x = 1").unwrap();

        let artifacts = root.list().await.unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].key, key);
        assert_eq!(artifacts[0].size, 2);
    }

    #[tokio::test]
    async fn list_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let root = CacheRoot::new(temp.path(), ".__plugin__");
        assert!(root.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_removes_cache_files_only() {
        let temp = TempDir::new().unwrap();
        let root = CacheRoot::new(temp.path(), ".__plugin__");
        root.ensure().await.unwrap();

        let key = CacheKey::for_path(Path::new("/plugins/a.toml"));
        std::fs::write(root.artifact_path(&key), "{}").unwrap();
        std::fs::write(root.path().join(format!("{}.local.toml", key)), "").unwrap();
        std::fs::write(root.path().join(format!("{}.abc.tmp", key)), "").unwrap();
        std::fs::write(root.path().join("keep.txt"), "").unwrap();

        let removed = root.clear().await.unwrap();

        assert_eq!(removed, 3);
        assert!(root.path().join("keep.txt").exists());
        assert!(root.list().await.unwrap().is_empty());
    }
}
