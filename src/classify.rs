//! Plugin type classification
//!
//! A resolved path that cannot be stat'ed is still loadable: resolution
//! already succeeded, so it is treated as an opaque module.

use std::fmt;
use std::path::Path;

/// What kind of target a resolved path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    /// Regular file, compiled through the cache
    File,
    /// Directory, loaded directly
    Directory,
    /// Resolvable but not on the filesystem, loaded directly
    Module,
    /// Exists but is neither file nor directory; never loadable
    Unknown,
}

impl PluginType {
    /// Whether this type goes through the compile cache
    pub fn needs_compile(&self) -> bool {
        matches!(self, Self::File)
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Module => "module",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Classify a resolved path by its filesystem metadata
pub async fn classify(resolved: &Path) -> PluginType {
    match tokio::fs::metadata(resolved).await {
        Ok(metadata) if metadata.is_file() => PluginType::File,
        Ok(metadata) if metadata.is_dir() => PluginType::Directory,
        Ok(_) => PluginType::Unknown,
        Err(_) => PluginType::Module,
    }
}
