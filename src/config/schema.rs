//! Configuration schema for plugload
//!
//! Configuration is read from `{workspace_root}/plugload.toml` unless an
//! explicit path is given.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Compile cache settings
    pub cache: CacheConfig,

    /// Identifier resolution settings
    pub resolve: ResolveConfig,

    /// Source compiler settings
    pub compiler: CompilerConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Compile cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Name of the cache directory beneath the workspace root
    pub dir_name: String,

    /// Compile from a staged link of the source instead of the original
    pub stage_sources: bool,

    /// Reuse an existing artifact instead of recompiling
    pub reuse_artifacts: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir_name: ".__plugin__".to_string(),
            stage_sources: true,
            reuse_artifacts: false,
        }
    }
}

/// Identifier resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Directories (relative to the workspace root) searched for packages
    pub search_dirs: Vec<String>,

    /// Extensions probed when an identifier has no exact match
    pub extensions: Vec<String>,

    /// Search the user-global plugins directory
    pub global_plugins: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            search_dirs: vec!["plugin_modules".to_string()],
            extensions: vec!["toml".to_string(), "json".to_string()],
            global_plugins: true,
        }
    }
}

/// Source compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// External compiler argv; empty uses the built-in document compiler.
    /// `{input}` is replaced by the source path.
    pub command: Vec<String>,

    /// Compiler timeout in seconds (0 = no timeout)
    pub timeout_secs: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: vec![],
            timeout_secs: 60,
        }
    }
}
