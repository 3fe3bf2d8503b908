//! Configuration management for plugload

pub mod schema;

pub use schema::Config;

use crate::error::{PlugloadError, PlugloadResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File name of the workspace-local configuration
pub const CONFIG_FILE_NAME: &str = "plugload.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
    /// Path was given explicitly, so it must exist
    explicit: bool,
}

impl ConfigManager {
    /// Create a config manager reading `plugload.toml` from the workspace root
    pub fn for_workspace(workspace_root: &Path) -> Self {
        Self {
            config_path: workspace_root.join(CONFIG_FILE_NAME),
            explicit: false,
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            explicit: true,
        }
    }

    /// User-global plugins directory (`{data_dir}/plugload/plugins`)
    pub fn global_plugins_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("plugload").join("plugins"))
    }

    /// Load configuration.
    ///
    /// A missing workspace config falls back to defaults; a missing explicit
    /// config is an error.
    pub async fn load(&self) -> PlugloadResult<Config> {
        if !self.explicit && !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> PlugloadResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PlugloadError::io(format!("reading config from {}", path.display()), e))?;

        let config: Config = toml::from_str(&content).map_err(|e| PlugloadError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        validate(&config, path)?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> PlugloadResult<()> {
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            PlugloadError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

/// Reject settings the pipeline cannot honour
fn validate(config: &Config, path: &Path) -> PlugloadResult<()> {
    let dir_name = &config.cache.dir_name;
    let single_segment = !dir_name.is_empty()
        && dir_name != "."
        && dir_name != ".."
        && !dir_name.contains('/')
        && !dir_name.contains('\\');

    if !single_segment {
        return Err(PlugloadError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: format!(
                "cache.dir_name '{}' must be a single directory name",
                dir_name
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::for_workspace(temp.path());

        let config = manager.load().await.unwrap();
        assert_eq!(config.cache.dir_name, ".__plugin__");
        assert_eq!(manager.path(), temp.path().join("plugload.toml"));
    }

    #[tokio::test]
    async fn load_workspace_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("plugload.toml"),
            "[cache]\ndir_name = \".compiled\"\n",
        )
        .unwrap();

        let config = ConfigManager::for_workspace(temp.path())
            .load()
            .await
            .unwrap();
        assert_eq!(config.cache.dir_name, ".compiled");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::for_workspace(temp.path());

        let mut config = Config::default();
        config.compiler.command = vec!["babel".to_string(), "{input}".to_string()];

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.compiler.command, vec!["babel", "{input}"]);
    }

    #[tokio::test]
    async fn missing_explicit_config_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, PlugloadError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[tokio::test]
    async fn invalid_toml_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(&path, "[cache\nbroken").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, PlugloadError::ConfigInvalid { .. }));
    }

    #[tokio::test]
    async fn multi_segment_dir_name_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugload.toml");
        std::fs::write(&path, "[cache]\ndir_name = \"a/b\"\n").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(err.to_string().contains("single directory name"));
    }
}
