//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{PlugloadError, PlugloadResult};
use crate::pipeline::PluginLoader;
use std::path::{Path, PathBuf};

/// Everything a command needs, resolved once from the global flags
pub struct CliContext {
    pub workspace_root: PathBuf,
    pub base_dir: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
}

impl CliContext {
    /// Resolve workspace, base dir and configuration from the global flags
    pub async fn from_cli(cli: &Cli) -> PlugloadResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| PlugloadError::io("getting current directory", e))?;

        let workspace_root = absolute(&cwd, cli.workspace.as_deref());
        let base_dir = absolute(&cwd, cli.base_dir.as_deref());

        let config_manager = match cli.config {
            Some(ref path) => ConfigManager::with_path(absolute(&cwd, Some(path))),
            None => ConfigManager::for_workspace(&workspace_root),
        };
        // `config init` writes the file, so it must not require one
        let config = match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Init { .. }),
            }) => Config::default(),
            _ => config_manager.load().await?,
        };

        Ok(Self {
            workspace_root,
            base_dir,
            config_manager,
            config,
        })
    }

    /// Plugin loader for this workspace
    pub fn loader(&self) -> PluginLoader {
        PluginLoader::from_config(&self.workspace_root, &self.base_dir, &self.config)
    }
}

fn absolute(cwd: &Path, path: Option<&Path>) -> PathBuf {
    match path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths() {
        let cwd = Path::new("/work");
        assert_eq!(absolute(cwd, None), PathBuf::from("/work"));
        assert_eq!(absolute(cwd, Some(Path::new("app"))), PathBuf::from("/work/app"));
        assert_eq!(absolute(cwd, Some(Path::new("/srv"))), PathBuf::from("/srv"));
    }
}
