//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// plugload - Plugin resolver and compile cache
///
/// Resolves a plugin identifier (package name, directory or source file),
/// compiles source files into a per-workspace cache and prints the loaded
/// plugin.
#[derive(Parser, Debug)]
#[command(name = "plugload")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path (defaults to <workspace>/plugload.toml)
    #[arg(short, long, global = true, env = "PLUGLOAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Workspace root holding the plugin cache (defaults to current directory)
    #[arg(short, long, global = true, env = "PLUGLOAD_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Directory path identifiers are resolved against (defaults to current directory)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve, compile and load a plugin
    Load(LoadArgs),

    /// Show how an identifier resolves, without compiling
    Inspect(InspectArgs),

    /// Manage the compile cache
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the load command
#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Package name, directory or source file
    pub identifier: String,

    /// Exit with failure on any plugin error
    #[arg(short, long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    pub format: ModuleFormat,
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Package name, directory or source file
    pub identifier: String,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// How a loaded plugin is printed
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModuleFormat {
    /// Indented JSON of the plugin value
    Pretty,
    /// Single-line JSON of the plugin value
    Json,
    /// Plugin value with resolution details
    Full,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration to the workspace
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show the cache directory
    Path,

    /// List compiled artifacts
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove all compiled artifacts
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the cache key for a source path
    Key {
        /// Source file path
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_load() {
        let cli = Cli::parse_from(["plugload", "load", "./plugins/a.toml", "--strict"]);
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.identifier, "./plugins/a.toml");
                assert!(args.strict);
                assert!(matches!(args.format, ModuleFormat::Pretty));
            }
            _ => panic!("expected Load command"),
        }
    }

    #[test]
    fn cli_load_defaults_lenient() {
        let cli = Cli::parse_from(["plugload", "load", "noop", "--format", "json"]);
        match cli.command {
            Commands::Load(args) => {
                assert!(!args.strict);
                assert!(matches!(args.format, ModuleFormat::Json));
            }
            _ => panic!("expected Load command"),
        }
    }

    #[test]
    fn cli_parses_global_paths() {
        let cli = Cli::parse_from([
            "plugload",
            "inspect",
            "noop",
            "--workspace",
            "/srv/app",
            "--base-dir",
            "/srv/app/config",
        ]);
        assert_eq!(cli.workspace, Some(PathBuf::from("/srv/app")));
        assert_eq!(cli.base_dir, Some(PathBuf::from("/srv/app/config")));
        assert!(matches!(cli.command, Commands::Inspect(_)));
    }

    #[test]
    fn cli_parses_cache_clear() {
        let cli = Cli::parse_from(["plugload", "cache", "clear", "--yes"]);
        match cli.command {
            Commands::Cache(CacheArgs {
                action: CacheAction::Clear { yes },
            }) => assert!(yes),
            _ => panic!("expected cache clear"),
        }
    }

    #[test]
    fn cli_config_defaults_to_show() {
        let cli = Cli::parse_from(["plugload", "config"]);
        match cli.command {
            Commands::Config(args) => assert!(args.action.is_none()),
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["plugload", "cache", "path"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["plugload", "-vv", "cache", "path"]);
        assert_eq!(cli.verbose, 2);
    }
}
