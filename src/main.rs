//! plugload - Plugin resolver and compile cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use plugload::cli::{Cli, CliContext, Commands};
use plugload::error::{PlugloadError, PlugloadResult};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(PlugloadError::StrictAbort { identifier }) => {
            // Failure details were already logged by the reporter
            eprintln!(
                "{} aborting: plugin '{}' failed to load",
                style("Error:").red().bold(),
                identifier
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PlugloadResult<()> {
    let cli = Cli::parse();
    let ctx = CliContext::from_cli(&cli).await?;

    init_logging(cli.verbose, &ctx.config.general.log_format);

    match cli.command {
        Commands::Load(args) => plugload::cli::commands::load(args, &ctx).await,
        Commands::Inspect(args) => plugload::cli::commands::inspect(args, &ctx).await,
        Commands::Cache(args) => plugload::cli::commands::cache(args, &ctx).await,
        Commands::Config(args) => plugload::cli::commands::config(args, &ctx).await,
    }
}

/// Diagnostics go to stderr so stdout carries only command output.
/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("plugload=warn"),
        1 => EnvFilter::new("plugload=info"),
        _ => EnvFilter::new("plugload=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
