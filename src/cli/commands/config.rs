//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::cli::CliContext;
use crate::config::Config;
use crate::error::PlugloadResult;
use console::style;

/// Execute the config command
pub async fn execute(args: ConfigArgs, ctx: &CliContext) -> PlugloadResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(&ctx.config)?,
        Some(ConfigAction::Path) => println!("{}", ctx.config_manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(ctx, force).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> PlugloadResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(ctx: &CliContext, force: bool) -> PlugloadResult<()> {
    let path = ctx.config_manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("[WARN]").yellow(),
            path.display()
        );
        return Ok(());
    }

    ctx.config_manager.save(&Config::default()).await?;
    println!(
        "{} Configuration initialized ({})",
        style("[OK]").green(),
        path.display()
    );
    Ok(())
}
