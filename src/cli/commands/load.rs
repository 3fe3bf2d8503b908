//! Load command - resolve, compile and print a plugin

use crate::cli::args::{LoadArgs, ModuleFormat};
use crate::cli::CliContext;
use crate::error::{PlugloadError, PlugloadResult};
use crate::pipeline::LoadedPlugin;
use tracing::debug;

/// Execute the load command
pub async fn execute(args: LoadArgs, ctx: &CliContext) -> PlugloadResult<()> {
    let loader = ctx.loader();

    match loader.load_plugin(&args.identifier, args.strict).await {
        Ok(Some(plugin)) => print_plugin(&plugin, args.format),
        Ok(None) => {
            debug!("No plugin loaded for {}", args.identifier);
            Ok(())
        }
        Err(_) => Err(PlugloadError::StrictAbort {
            identifier: args.identifier,
        }),
    }
}

fn print_plugin(plugin: &LoadedPlugin, format: ModuleFormat) -> PlugloadResult<()> {
    let out = match format {
        ModuleFormat::Pretty => serde_json::to_string_pretty(&plugin.module)?,
        ModuleFormat::Json => serde_json::to_string(&plugin.module)?,
        ModuleFormat::Full => serde_json::to_string_pretty(plugin)?,
    };
    println!("{}", out);
    Ok(())
}
