//! Inspect command - show how an identifier resolves

use crate::cli::args::{InspectArgs, OutputFormat};
use crate::cli::CliContext;
use crate::error::PlugloadResult;
use console::style;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct Inspection {
    identifier: String,
    resolved_path: PathBuf,
    plugin_type: String,
    cache_key: Option<String>,
    artifact: Option<PathBuf>,
    cached: bool,
}

/// Execute the inspect command
pub async fn execute(args: InspectArgs, ctx: &CliContext) -> PlugloadResult<()> {
    let loader = ctx.loader();
    let resolved = loader.resolve(&args.identifier).await?;

    let (cache_key, artifact) = if resolved.plugin_type.needs_compile() {
        let key = crate::cache::CacheKey::for_path(&resolved.resolved_path);
        let artifact = loader.cache().root().artifact_path(&key);
        (Some(key.to_string()), Some(artifact))
    } else {
        (None, None)
    };
    let cached = artifact.as_ref().is_some_and(|a| a.is_file());

    let inspection = Inspection {
        identifier: args.identifier,
        resolved_path: resolved.resolved_path,
        plugin_type: resolved.plugin_type.to_string(),
        cache_key,
        artifact,
        cached,
    };

    match args.format {
        OutputFormat::Table => print_table(&inspection),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inspection)?),
        OutputFormat::Plain => println!("{}", inspection.resolved_path.display()),
    }

    Ok(())
}

fn print_table(inspection: &Inspection) {
    println!("{:<12} {}", style("Identifier").bold(), inspection.identifier);
    println!(
        "{:<12} {}",
        style("Resolved").bold(),
        inspection.resolved_path.display()
    );
    println!("{:<12} {}", style("Type").bold(), inspection.plugin_type);

    match (&inspection.cache_key, &inspection.artifact) {
        (Some(key), Some(artifact)) => {
            let state = if inspection.cached {
                style("cached").green()
            } else {
                style("not compiled").dim()
            };
            println!("{:<12} {}", style("Cache key").bold(), key);
            println!(
                "{:<12} {} [{}]",
                style("Artifact").bold(),
                artifact.display(),
                state
            );
        }
        _ => println!("{:<12} {}", style("Artifact").bold(), style("loaded directly").dim()),
    }
}
