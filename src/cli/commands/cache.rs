//! Cache command - manage the compile cache

use crate::cache::{ArtifactInfo, CacheKey};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::cli::CliContext;
use crate::error::{PlugloadError, PlugloadResult};
use console::style;
use std::io::{self, Write};
use std::path::Path;

/// Execute the cache command
pub async fn execute(args: CacheArgs, ctx: &CliContext) -> PlugloadResult<()> {
    let loader = ctx.loader();
    let root = loader.cache().root();

    match args.action {
        CacheAction::Path => {
            println!("{}", root.path().display());
            Ok(())
        }
        CacheAction::List { format } => {
            let artifacts = root.list().await?;
            list_artifacts(&artifacts, format)
        }
        CacheAction::Clear { yes } => clear_cache(root, yes).await,
        CacheAction::Key { path } => {
            print_key(&ctx.base_dir, &path).await;
            Ok(())
        }
    }
}

fn list_artifacts(artifacts: &[ArtifactInfo], format: OutputFormat) -> PlugloadResult<()> {
    if artifacts.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("No compiled artifacts."),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_artifact_table(artifacts),
        OutputFormat::Json => print_artifact_json(artifacts)?,
        OutputFormat::Plain => {
            for artifact in artifacts {
                println!("{}", artifact.key);
            }
        }
    }
    Ok(())
}

fn print_artifact_table(artifacts: &[ArtifactInfo]) {
    println!(
        "{:<34} {:>10} {:<20}",
        style("KEY").bold(),
        style("SIZE").bold(),
        style("MODIFIED").bold()
    );
    println!("{}", "-".repeat(66));

    for artifact in artifacts {
        let modified = artifact
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        println!(
            "{:<34} {:>10} {:<20}",
            artifact.key, artifact.size, modified
        );
    }

    println!();
    println!("Total: {} artifact(s)", artifacts.len());
}

fn print_artifact_json(artifacts: &[ArtifactInfo]) -> PlugloadResult<()> {
    #[derive(serde::Serialize)]
    struct ArtifactJson {
        key: String,
        path: String,
        size: u64,
        modified: Option<String>,
    }

    let json: Vec<ArtifactJson> = artifacts
        .iter()
        .map(|a| ArtifactJson {
            key: a.key.to_string(),
            path: a.path.display().to_string(),
            size: a.size,
            modified: a.modified.map(|m| m.to_rfc3339()),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Clear all artifacts
async fn clear_cache(root: &crate::cache::CacheRoot, skip_confirm: bool) -> PlugloadResult<()> {
    let artifacts = root.list().await?;

    if !skip_confirm {
        print!(
            "Remove {} artifact(s) from {}? [y/N] ",
            artifacts.len(),
            root.path().display()
        );
        let _ = io::stdout().flush();

        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .map_err(|e| PlugloadError::io("reading confirmation", e))?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let removed = root.clear().await?;
    println!("{} cleared {} file(s)", style("✓").green(), removed);
    Ok(())
}

/// Keys are derived from the canonical path when the file exists
async fn print_key(base_dir: &Path, path: &Path) {
    let joined = base_dir.join(path);
    let source = tokio::fs::canonicalize(&joined).await.unwrap_or(joined);
    println!("{}", CacheKey::for_path(&source));
}
