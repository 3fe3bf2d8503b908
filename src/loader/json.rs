//! JSON module host
//!
//! Host-format modules are JSON documents. Directories point at their entry
//! through `package.json`'s `main` field, or fall back to `index.json`.

use crate::error::{PluginError, PluginResult};
use crate::loader::ModuleHost;
use crate::resolve::builtin::{builtin_name, builtin_source};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Entry file used when a directory has no `main`
const DEFAULT_ENTRY: &str = "index.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    main: Option<String>,
}

/// Loads JSON modules from disk and from the built-in registry
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModuleHost;

impl JsonModuleHost {
    /// Find the entry file of a directory module
    async fn entry_point(&self, dir: &Path) -> PluginResult<PathBuf> {
        let manifest_path = dir.join("package.json");

        if fs::metadata(&manifest_path).await.is_ok() {
            let content = fs::read_to_string(&manifest_path)
                .await
                .map_err(|e| PluginError::load(&manifest_path, e.to_string()))?;
            let manifest: PackageManifest = serde_json::from_str(&content)
                .map_err(|e| PluginError::load(&manifest_path, e.to_string()))?;

            if let Some(main) = manifest.main {
                return Ok(dir.join(main));
            }
        }

        Ok(dir.join(DEFAULT_ENTRY))
    }
}

fn parse(path: &Path, text: &str) -> PluginResult<Value> {
    serde_json::from_str(text).map_err(|e| PluginError::load(path, format!("invalid module: {}", e)))
}

#[async_trait]
impl ModuleHost for JsonModuleHost {
    async fn load_module(&self, path: &Path) -> PluginResult<Value> {
        if let Some(text) = builtin_name(path).and_then(builtin_source) {
            return parse(path, text);
        }

        let metadata = fs::metadata(path)
            .await
            .map_err(|e| PluginError::load(path, e.to_string()))?;

        let entry = if metadata.is_dir() {
            self.entry_point(path).await?
        } else {
            path.to_path_buf()
        };

        let text = fs::read_to_string(&entry)
            .await
            .map_err(|e| PluginError::load(&entry, e.to_string()))?;
        parse(&entry, &text)
    }
}
