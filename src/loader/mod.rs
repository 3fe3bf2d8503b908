//! Module loading
//!
//! The module system itself is a collaborator behind [`ModuleHost`]. This
//! module only decides what to hand it and how to shape the result:
//! compiled files yield their `default` export, directories and opaque
//! modules yield whatever the host returns.

mod json;

pub use json::JsonModuleHost;

use crate::classify::PluginType;
use crate::error::{PluginError, PluginResult};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

/// Name of the primary export of a compiled artifact
pub const DEFAULT_EXPORT: &str = "default";

/// Abstract host module system
#[async_trait]
pub trait ModuleHost: Send + Sync {
    /// Load the module at `path` and return its value
    async fn load_module(&self, path: &Path) -> PluginResult<Value>;
}

/// Produce the final plugin value for a classified path
pub async fn load(
    host: &dyn ModuleHost,
    plugin_type: PluginType,
    resolved: &Path,
    artifact: Option<&Path>,
) -> PluginResult<Value> {
    match plugin_type {
        PluginType::File => {
            let artifact = artifact.ok_or_else(|| {
                PluginError::load(resolved, "file plugin was not compiled")
            })?;
            let module = host.load_module(artifact).await?;
            default_export(artifact, module)
        }
        PluginType::Directory | PluginType::Module => host.load_module(resolved).await,
        PluginType::Unknown => Err(PluginError::load(
            resolved,
            "plugin must be an installed package, a package directory, or a plugin source file",
        )),
    }
}

/// Take the primary export out of a compiled module
fn default_export(artifact: &Path, module: Value) -> PluginResult<Value> {
    match module {
        Value::Object(mut exports) => exports
            .remove(DEFAULT_EXPORT)
            .ok_or_else(|| PluginError::load(artifact, "module has no default export")),
        _ => Err(PluginError::load(artifact, "module has no exports")),
    }
}
