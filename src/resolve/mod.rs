//! Identifier resolution
//!
//! Maps a plugin identifier (package name, directory or file path) to an
//! absolute path. A missing identifier is `PluginError::NotFound`; anything
//! else is a harder failure.

pub mod builtin;
mod fs;

pub use fs::FsResolver;

use crate::error::PluginResult;
use async_trait::async_trait;
use std::path::PathBuf;

/// Abstract module resolution interface
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    /// Resolve an identifier to an absolute path
    async fn resolve(&self, identifier: &str) -> PluginResult<PathBuf>;
}
