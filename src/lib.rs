//! plugload - Plugin resolver and compile cache
//!
//! Resolves a plugin identifier to a path, compiles source-file plugins into
//! a path-keyed cache beneath the workspace root, and loads the result.

pub mod cache;
pub mod classify;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod resolve;

pub use classify::PluginType;
pub use error::{PluginError, PluginResult, PlugloadError, PlugloadResult};
pub use pipeline::{LoadedPlugin, PluginLoader};
