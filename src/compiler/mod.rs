//! Source compilers
//!
//! A compiler turns one source file into module text the host can load.
//! The compile cache treats it as a black box: path in, text or failure out.
//!
//! - `DocumentCompiler`: built-in, TOML/JSON documents to JSON modules
//! - `CommandCompiler`: any external tool that prints the module on stdout

mod command;
mod document;

pub use command::CommandCompiler;
pub use document::DocumentCompiler;

use crate::config::schema::CompilerConfig;
use crate::error::PluginResult;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Abstract source compiler interface
#[async_trait]
pub trait SourceCompiler: Send + Sync {
    /// Compile `source` and return the full output text
    async fn compile(&self, source: &Path) -> PluginResult<String>;

    /// Get the human-readable compiler name for display
    fn compiler_name(&self) -> &'static str;
}

/// Create the compiler selected by configuration
pub fn create_compiler(config: &CompilerConfig) -> Arc<dyn SourceCompiler> {
    if config.command.is_empty() {
        Arc::new(DocumentCompiler)
    } else {
        Arc::new(CommandCompiler::new(config.command.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_document_compiler() {
        let compiler = create_compiler(&CompilerConfig::default());
        assert_eq!(compiler.compiler_name(), "document");
    }

    #[test]
    fn command_selects_external_compiler() {
        let config = CompilerConfig {
            command: vec!["cat".to_string()],
            ..Default::default()
        };
        assert_eq!(create_compiler(&config).compiler_name(), "command");
    }
}
