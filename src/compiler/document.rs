//! Built-in document compiler
//!
//! Plugin sources are TOML or JSON documents. Each top-level key is an export
//! and `default` is the primary export, so
//!
//! ```toml
//! [default]
//! name = "my-plugin"
//! ```
//!
//! compiles to `{"default": {"name": "my-plugin"}}`.

use crate::compiler::SourceCompiler;
use crate::error::{CompileErrorKind, PluginError, PluginResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;

/// Compiles TOML and JSON documents into JSON modules
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCompiler;

impl DocumentCompiler {
    /// Compile document text; `extension` selects the parser
    pub fn compile_str(&self, source: &Path, extension: &str, text: &str) -> PluginResult<String> {
        let module: serde_json::Value = match extension {
            "toml" => {
                let value: toml::Value = toml::from_str(text).map_err(|e| {
                    PluginError::compile(source, CompileErrorKind::Rejected, e.to_string())
                })?;
                toml_to_json(value)
            }
            "json" => serde_json::from_str(text).map_err(|e| {
                PluginError::compile(source, CompileErrorKind::Rejected, e.to_string())
            })?,
            other => {
                return Err(PluginError::compile(
                    source,
                    CompileErrorKind::Rejected,
                    format!("unsupported source type '.{}'", other),
                ))
            }
        };

        if !module.is_object() {
            return Err(PluginError::compile(
                source,
                CompileErrorKind::Rejected,
                "module source must be a table of exports",
            ));
        }

        serde_json::to_string_pretty(&module)
            .map_err(|e| PluginError::compile(source, CompileErrorKind::Rejected, e.to_string()))
    }
}

/// Convert a TOML value into the module's JSON form.
///
/// Datetimes become their RFC 3339 text.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

#[async_trait]
impl SourceCompiler for DocumentCompiler {
    async fn compile(&self, source: &Path) -> PluginResult<String> {
        let text = tokio::fs::read_to_string(source).await.map_err(|e| {
            let kind = if e.kind() == ErrorKind::NotFound {
                CompileErrorKind::ModuleNotFound
            } else {
                CompileErrorKind::Rejected
            };
            PluginError::compile(source, kind, e.to_string())
        })?;

        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        self.compile_str(source, &extension, &text)
    }

    fn compiler_name(&self) -> &'static str {
        "document"
    }
}
