//! External command compiler
//!
//! Runs a configured tool (e.g. a transpiler) on the source file and takes
//! its stdout as the compiled module.

use crate::compiler::SourceCompiler;
use crate::error::{CompileErrorKind, PluginError, PluginResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Placeholder replaced by the source path in compiler arguments
const INPUT_PLACEHOLDER: &str = "{input}";

/// Max number of output lines to include in compile error messages.
const COMPILE_ERROR_TAIL_LINES: usize = 50;

/// Compiler output that marks an unresolvable import
const MODULE_NOT_FOUND_MARKERS: &[&str] = &["Cannot find module", "MODULE_NOT_FOUND"];

/// Compiles by spawning an external program
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    argv: Vec<String>,
}

impl CommandCompiler {
    /// `argv[0]` is the program; `{input}` marks where the source path goes
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    /// Build the argument list for one source file
    fn args_for(&self, source: &Path) -> Vec<String> {
        let input = source.to_string_lossy();
        let mut args: Vec<String> = self.argv[1..]
            .iter()
            .map(|arg| arg.replace(INPUT_PLACEHOLDER, &input))
            .collect();

        if !self.argv[1..].iter().any(|arg| arg.contains(INPUT_PLACEHOLDER)) {
            args.push(input.into_owned());
        }
        args
    }
}

/// Extract the useful tail of compiler output for error diagnostics.
fn compile_error_output(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let total = lines.len();
    let tail: Vec<&str> = if total > COMPILE_ERROR_TAIL_LINES {
        lines[total - COMPILE_ERROR_TAIL_LINES..].to_vec()
    } else {
        lines
    };
    tail.join("\n")
}

#[async_trait]
impl SourceCompiler for CommandCompiler {
    async fn compile(&self, source: &Path) -> PluginResult<String> {
        let Some(program) = self.argv.first() else {
            return Err(PluginError::compile(
                source,
                CompileErrorKind::Rejected,
                "no compiler command configured",
            ));
        };
        let args = self.args_for(source);
        debug!("Running compiler: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                PluginError::compile(
                    source,
                    CompileErrorKind::Rejected,
                    format!("failed to run {}: {}", program, e),
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let kind = if MODULE_NOT_FOUND_MARKERS.iter().any(|m| stderr.contains(m)) {
            CompileErrorKind::ModuleNotFound
        } else {
            CompileErrorKind::Rejected
        };

        Err(PluginError::compile(
            source,
            kind,
            format!(
                "{} exited with {}\n{}",
                program,
                output.status,
                compile_error_output(&stdout, &stderr)
            ),
        ))
    }

    fn compiler_name(&self) -> &'static str {
        "command"
    }
}
