//! Failure reporting policy
//!
//! | Outcome | Reported |
//! |---------|----------|
//! | NotFound / permission denied | always |
//! | CompileError, module-not-found class | strict mode only |
//! | other CompileError, LoadError, FatalIoError | always |
//!
//! Strict mode aborts after any failure; lenient mode continues with no plugin.

use crate::error::{Outcome, PluginError};
use tracing::error;

/// What the caller should do after a failure was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Carry on with an empty result
    Continue,
    /// Stop the host
    Abort,
}

/// Decides how pipeline failures surface
#[derive(Debug, Clone, Copy)]
pub struct ErrorReporter {
    strict: bool,
}

impl ErrorReporter {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Whether a diagnostic should be emitted for this failure
    pub fn should_report(&self, err: &PluginError) -> bool {
        self.strict || !err.is_module_not_found()
    }

    /// Emit the diagnostic (if any) and decide what happens next
    pub fn report(&self, identifier: &str, err: &PluginError) -> Disposition {
        if self.should_report(err) {
            match err.outcome() {
                Outcome::NotFound => {
                    error!("No such plugin at {}: {}", identifier, err);
                }
                Outcome::CompileError if err.is_module_not_found() => {
                    error!("Bad module at {}: {}", identifier, err);
                }
                Outcome::CompileError | Outcome::LoadError | Outcome::FatalIoError => {
                    error!("Module error at {}: {}", identifier, err);
                }
            }
        }

        if self.strict {
            Disposition::Abort
        } else {
            Disposition::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileErrorKind;

    fn module_not_found() -> PluginError {
        PluginError::compile("/p/a.toml", CompileErrorKind::ModuleNotFound, "missing")
    }

    #[test]
    fn lenient_suppresses_module_not_found() {
        let reporter = ErrorReporter::new(false);
        assert!(!reporter.should_report(&module_not_found()));
        assert_eq!(reporter.report("./a", &module_not_found()), Disposition::Continue);
    }

    #[test]
    fn strict_reports_module_not_found() {
        let reporter = ErrorReporter::new(true);
        assert!(reporter.should_report(&module_not_found()));
        assert_eq!(reporter.report("./a", &module_not_found()), Disposition::Abort);
    }

    #[test]
    fn other_failures_always_reported() {
        let lenient = ErrorReporter::new(false);
        let errors = [
            PluginError::not_found("x", "missing"),
            PluginError::compile("/p/a.toml", CompileErrorKind::Rejected, "syntax"),
            PluginError::load("/p/a", "no default export"),
            PluginError::io("creating cache", std::io::ErrorKind::PermissionDenied.into()),
        ];

        for err in &errors {
            assert!(lenient.should_report(err), "{err}");
            assert_eq!(lenient.report("x", err), Disposition::Continue);
        }
    }
}
