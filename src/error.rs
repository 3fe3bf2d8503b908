//! Error types for plugload
//!
//! Pipeline stages return `PluginResult<T>`; everything around the pipeline
//! (config, CLI commands) returns `PlugloadResult<T>`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline stages
pub type PluginResult<T> = Result<T, PluginError>;

/// Result type alias for application-level operations
pub type PlugloadResult<T> = Result<T, PlugloadError>;

/// Sub-class of a compile failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// The source (or something it imports) could not be found
    ModuleNotFound,
    /// The compiler rejected the source
    Rejected,
    /// The compiler did not finish within the configured timeout
    TimedOut,
}

impl std::fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ModuleNotFound => "module not found",
            Self::Rejected => "rejected",
            Self::TimedOut => "timed out",
        };
        write!(f, "{}", s)
    }
}

/// Terminal outcome of a failed pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NotFound,
    CompileError,
    LoadError,
    FatalIoError,
}

/// Every way a single plugin request can fail
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("No such plugin identifier '{identifier}': {reason}")]
    NotFound { identifier: String, reason: String },

    #[error("Permission denied reading plugin at {path}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to compile {path} ({kind}): {message}")]
    Compile {
        path: PathBuf,
        kind: CompileErrorKind,
        message: String,
    },

    #[error("Failed to load plugin at {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("IO error: {context}")]
    FatalIo {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PluginError {
    /// Create a not-found error for an identifier
    pub fn not_found(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Create a compile error
    pub fn compile(
        path: impl Into<PathBuf>,
        kind: CompileErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self::Compile {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    /// Create a load error
    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a fatal IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::FatalIo {
            context: context.into(),
            source,
        }
    }

    /// Which outcome bucket this failure falls into.
    ///
    /// Permission failures share the not-found bucket.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::NotFound { .. } | Self::PermissionDenied { .. } => Outcome::NotFound,
            Self::Compile { .. } => Outcome::CompileError,
            Self::Load { .. } => Outcome::LoadError,
            Self::FatalIo { .. } => Outcome::FatalIoError,
        }
    }

    /// Check if this is a compile failure of the module-not-found class
    pub fn is_module_not_found(&self) -> bool {
        matches!(
            self,
            Self::Compile {
                kind: CompileErrorKind::ModuleNotFound,
                ..
            }
        )
    }
}

/// All errors that can occur in plugload
#[derive(Error, Debug)]
pub enum PlugloadError {
    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("Plugin '{identifier}' failed to load in strict mode")]
    StrictAbort { identifier: String },

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PlugloadError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Plugin(PluginError::NotFound { .. }) => {
                Some("Check the identifier, or run: plugload inspect <identifier>")
            }
            Self::Plugin(PluginError::FatalIo { .. }) => {
                Some("Check that the workspace root exists and is writable")
            }
            Self::ConfigInvalid { .. } => Some("Run: plugload config show"),
            _ => None,
        }
    }
}
