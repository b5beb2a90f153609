//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading `VueCompilerOptions`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// The `vueCompilerOptions` section has an unexpected shape.
    #[error("Invalid vueCompilerOptions: {0}")]
    Invalid(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}
