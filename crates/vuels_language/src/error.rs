//! Language service error types.

use thiserror::Error;

/// Errors that can occur while serving a language feature.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A document identifier could not be mapped.
    #[error("Invalid document identifier: {0}")]
    InvalidDocument(String),

    /// A capability or collaborator is not available in this session.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// A plugin failed while answering a request.
    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Creates an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument(message.into())
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a plugin error.
    pub fn plugin(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

/// Result alias for feature hooks.
pub type ServiceResult<T> = Result<T, ServiceError>;
