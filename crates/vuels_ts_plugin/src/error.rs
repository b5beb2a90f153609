//! Request error types.

use thiserror::Error;

/// Errors that can occur while answering a component request.
///
/// "Not found" is never an error; handlers answer `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The document-identifier mapper rejected a file name.
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// The host process answered with an error.
    #[error("Host process error: {0}")]
    Remote(String),

    /// The connection to the host process closed.
    #[error("Host process connection closed")]
    Disconnected,

    /// I/O error on the host connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed message on the host connection.
    #[error("Invalid message: {0}")]
    Json(#[from] serde_json::Error),
}

impl RequestError {
    /// Creates an invalid file name error.
    pub fn invalid_file_name(file_name: impl Into<String>) -> Self {
        Self::InvalidFileName(file_name.into())
    }

    /// Creates a remote error.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }
}

/// Result alias for request handlers.
pub type RequestResult<T> = Result<T, RequestError>;
