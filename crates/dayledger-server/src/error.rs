//! Server error types.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (socket, bind, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The request could not be parsed.
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The request head exceeded the configured limit.
    #[error("Request too large: {size} bytes (max {max})")]
    RequestTooLarge { size: usize, max: usize },

    /// A read or write did not finish in time.
    #[error("Timeout during {operation}")]
    Timeout { operation: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The server stopped accepting connections.
    #[error("Server shutdown requested")]
    Shutdown,
}

impl ServerError {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if the client sent something unusable.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest { .. } | Self::RequestTooLarge { .. })
    }
}
