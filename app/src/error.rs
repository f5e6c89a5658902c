//! Error types for the Conduit application

use thiserror::Error;

/// Errors returned by the Conduit API
///
/// Cloneable so that a failed reply can travel inside a page action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request could not be sent or the connection failed
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint URL could not be built
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Missing or rejected credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource does not exist
    #[error("Not found")]
    NotFound,

    /// The server rejected the request body (HTTP 422)
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// API returned an unexpected status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body could not be decoded
    #[error("Response decoding failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Messages suitable for showing next to a form
    ///
    /// Validation failures list each server message; anything else becomes
    /// a single generic message.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(messages) if !messages.is_empty() => messages.clone(),
            Self::Unauthorized => vec!["You are not signed in.".to_string()],
            _ => vec!["Unable to process request.".to_string()],
        }
    }
}

/// Errors reading or writing persisted credentials
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure
    #[error("Credential storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored credentials could not be encoded or decoded
    #[error("Credential encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but its value can't be used
    #[error("Invalid value for {name}: {reason}")]
    InvalidVariable {
        /// Variable name
        name: String,
        /// Why the value was rejected
        reason: String,
    },
}
