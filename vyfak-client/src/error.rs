//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network, timeout or TLS failure
    #[error("HTTP Error: {0}")]
    Transport(String),

    /// Structured response that is not what the call expects
    #[error("Provider error: {0}")]
    Provider(String),

    /// Unusable input, e.g. a malformed endpoint URL
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
