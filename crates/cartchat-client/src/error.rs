//! Error types for the search client.

use thiserror::Error;

/// Errors that can occur when querying the search backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to build the client or reach the server.
    #[error("connection failed: {0}")]
    Connection(String),

    /// HTTP transport error (including timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("backend responded with status {status}")]
    Status { status: u16 },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}
