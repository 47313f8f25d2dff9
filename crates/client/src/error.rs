use sprout_core::error::CoreError;

use crate::storage::StorageError;

/// Errors surfaced by the client layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No usable token: never signed in, signed out, expired, or rejected by the server.
    #[error("Not signed in")]
    Unauthenticated,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Device storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The operation has no counterpart in the API.
    #[error("Not supported: {0}")]
    Unsupported(&'static str),

    /// A domain-level error from `sprout_core` (validation, decoding).
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience alias used across the crate.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Human-readable message from an API error body (`message` or `detail`).
    pub fn server_message(&self) -> Option<String> {
        let ClientError::Api { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        ["message", "detail"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
    }
}
