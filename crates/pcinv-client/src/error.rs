//! Error types for the Prism client

use serde_json::Value;
use thiserror::Error;

/// Errors raised inside a single API call
///
/// These are folded into the sentinel response before leaving the client;
/// they are public so that the failure reason can be logged and tested.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// API returned an error status
    #[error("API error ({status})")]
    Api {
        /// HTTP status code
        status: u16,
        /// Decoded error body, if it was JSON
        payload: Option<Value>,
    },
}

impl ClientError {
    /// Map a transport error, keeping timeouts distinct
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(err)
        }
    }

    /// Decoded error body to carry into the sentinel response
    #[must_use]
    pub fn into_payload(self) -> Option<Value> {
        match self {
            ClientError::Api { payload, .. } => payload,
            _ => None,
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
