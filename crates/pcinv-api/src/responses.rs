//! Response types for the v3 API

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Error code carried by every normalized failure
pub const SENTINEL_ERROR_CODE: &str = "408";

/// Outcome of one API call
///
/// Transport errors, non-2xx statuses and undecodable bodies all collapse
/// into [`ApiResponse::Error`]. The error is data, not a fatal condition:
/// it is emitted in place of the resource it stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Decoded JSON body of a 2xx response (`Null` for an empty body)
    Success(Value),
    /// Normalized failure
    Error {
        /// Always [`SENTINEL_ERROR_CODE`]
        code: String,
        /// Decoded error body, when the server sent JSON
        payload: Option<Value>,
    },
}

impl ApiResponse {
    /// Normalized failure with an optional decoded error body
    #[must_use]
    pub fn error(payload: Option<Value>) -> Self {
        ApiResponse::Error {
            code: SENTINEL_ERROR_CODE.to_string(),
            payload,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, ApiResponse::Error { .. })
    }

    /// Success body, if any
    #[must_use]
    pub fn success(&self) -> Option<&Value> {
        match self {
            ApiResponse::Success(value) => Some(value),
            ApiResponse::Error { .. } => None,
        }
    }

    /// JSON form used in output documents and the cache
    ///
    /// Errors render as `[code, payload]`.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            ApiResponse::Success(value) => value,
            ApiResponse::Error { code, payload } => {
                Value::Array(vec![Value::String(code), payload.unwrap_or(Value::Null)])
            }
        }
    }
}

impl Serialize for ApiResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ApiResponse::Success(value) => value.serialize(serializer),
            ApiResponse::Error { code, payload } => (code, payload).serialize(serializer),
        }
    }
}

/// Narrow view of a `search` response
///
/// Only the path to the first matched identifier is modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query_term_list: Vec<QueryTerm>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryTerm {
    #[serde(default)]
    pub token_list: Vec<Token>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub identifier: Identifier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Identifier {
    pub value: String,
}

impl SearchResponse {
    /// Identifier of the first token of the first query term
    #[must_use]
    pub fn first_identifier(&self) -> Option<&str> {
        self.query_term_list
            .first()?
            .token_list
            .first()
            .map(|t| t.identifier.value.as_str())
    }
}
