//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Unified error type for the caching proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Invalid startup configuration (unknown backend, bad store target)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote store unreachable, timed out, or returned a protocol error
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored payload could not be encoded or decoded
    #[error("Serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Origin server unreachable or returned a non-HTTP error
    #[error("Upstream fetch failed: {0}")]
    Fetch(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache key not found
    #[error("Cache key not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ProxyError::StoreUnavailable(_) | ProxyError::Serialization(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ProxyError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let bad_json = serde_json::from_str::<u32>("nope").unwrap_err();
        let cases = vec![
            (ProxyError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (ProxyError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (ProxyError::Fetch("down".into()), StatusCode::BAD_GATEWAY),
            (
                ProxyError::StoreUnavailable("timeout".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ProxyError::Serialization(bad_json),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ProxyError::Configuration("backend".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_messages_name_the_failure() {
        let err = ProxyError::StoreUnavailable("connection refused".into());
        assert_eq!(
            err.to_string(),
            "Cache store unavailable: connection refused"
        );
    }
}
