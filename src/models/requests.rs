//! Request DTOs for the caching proxy
//!
//! Defines the normalized request description handed to the proxy core.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_method() -> String {
    "GET".to_string()
}

/// Outbound request description (POST /proxy body).
///
/// # Fields
/// - `url`: Target URL on the origin server
/// - `method`: HTTP method, defaults to `GET`
/// - `headers`: Headers forwarded to the origin (never part of the cache key)
/// - `params`: Query parameters
/// - `body`: JSON payload, or a string for non-JSON bodies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyRequest {
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl ProxyRequest {
    /// Creates a bare GET request for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: default_method(),
            ..Self::default()
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        if self.method.trim().is_empty() {
            return Some("Method cannot be empty".to_string());
        }
        None
    }

    /// Whether the method carries a request body to the origin.
    pub fn sends_body(&self) -> bool {
        matches!(
            self.method.to_ascii_uppercase().as_str(),
            "POST" | "PUT" | "PATCH"
        )
    }
}

/// Query string of POST /proxy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyQuery {
    /// Per-call TTL override in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}
