//! Response DTOs for the caching proxy
//!
//! Defines the response descriptor the proxy core produces and the bodies
//! returned by the administrative endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Response descriptor produced by the proxy core.
///
/// This is also the value held by every cache backend. Stores always hold
/// it with `from_cache == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyResponse {
    /// Origin status code
    pub status_code: u16,
    /// Raw response body
    pub content: Vec<u8>,
    /// Response headers, lowercase names
    pub headers: HashMap<String, String>,
    /// Whether this response was served from the cache
    #[serde(default)]
    pub from_cache: bool,
    /// Fingerprint of the request that produced this response
    #[serde(default)]
    pub cache_key: Option<String>,
}

impl ProxyResponse {
    /// Creates a fresh origin response with no cache metadata.
    pub fn new(status_code: u16, content: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            content: content.into(),
            headers: HashMap::new(),
            from_cache: false,
            cache_key: None,
        }
    }

    /// Adds a header, normalising the name to lowercase.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }
}

/// JSON body of POST /proxy. Content is rendered as UTF-8 text.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyReply {
    pub status_code: u16,
    pub content: String,
    pub headers: HashMap<String, String>,
    pub from_cache: bool,
    pub cache_key: Option<String>,
}

impl From<ProxyResponse> for ProxyReply {
    fn from(response: ProxyResponse) -> Self {
        Self {
            status_code: response.status_code,
            content: String::from_utf8_lossy(&response.content).into_owned(),
            headers: response.headers,
            from_cache: response.from_cache,
            cache_key: response.cache_key,
        }
    }
}

/// Response body for GET /cache/info/:key
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfoResponse {
    pub key: String,
    pub exists: bool,
    pub status_code: u16,
    pub from_cache: bool,
}

impl CacheInfoResponse {
    /// Describes a stored entry
    pub fn new(key: impl Into<String>, stored: &ProxyResponse) -> Self {
        Self {
            key: key.into(),
            exists: true,
            status_code: stored.status_code,
            from_cache: stored.from_cache,
        }
    }
}

/// Response body for the delete and clear endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Human readable outcome
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Requests handled by the proxy core
    pub total_requests: u64,
    /// Requests served from the cache
    pub hits: u64,
    /// Requests forwarded to the origin
    pub misses: u64,
    /// hits / total_requests, 0 when idle
    pub hit_rate: f64,
    /// Active backend name
    pub cache_backend: String,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Active backend name
    pub cache_backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache_backend: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            cache_backend: cache_backend.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
