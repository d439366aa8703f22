//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ProxyError, Result};

// == Backend Kind ==
/// Which cache backend the proxy runs with. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process bounded LRU store with TTL
    Memory,
    /// Redis-backed store with native expiry
    Remote,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Remote => "remote",
        }
    }
}

impl FromStr for BackendKind {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            // "redis" is the selector older deployments use
            "remote" | "redis" => Ok(BackendKind::Remote),
            other => Err(ProxyError::Configuration(format!(
                "Unsupported cache backend: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to
    pub host: String,
    /// HTTP server port
    pub port: u16,
    /// Default TTL in seconds for cached responses
    pub cache_ttl: u64,
    /// Selected cache backend
    pub backend: BackendKind,
    /// Redis connection URL for the remote backend
    pub redis_url: String,
    /// Maximum number of entries in the memory backend
    pub max_cache_size: usize,
    /// Upper bound on any single remote store call
    pub remote_timeout: Duration,
    /// Upper bound on a single origin fetch
    pub fetch_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` - Bind address (default: 0.0.0.0)
    /// - `PORT` - HTTP server port (default: 8000)
    /// - `CACHE_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_BACKEND` - `memory` or `remote` (default: memory)
    /// - `REDIS_URL` - Remote store URL (default: redis://localhost:6379)
    /// - `MAX_CACHE_SIZE` - Memory backend capacity (default: 1000)
    /// - `REMOTE_TIMEOUT_MS` - Remote call timeout in ms (default: 2000)
    /// - `FETCH_TIMEOUT_SECS` - Origin fetch timeout in seconds (default: 30)
    ///
    /// An unknown backend or a zero cache size is rejected.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let backend = match env::var("CACHE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.backend,
        };

        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            backend,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            max_cache_size: parse_var("MAX_CACHE_SIZE").unwrap_or(defaults.max_cache_size),
            remote_timeout: parse_var("REMOTE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.remote_timeout),
            fetch_timeout: parse_var("FETCH_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the stores cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_cache_size == 0 {
            return Err(ProxyError::Configuration(
                "MAX_CACHE_SIZE must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cache_ttl: 300,
            backend: BackendKind::Memory,
            redis_url: "redis://localhost:6379".to_string(),
            max_cache_size: 1000,
            remote_timeout: Duration::from_millis(2000),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}
