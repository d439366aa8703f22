//! Cache Proxy - A caching HTTP proxy
//!
//! Serves repeated requests from a bounded in-memory LRU/TTL store or Redis,
//! and forwards everything else to the origin.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;

pub use api::AppState;
pub use config::{BackendKind, Config};
pub use error::{ProxyError, Result};
pub use proxy::{CachingProxy, Fetcher, HttpFetcher};
