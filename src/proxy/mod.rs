//! Proxy Module
//!
//! The cache-aside protocol and the origin fetcher it delegates misses to.

mod fetcher;
mod orchestrator;

pub use fetcher::{flatten_headers, Fetcher, HttpFetcher, SET_COOKIE_SEPARATOR};
pub use orchestrator::CachingProxy;
