//! Cache-aside orchestration.
//!
//! Serves a stored response when one is fresh, otherwise fetches from the
//! origin and stores the result if policy allows.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::cache::{derive_cache_key, CachePolicy, CacheStore, ProxyStats, StatsSnapshot};
use crate::error::Result;
use crate::models::{ProxyRequest, ProxyResponse};
use crate::proxy::Fetcher;

/// The get-or-fetch-and-store protocol over one shared store.
///
/// Concurrent misses on the same key are not coalesced: each fetches from
/// the origin and the last write wins.
pub struct CachingProxy {
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    policy: CachePolicy,
    stats: ProxyStats,
    /// TTL in seconds when a call gives no override
    default_ttl: u64,
}

impl CachingProxy {
    pub fn new(store: Arc<dyn CacheStore>, fetcher: Arc<dyn Fetcher>, default_ttl: u64) -> Self {
        Self {
            store,
            fetcher,
            policy: CachePolicy,
            stats: ProxyStats::new(),
            default_ttl,
        }
    }

    /// The underlying store, for the administrative endpoints.
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Handles one proxied request.
    ///
    /// `ttl` overrides the default lifetime of a newly stored response;
    /// `Some(0)` falls back to the default like `None`. A failed cache read is
    /// returned as an error rather than treated as a miss. A failed cache
    /// write is logged and the origin response is still returned.
    pub async fn handle(&self, request: &ProxyRequest, ttl: Option<u64>) -> Result<ProxyResponse> {
        self.stats.record_request();
        let key = derive_cache_key(request);

        match self.store.get(&key).await {
            Ok(Some(mut cached)) => {
                self.stats.record_hit();
                debug!(key = %key, url = %request.url, "cache hit");
                cached.from_cache = true;
                cached.cache_key = Some(key);
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => {
                error!(key = %key, error = %e, "cache read failed");
                return Err(e);
            }
        }

        self.stats.record_miss();
        debug!(key = %key, url = %request.url, "cache miss, fetching from origin");

        let mut response = self.fetcher.fetch(request).await.map_err(|e| {
            warn!(url = %request.url, error = %e, "origin fetch failed");
            e
        })?;
        response.cache_key = Some(key.clone());
        response.from_cache = false;

        if self
            .policy
            .is_cacheable(response.status_code, &response.headers)
        {
            let ttl = ttl.filter(|t| *t > 0).unwrap_or(self.default_ttl);
            if let Err(e) = self.store.set(&key, &response, Some(ttl)).await {
                warn!(key = %key, error = %e, "cache write failed, serving uncached response");
            }
        } else {
            debug!(key = %key, status = response.status_code, "response not cacheable");
        }

        Ok(response)
    }
}
