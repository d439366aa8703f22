//! Memory Store Module
//!
//! Bounded in-process cache combining HashMap storage with LRU tracking and
//! lazy TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStore, Clock, LruTracker, SystemClock};
use crate::error::Result;
use crate::models::ProxyResponse;

// == Store State ==
/// Entries plus their access order. Only ever touched under the store lock.
#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
}

impl StoreState {
    fn get(&mut self, key: &str, now_ms: u64) -> Option<ProxyResponse> {
        let expired = self.entries.get(key)?.is_expired(now_ms);
        if expired {
            debug!(key, "memory store: dropping expired entry");
            self.delete(key);
            return None;
        }

        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&mut self, key: &str, value: &ProxyResponse, now_ms: u64, ttl: u64, max_size: usize) {
        // Re-insertion always lands at the MRU end
        self.delete(key);

        if self.entries.len() >= max_size {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                debug!(key = %evicted, "memory store: evicted least recently used entry");
            }
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(value.clone(), now_ms, ttl));
        self.lru.touch(key);
    }

    fn delete(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }

    fn exists(&mut self, key: &str, now_ms: u64) -> bool {
        self.get(key, now_ms).is_some()
    }

    fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        count
    }
}

// == Memory Store ==
/// In-process cache store with LRU eviction and TTL support.
///
/// Every operation, reads included, takes the same exclusive lock: a hit
/// reorders the LRU index, so there is no read-only path.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL in seconds for writes that don't name one
    default_ttl: u64,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a new MemoryStore on the system clock.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries, at least 1
    /// * `default_ttl` - Default TTL in seconds for entries without explicit TTL
    pub fn new(max_size: usize, default_ttl: u64) -> Self {
        Self::with_clock(max_size, default_ttl, Arc::new(SystemClock))
    }

    /// Creates a new MemoryStore reading time from `clock`.
    pub fn with_clock(max_size: usize, default_ttl: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            max_size: max_size.max(1),
            default_ttl,
            clock,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Keys from least to most recently used, expired ones included.
    pub async fn keys_by_recency(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.lru.keys_oldest_first().map(str::to_string).collect()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<ProxyResponse>> {
        let now = self.clock.now_ms();
        Ok(self.state.lock().await.get(key, now))
    }

    async fn set(&self, key: &str, value: &ProxyResponse, ttl: Option<u64>) -> Result<()> {
        let now = self.clock.now_ms();
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.state
            .lock()
            .await
            .set(key, value, now, ttl, self.max_size);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.state.lock().await.delete(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let now = self.clock.now_ms();
        Ok(self.state.lock().await.exists(key, now))
    }

    async fn clear(&self) -> Result<usize> {
        Ok(self.state.lock().await.clear())
    }

    async fn entry_count(&self) -> Option<usize> {
        Some(self.state.lock().await.entries.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
