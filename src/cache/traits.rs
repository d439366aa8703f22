//! Cache store trait.
//!
//! The capability set every cache backend provides. Callers hold an
//! `Arc<dyn CacheStore>` and never know which backend is active.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ProxyResponse;

/// Storage for responses keyed by request fingerprint, with per-entry TTL.
///
/// Implementations must be safe to share across concurrently running
/// requests.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored response, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<ProxyResponse>>;

    /// Stores `value` under `key`.
    ///
    /// `ttl` is in seconds; `None` selects the backend's default.
    async fn set(&self, key: &str, value: &ProxyResponse, ttl: Option<u64>) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Whether a fresh entry is stored under `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Removes every entry this store owns and returns how many were dropped.
    async fn clear(&self) -> Result<usize>;

    /// Number of live entries, when the backend can tell cheaply.
    async fn entry_count(&self) -> Option<usize>;

    /// Short backend name for stats and health output.
    fn backend_name(&self) -> &'static str;
}
