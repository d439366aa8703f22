//! Backend selection.
//!
//! The proxy runs with exactly one of two stores, picked from configuration
//! at startup.

use async_trait::async_trait;

use crate::cache::{CacheStore, MemoryStore, RemoteStore};
use crate::config::{BackendKind, Config};
use crate::error::Result;
use crate::models::ProxyResponse;

/// The configured cache store.
pub enum CacheBackend {
    Memory(MemoryStore),
    Remote(RemoteStore),
}

impl CacheBackend {
    /// Builds the backend named by `config.backend`.
    ///
    /// The remote variant does not connect until first use.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.backend {
            BackendKind::Memory => Ok(CacheBackend::Memory(MemoryStore::new(
                config.max_cache_size,
                config.cache_ttl,
            ))),
            BackendKind::Remote => Ok(CacheBackend::Remote(RemoteStore::new(
                &config.redis_url,
                config.cache_ttl,
                config.remote_timeout,
            )?)),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            CacheBackend::Memory(_) => BackendKind::Memory,
            CacheBackend::Remote(_) => BackendKind::Remote,
        }
    }

    fn store(&self) -> &dyn CacheStore {
        match self {
            CacheBackend::Memory(store) => store,
            CacheBackend::Remote(store) => store,
        }
    }
}

#[async_trait]
impl CacheStore for CacheBackend {
    async fn get(&self, key: &str) -> Result<Option<ProxyResponse>> {
        self.store().get(key).await
    }

    async fn set(&self, key: &str, value: &ProxyResponse, ttl: Option<u64>) -> Result<()> {
        self.store().set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store().delete(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.store().exists(key).await
    }

    async fn clear(&self) -> Result<usize> {
        self.store().clear().await
    }

    async fn entry_count(&self) -> Option<usize> {
        self.store().entry_count().await
    }

    fn backend_name(&self) -> &'static str {
        self.kind().as_str()
    }
}
