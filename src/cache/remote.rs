//! Remote Store Module
//!
//! Redis-backed cache store. Expiry is enforced by Redis itself via SETEX.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisResult};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::error::{ProxyError, Result};
use crate::models::ProxyResponse;

/// Redis-backed cache store
///
/// - One multiplexed connection, opened on first use and shared by every caller
/// - TTL support via Redis SETEX
/// - Every call bounded by `operation_timeout`
pub struct RemoteStore {
    client: Client,
    connection: OnceCell<MultiplexedConnection>,
    default_ttl: u64,
    operation_timeout: Duration,
}

impl RemoteStore {
    /// Creates a store for `url` without connecting.
    ///
    /// Fails only if the URL itself is malformed.
    pub fn new(url: &str, default_ttl: u64, operation_timeout: Duration) -> Result<Self> {
        let client = Client::open(url).map_err(|e| {
            ProxyError::Configuration(format!("Invalid remote store URL '{}': {}", url, e))
        })?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
            default_ttl,
            operation_timeout,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                let conn = self
                    .bounded("CONNECT", self.client.get_multiplexed_async_connection())
                    .await?;
                info!("Connected to remote cache store");
                Ok::<_, ProxyError>(conn)
            })
            .await?;

        Ok(conn.clone())
    }

    /// Runs one Redis call under the operation timeout.
    async fn bounded<T, F>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match timeout(self.operation_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ProxyError::StoreUnavailable(format!(
                "Redis {} error: {}",
                op, e
            ))),
            Err(_) => Err(ProxyError::StoreUnavailable(format!(
                "Redis {} timed out after {:?}",
                op, self.operation_timeout
            ))),
        }
    }
}

/// Stored form of a response. The body travels as base64 text rather than a
/// JSON array of numbers.
#[derive(Serialize, Deserialize)]
struct StoredPayload {
    status_code: u16,
    #[serde(with = "base64_body")]
    content: Vec<u8>,
    headers: HashMap<String, String>,
    #[serde(default)]
    cache_key: Option<String>,
}

mod base64_body {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(de::Error::custom)
    }
}

/// Serializes a response for storage. `from_cache` is never stored.
pub(crate) fn encode_payload(value: &ProxyResponse) -> Result<Vec<u8>> {
    let stored = StoredPayload {
        status_code: value.status_code,
        content: value.content.clone(),
        headers: value.headers.clone(),
        cache_key: value.cache_key.clone(),
    };
    Ok(serde_json::to_vec(&stored)?)
}

pub(crate) fn decode_payload(raw: &[u8]) -> Result<ProxyResponse> {
    let stored: StoredPayload = serde_json::from_slice(raw)?;
    Ok(ProxyResponse {
        status_code: stored.status_code,
        content: stored.content,
        headers: stored.headers,
        from_cache: false,
        cache_key: stored.cache_key,
    })
}

#[async_trait]
impl CacheStore for RemoteStore {
    async fn get(&self, key: &str) -> Result<Option<ProxyResponse>> {
        let mut conn = self.connection().await?;
        let raw: Option<Vec<u8>> = self.bounded("GET", conn.get(key)).await?;

        raw.map(|bytes| decode_payload(&bytes)).transpose()
    }

    async fn set(&self, key: &str, value: &ProxyResponse, ttl: Option<u64>) -> Result<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let mut conn = self.connection().await?;

        // SETEX rejects a zero expiry; a zero TTL means "keep nothing"
        if ttl == 0 {
            let _: i64 = self.bounded("DEL", conn.del(key)).await?;
            return Ok(());
        }

        let payload = encode_payload(value)?;
        let _: () = self
            .bounded("SETEX", conn.set_ex(key, payload, ttl))
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: i64 = self.bounded("DEL", conn.del(key)).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        self.bounded("EXISTS", conn.exists(key)).await
    }

    async fn clear(&self) -> Result<usize> {
        // The keyspace may be shared with other proxy instances
        warn!("clear requested on remote cache store; ignoring");
        Ok(0)
    }

    async fn entry_count(&self) -> Option<usize> {
        None
    }

    fn backend_name(&self) -> &'static str {
        "remote"
    }
}
