//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use crate::models::ProxyResponse;

// == Cache Entry ==
/// A stored response with its lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored response
    pub value: ProxyResponse,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry living `ttl_seconds` from `now_ms`.
    ///
    /// The `from_cache` flag is cleared so a stored entry never claims to
    /// have come from the cache before it is served.
    pub fn new(mut value: ProxyResponse, now_ms: u64, ttl_seconds: u64) -> Self {
        value.from_cache = false;
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_seconds.saturating_mul(1000)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is still fresh at exactly `expires_at` and expired strictly after.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> ProxyResponse {
        ProxyResponse::new(200, "body")
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new(response(), 10_000, 60);

        assert_eq!(entry.created_at, 10_000);
        assert_eq!(entry.expires_at, 70_000);
        assert!(!entry.is_expired(10_000));
    }

    #[test]
    fn test_entry_clears_from_cache_flag() {
        let mut value = response();
        value.from_cache = true;

        let entry = CacheEntry::new(value, 0, 60);
        assert!(!entry.value.from_cache);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(response(), 5_000, 1);

        // Fresh up to and including expires_at
        assert!(!entry.is_expired(6_000));
        assert!(entry.is_expired(6_001));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new(response(), 1, u64::MAX);
        assert_eq!(entry.expires_at, u64::MAX);
        assert!(!entry.is_expired(u64::MAX));
    }
}
