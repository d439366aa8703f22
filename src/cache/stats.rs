//! Proxy Statistics Module
//!
//! Tracks request totals and cache hits and misses.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Proxy Stats ==
/// Process-lifetime request counters, safe to bump from concurrent requests.
#[derive(Debug, Default)]
pub struct ProxyStats {
    total_requests: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Point-in-time copy of [`ProxyStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Requests handled
    pub total_requests: u64,
    /// Requests served from the cache
    pub hits: u64,
    /// Requests forwarded to the origin
    pub misses: u64,
}

impl ProxyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Returns hits / total_requests, or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_requests as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_stats_new() {
        let snap = ProxyStats::new().snapshot();
        assert_eq!(snap, StatsSnapshot::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(ProxyStats::new().snapshot().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = ProxyStats::new();
        for _ in 0..3 {
            stats.record_request();
            stats.record_miss();
        }
        stats.record_request();
        stats.record_hit();

        let snap = stats.snapshot();
        assert_eq!(snap.total_requests, 4);
        assert_eq!(snap.hits, 1);
        assert_eq!(snap.misses, 3);
        assert_eq!(snap.hit_rate(), 0.25);
    }

    #[test]
    fn test_counters_under_threads() {
        let stats = Arc::new(ProxyStats::new());
        let threads: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        stats.record_request();
                        stats.record_hit();
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        let snap = stats.snapshot();
        assert_eq!(snap.total_requests, 4000);
        assert_eq!(snap.hit_rate(), 1.0);
    }
}
