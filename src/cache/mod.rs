//! Cache Module
//!
//! Request fingerprinting, cacheability policy, hit/miss counters and the two
//! cache backends (bounded in-memory LRU+TTL, and Redis).

mod backend;
mod clock;
mod entry;
mod key;
mod lru;
mod memory;
mod policy;
mod remote;
mod stats;
mod traits;


// Re-export public types
pub use backend::CacheBackend;
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::derive_cache_key;
pub use lru::LruTracker;
pub use memory::MemoryStore;
pub use policy::{CachePolicy, CACHEABLE_STATUSES};
pub use remote::RemoteStore;
pub use stats::{ProxyStats, StatsSnapshot};
pub use traits::CacheStore;
