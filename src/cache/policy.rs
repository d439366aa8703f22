//! Cacheability policy.

use std::collections::HashMap;

/// Status codes whose responses may be stored.
pub const CACHEABLE_STATUSES: [u16; 3] = [200, 301, 302];

/// Decides whether an origin response may be stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CachePolicy;

impl CachePolicy {
    /// A response is cacheable when its status is 200, 301 or 302 and its
    /// `Cache-Control` header carries neither `no-store` nor `no-cache`.
    pub fn is_cacheable(&self, status_code: u16, headers: &HashMap<String, String>) -> bool {
        if !CACHEABLE_STATUSES.contains(&status_code) {
            return false;
        }

        let forbidden = headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("cache-control"))
            .any(|(_, value)| forbids_storage(value));

        !forbidden
    }
}

/// Whether a Cache-Control value holds a `no-store` or `no-cache` directive.
fn forbids_storage(cache_control: &str) -> bool {
    cache_control.split(',').any(|directive| {
        let name = directive.split('=').next().unwrap_or("").trim();
        name.eq_ignore_ascii_case("no-store") || name.eq_ignore_ascii_case("no-cache")
    })
}
