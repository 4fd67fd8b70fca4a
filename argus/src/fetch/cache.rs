//! Bounded TTL cache for fetch responses.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use argus_core::{CacheKey, FetchResponse};
use argus_types::CacheConfig;
use lru::LruCache;
use tokio::sync::Mutex;

struct Entry {
    response: FetchResponse,
    expires_at: Instant,
}

/// LRU-bounded response cache with lazy time-based expiry.
///
/// A TTL of zero disables the cache entirely: lookups miss and writes are
/// dropped.
pub(crate) struct ResponseCache {
    inner: Mutex<LruCache<CacheKey, Entry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub(crate) fn new(cfg: CacheConfig) -> Self {
        // Avoid zero capacity panics
        let cap = NonZeroUsize::new(cfg.capacity.max(1)).unwrap();
        Self {
            inner: Mutex::new(LruCache::new(cap)),
            ttl: cfg.ttl,
        }
    }

    /// Fresh cached response for `key`, marked as a cache hit. Expired
    /// entries are evicted on the way out.
    pub(crate) async fn get(&self, key: &CacheKey) -> Option<FetchResponse> {
        if self.ttl.is_zero() {
            return None;
        }
        let mut guard = self.inner.lock().await;
        if let Some(entry) = guard.get(key)
            && Instant::now() <= entry.expires_at
        {
            let mut hit = entry.response.clone();
            hit.cached = true;
            hit.latency = Duration::ZERO;
            return Some(hit);
        }
        // Expired or absent: drop whatever was there and miss.
        guard.pop(key);
        None
    }

    pub(crate) async fn put(&self, key: CacheKey, response: FetchResponse) {
        if self.ttl.is_zero() {
            return;
        }
        let expires_at = Instant::now() + self.ttl;
        let mut guard = self.inner.lock().await;
        guard.put(
            key,
            Entry {
                response,
                expires_at,
            },
        );
    }
}
