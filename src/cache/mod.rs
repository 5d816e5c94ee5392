//! Bounded in-memory response cache.
//!
//! # Responsibilities
//! - Store buffered origin responses keyed by the verbatim remote URL
//! - Expire entries after a fixed TTL
//! - Evict the least-recently-used entry when capacity is exceeded
//!
//! # Design Decisions
//! - One mutex around get/put; entries are replaced wholesale, never
//!   mutated in place, so no finer-grained locking is needed
//! - TTL is checked at lookup time: an expired entry is a miss and is
//!   removed on the spot
//! - Operations never fail, they only hit or miss

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use bytes::Bytes;
use lru::LruCache;

/// A buffered origin response held by the cache.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub headers: HeaderMap,
    pub body: Bytes,
}

struct Entry {
    response: CachedResponse,
    stored_at: Instant,
}

/// Fixed-capacity TTL + LRU cache shared by all in-flight requests.
///
/// Constructed once at startup and handed to every handler through the
/// application state; the lock is only ever held across the synchronous
/// map operation, never across an await point.
pub struct ResponseCache {
    entries: Mutex<LruCache<String, Entry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` entries, each valid
    /// for `ttl` after being stored.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Look up a response by its remote URL.
    ///
    /// A hit refreshes the entry's recency. An entry past its TTL is
    /// treated as absent and removed.
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.response.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    /// Store a response under its remote URL, evicting the
    /// least-recently-used entry if the cache is full.
    pub fn put(&self, key: String, response: CachedResponse) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.put(
            key,
            Entry {
                response,
                stored_at: Instant::now(),
            },
        );
    }
}
