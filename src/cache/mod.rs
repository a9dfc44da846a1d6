//! Bounded in-memory preview cache.
//!
//! Both the resolver and every client own one [`PreviewCache`] each. The two
//! are never synchronized; a client cache only ever holds records it received
//! from the resolver (or none at all).
//!
//! # Eviction
//!
//! Entries are kept in insertion order. Every store into a full cache first
//! removes the single oldest-inserted entry. Lookups never
//! reorder entries, so a frequently read entry is evicted just as early as
//! one that was never read. This is FIFO-on-overflow, not access-recency LRU.
//!
//! There is no removal or invalidation API; entries live until they are
//! pushed out or the owning cache is dropped.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use tracing::debug;

use crate::telemetry;
use crate::types::PreviewRecord;

/// Default capacity of the resolver's authoritative cache.
pub const DEFAULT_RESOLVER_CAPACITY: usize = 100;

/// Default capacity of a client-side cache.
pub const DEFAULT_CLIENT_CAPACITY: usize = 50;

/// Configuration for a [`PreviewCache`].
///
/// ```rust
/// # use linkpeek::CacheConfig;
/// let config = CacheConfig::new().capacity(10);
/// assert_eq!(config.capacity, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries. Zero disables caching.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_RESOLVER_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Create a new config with the resolver-side default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries.
    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }
}

type Entries = LruCache<String, PreviewRecord>;

/// Insertion-ordered preview cache keyed by exact URL string.
///
/// Interior mutability lets the owner share it behind `&self` across
/// concurrently running resolutions. `scope` labels log lines and metrics
/// (`"resolver"`, `"client"`).
///
/// Backed by [`LruCache`], but only through its non-promoting calls
/// (`peek`, `peek_mut`, `contains`), so its recency order is insertion order.
pub struct PreviewCache {
    scope: &'static str,
    capacity: usize,
    // `None` when the capacity is zero.
    entries: Option<Mutex<Entries>>,
}

impl PreviewCache {
    /// Create an empty cache holding at most `capacity` records.
    pub fn new(scope: &'static str, capacity: usize) -> Self {
        Self {
            scope,
            capacity,
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    /// Create a cache from a [`CacheConfig`].
    pub fn with_config(scope: &'static str, config: &CacheConfig) -> Self {
        Self::new(scope, config.capacity)
    }

    /// Look up the record for `url`.
    ///
    /// Returns `None` on a miss. Never changes eviction order.
    pub fn get(&self, url: &str) -> Option<PreviewRecord> {
        let hit = self.lock().and_then(|entries| entries.peek(url).cloned());
        if hit.is_some() {
            debug!(scope = self.scope, url, "preview cache hit");
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "scope" => self.scope).increment(1);
        } else {
            debug!(scope = self.scope, url, "preview cache miss");
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "scope" => self.scope).increment(1);
        }
        hit
    }

    /// Store `record` under `url`.
    ///
    /// Storing into a full cache first evicts the oldest-inserted entry,
    /// even when `url` is already cached. If `url` survives that eviction
    /// its record is replaced in place and keeps its position; otherwise it
    /// is inserted as the newest entry.
    pub fn put(&self, url: impl Into<String>, record: PreviewRecord) {
        let Some(mut entries) = self.lock() else {
            return;
        };
        let url = url.into();

        if entries.len() >= self.capacity {
            if let Some((oldest, _)) = entries.pop_lru() {
                debug!(scope = self.scope, url = %oldest, "evicted oldest preview");
                metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL, "scope" => self.scope)
                    .increment(1);
            }
        }

        match entries.peek_mut(&url) {
            Some(existing) => *existing = record,
            None => {
                entries.push(url, record);
            }
        }
    }

    /// Whether a record for `url` is cached. Does not count as a hit or miss.
    pub fn contains(&self, url: &str) -> bool {
        self.lock().is_some_and(|entries| entries.contains(url))
    }

    /// Cached keys, oldest first.
    pub fn keys(&self) -> Vec<String> {
        self.lock()
            .map(|entries| entries.iter().rev().map(|(url, _)| url.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of entries currently in the cache.
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |entries| entries.len())
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Label used in logs and metrics.
    pub fn scope(&self) -> &'static str {
        self.scope
    }

    // Entries stay consistent across a panic mid-update, so a poisoned lock
    // is still usable.
    fn lock(&self) -> Option<MutexGuard<'_, Entries>> {
        self.entries
            .as_ref()
            .map(|entries| entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl std::fmt::Debug for PreviewCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewCache")
            .field("scope", &self.scope)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> PreviewRecord {
        PreviewRecord::fallback(url, &crate::PreviewAssets::default())
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = PreviewCache::new("test", 0);
        cache.put("https://a.test/", record("https://a.test/"));
        assert!(cache.is_empty());
        assert!(cache.get("https://a.test/").is_none());
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn overwrite_below_capacity_keeps_position() {
        let cache = PreviewCache::new("test", 3);
        cache.put("a", record("https://a.test/"));
        cache.put("b", record("https://b.test/"));

        let mut replacement = record("https://a.test/");
        replacement.title = "changed".into();
        cache.put("a", replacement);

        assert_eq!(cache.keys(), vec!["a", "b"]);
        assert_eq!(cache.get("a").unwrap().title, "changed");
    }

    #[test]
    fn overwrite_into_full_cache_evicts_oldest_first() {
        let cache = PreviewCache::new("test", 2);
        cache.put("a", record("https://a.test/"));
        cache.put("b", record("https://b.test/"));

        let mut replacement = record("https://b.test/");
        replacement.title = "changed".into();
        cache.put("b", replacement);

        assert_eq!(cache.keys(), vec!["b"]);
        assert_eq!(cache.get("b").unwrap().title, "changed");
    }

    #[test]
    fn overwrite_of_oldest_in_full_cache_reinserts_it_as_newest() {
        let cache = PreviewCache::new("test", 2);
        cache.put("a", record("https://a.test/"));
        cache.put("b", record("https://b.test/"));
        cache.put("a", record("https://a.test/"));

        assert_eq!(cache.keys(), vec!["b", "a"]);
    }

    #[test]
    fn keys_are_oldest_first() {
        let cache = PreviewCache::new("test", 3);
        for key in ["x", "y", "z", "w"] {
            cache.put(key, record("https://k.test/"));
        }
        assert_eq!(cache.keys(), vec!["y", "z", "w"]);
    }
}
