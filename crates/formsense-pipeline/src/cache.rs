//! Generic in-process TTL cache.
//!
//! An explicit component instance with injected TTL and capacity, guarded
//! by a single mutex. Expired entries are evicted lazily on `get`; a
//! purge pass runs when an insert pushes the entry count past the
//! capacity. The purge removes every expired entry rather than evicting
//! down to the limit, so the cache can stay over capacity while all
//! entries are young - bounded staleness, not LRU. Concurrent writers to
//! the same key race with last-write-wins.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

/// TTL cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            capacity: 3000,
        }
    }
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Key-value store with per-entry expiry.
pub struct TtlCache<K, V> {
    config: CacheConfig,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a key, treating an expired entry as absent and evicting it.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.config.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert a value, purging expired entries when over capacity.
    pub fn set(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
        if entries.len() > self.config.capacity {
            let before = entries.len();
            let ttl = self.config.ttl;
            entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
            debug!(
                "cache purge: {} -> {} entries",
                before,
                entries.len()
            );
        }
    }

    /// Current entry count, including not-yet-evicted expired entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
