//! Caching infrastructure for external nutrient lookups
//!
//! External tier lookups are network calls against food-composition APIs
//! whose answers never change within a process lifetime, so each tier
//! client keeps an in-process cache keyed by resolved food identifier.
//!
//! ## Semantics
//!
//! - **Insert-if-absent**: the first computed value for a key wins; a
//!   concurrent duplicate lookup never replaces it. Cache hits therefore
//!   return results identical to the original lookup.
//! - **No expiry by default**: nutrition facts are stable for the process
//!   lifetime. A TTL can still be set where bounded staleness is wanted
//!   (e.g. the CNF food list).
//! - **Concurrent**: reads and inserts are safe from multiple request
//!   tasks; values are immutable once stored.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Cache entry with an optional expiration time
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Instant::now() > at,
            None => false,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Total number of live entries
    pub entries: usize,
    /// Number of hits
    pub hits: u64,
    /// Number of misses
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate in [0, 1]; 0 when the cache has never been queried.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe lookup cache with insert-if-absent discipline.
#[derive(Debug)]
pub struct LookupCache<K, V> {
    data: RwLock<HashMap<K, CacheEntry<V>>>,
    stats: RwLock<CacheStats>,
    /// Default TTL applied to inserts; `None` means process lifetime
    ttl: Option<Duration>,
}

impl<K, V> LookupCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Create a cache whose entries live for the process lifetime.
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    /// Create a cache with a default time-to-live for every entry.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
            ttl,
        }
    }

    /// Get a value, counting the hit or miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let data = self.data.read();
        let mut stats = self.stats.write();

        match data.get(key) {
            Some(entry) if !entry.is_expired() => {
                stats.hits += 1;
                Some(entry.value.clone())
            }
            _ => {
                stats.misses += 1;
                None
            }
        }
    }

    /// Insert a value unless a live entry already exists for the key.
    /// Returns the value now stored under the key.
    pub fn insert_if_absent(&self, key: K, value: V) -> V {
        let mut data = self.data.write();

        match data.get(&key) {
            Some(entry) if !entry.is_expired() => entry.value.clone(),
            _ => {
                let entry = CacheEntry {
                    value: value.clone(),
                    expires_at: self.ttl.map(|ttl| Instant::now() + ttl),
                };
                data.insert(key, entry);
                value
            }
        }
    }

    /// Drop expired entries.
    pub fn cleanup(&self) {
        let mut data = self.data.write();
        let initial_len = data.len();

        data.retain(|_, entry| !entry.is_expired());

        let removed = initial_len - data.len();
        if removed > 0 {
            tracing::debug!("Cache cleanup removed {} expired entries", removed);
        }
    }

    /// Current statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        let mut stats = *self.stats.read();
        stats.entries = self.data.read().len();
        stats
    }

    /// Number of live entries (expired entries included until cleanup).
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Clear all entries and reset statistics.
    pub fn clear(&self) {
        self.data.write().clear();
        *self.stats.write() = CacheStats::default();
    }
}

impl<K, V> Default for LookupCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_if_absent_keeps_first_value() {
        let cache: LookupCache<String, u32> = LookupCache::new();

        let stored = cache.insert_if_absent("gouda".to_string(), 1);
        assert_eq!(stored, 1);

        // A second insert for the same key must not replace the value
        let stored = cache.insert_if_absent("gouda".to_string(), 2);
        assert_eq!(stored, 1);
        assert_eq!(cache.get(&"gouda".to_string()), Some(1));
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let cache: LookupCache<String, u32> = LookupCache::new();
        cache.insert_if_absent("rice".to_string(), 7);

        assert_eq!(cache.get(&"rice".to_string()), Some(7));
        assert_eq!(cache.get(&"missing".to_string()), None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn ttl_expires_entries() {
        let cache: LookupCache<String, u32> =
            LookupCache::with_ttl(Some(Duration::from_millis(0)));
        cache.insert_if_absent("salmon".to_string(), 3);

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"salmon".to_string()), None);

        cache.cleanup();
        assert!(cache.is_empty());
    }
}
