//! In-memory response cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entry::{CacheEntry, Revalidation};
use super::keys::CacheKey;
use crate::metrics::CacheMetrics;

/// Configuracion del cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied by [`ResponseCache::set`] (default: 5 minutes).
    #[serde(default = "default_ttl", with = "humantime_serde")]
    pub default_ttl: Duration,
}

fn default_ttl() -> Duration {
    Duration::from_secs(300)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
        }
    }
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    /// Sum of payload sizes in bytes.
    pub total_size: usize,
    #[serde(with = "humantime_serde")]
    pub default_ttl: Duration,
}

/// Result of a cache lookup that distinguishes expired entries from absent ones.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// A live entry.
    Fresh(Bytes),
    /// The entry had expired. It has been removed from the cache and is handed
    /// back so its revalidation tokens can drive a conditional fetch.
    Expired(CacheEntry),
    /// No entry for the key.
    Missing,
}

/// Thread-safe cache of validated response bodies.
///
/// Reads take a shared lock; any mutation, including the lazy eviction of an
/// expired entry discovered by a read, takes the exclusive lock. The cache
/// never performs I/O.
///
/// # Examples
///
/// ```
/// use hugo_reader_core::{CacheKey, ResponseCache, Revalidation};
///
/// let cache = ResponseCache::with_defaults();
/// let key = CacheKey::build("https://example.com", "/index.json", [("taxonomy", "tags")]);
///
/// cache.set(key.clone(), br#"{"pages":[]}"#, Revalidation::none());
/// assert!(cache.get(&key).is_some());
/// ```
#[derive(Debug)]
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    config: CacheConfig,
    metrics: CacheMetrics,
}

impl ResponseCache {
    /// Crea un nuevo cache con la configuracion dada.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            metrics: CacheMetrics::new(),
        }
    }

    /// Creates a cache with a 5 minute default TTL.
    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    /// Creates a cache with the given default TTL.
    pub fn with_ttl(default_ttl: Duration) -> Self {
        Self::new(CacheConfig { default_ttl })
    }

    /// Returns the TTL used by [`set`](Self::set).
    pub fn default_ttl(&self) -> Duration {
        self.config.default_ttl
    }

    /// Returns the metrics recorder of this cache.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Returns the payload for `key` if present and not expired.
    ///
    /// An expired entry found here is removed before returning `None`.
    pub fn get(&self, key: &CacheKey) -> Option<Bytes> {
        match self.lookup(key) {
            Lookup::Fresh(payload) => Some(payload),
            Lookup::Expired(_) | Lookup::Missing => None,
        }
    }

    /// Looks up `key`, returning expired entries separately from misses.
    pub fn lookup(&self, key: &CacheKey) -> Lookup {
        let now = Instant::now();

        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => {
                    self.metrics.record_miss();
                    return Lookup::Missing;
                },
                Some(entry) if !entry.is_expired_at(now) => {
                    self.metrics.record_hit();
                    return Lookup::Fresh(entry.payload().clone());
                },
                Some(_) => {},
            }
        }

        // Re-check under the write lock: a concurrent set may have refreshed it.
        let mut entries = self.entries.write();
        let outcome = match entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                let expired = entries.remove(key);
                self.metrics.record_eviction("ttl");
                debug!(key = %key, "Expired cache entry evicted on access");
                expired.map_or(Lookup::Missing, Lookup::Expired)
            },
            Some(entry) => {
                self.metrics.record_hit();
                return Lookup::Fresh(entry.payload().clone());
            },
            None => Lookup::Missing,
        };
        self.metrics.record_miss();
        self.metrics.update_entry_count(entries.len());
        outcome
    }

    /// Stores a copy of `payload` under `key` with the default TTL.
    ///
    /// Overwrites any existing entry and restarts its lifetime.
    pub fn set(&self, key: CacheKey, payload: &[u8], revalidation: Revalidation) {
        self.set_with_ttl(key, payload, revalidation, self.config.default_ttl);
    }

    /// Stores a copy of `payload` under `key` with an explicit TTL.
    pub fn set_with_ttl(
        &self,
        key: CacheKey,
        payload: &[u8],
        revalidation: Revalidation,
        ttl: Duration,
    ) {
        let entry = CacheEntry::new(payload, revalidation, ttl);
        let mut entries = self.entries.write();
        if entries.insert(key, entry).is_some() {
            self.metrics.record_eviction("replaced");
        }
        self.metrics.update_entry_count(entries.len());
    }

    /// Removes the entry for `key`. Returns true if one was present.
    pub fn delete(&self, key: &CacheKey) -> bool {
        let mut entries = self.entries.write();
        let removed = entries.remove(key).is_some();
        if removed {
            self.metrics.record_eviction("manual");
            self.metrics.update_entry_count(entries.len());
        }
        removed
    }

    /// Removes every entry and returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        self.metrics.update_entry_count(0);
        debug!(count = count, "Cache cleared");
        count
    }

    /// Removes all expired entries in one pass and returns the count.
    pub fn clean_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();

        for _ in 0..removed {
            self.metrics.record_eviction("ttl");
        }
        self.metrics.update_entry_count(entries.len());
        removed
    }

    /// Returns statistics without evicting anything.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read();

        CacheStats {
            total_entries: entries.len(),
            expired_entries: entries.values().filter(|e| e.is_expired_at(now)).count(),
            total_size: entries.values().map(CacheEntry::size).sum(),
            default_ttl: self.config.default_ttl,
        }
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns true if an entry exists for `key`, expired or not.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Removes every entry whose key satisfies `predicate`.
    pub(crate) fn remove_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CacheKey) -> bool,
    {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !predicate(key));
        let removed = before - entries.len();
        self.metrics.update_entry_count(entries.len());
        removed
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const NO_PARAMS: [(&str, &str); 0] = [];

    fn key(path: &str) -> CacheKey {
        CacheKey::build("https://example.com", path, NO_PARAMS)
    }

    #[test]
    fn test_set_and_get() {
        let cache = ResponseCache::with_defaults();
        cache.set(key("/index.json"), b"{}", Revalidation::none());

        assert_eq!(cache.get(&key("/index.json")).as_deref(), Some(&b"{}"[..]));
        assert!(cache.get(&key("/other.json")).is_none());
        assert_eq!(cache.metrics().hits(), 1);
        assert_eq!(cache.metrics().misses(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = ResponseCache::with_defaults();
        cache.set(key("/a.json"), b"one", Revalidation::none());
        cache.set(key("/a.json"), b"two", Revalidation::none());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("/a.json")).as_deref(), Some(&b"two"[..]));
    }

    #[test]
    fn test_expired_entry_evicted_on_get() {
        let cache = ResponseCache::with_ttl(Duration::from_millis(10));
        cache.set(key("/a.json"), b"x", Revalidation::none());
        sleep(Duration::from_millis(30));

        assert!(cache.contains(&key("/a.json")));
        assert!(cache.get(&key("/a.json")).is_none());
        assert!(!cache.contains(&key("/a.json")));
    }

    #[test]
    fn test_lookup_returns_expired_entry() {
        let cache = ResponseCache::with_ttl(Duration::from_millis(10));
        let tokens = Revalidation::new(Some("\"v1\"".into()), None);
        cache.set(key("/a.json"), b"x", tokens.clone());
        sleep(Duration::from_millis(30));

        match cache.lookup(&key("/a.json")) {
            Lookup::Expired(entry) => {
                assert_eq!(entry.revalidation(), &tokens);
                assert_eq!(entry.payload().as_ref(), b"x");
            },
            other => panic!("expected expired entry, got {other:?}"),
        }
        assert!(matches!(cache.lookup(&key("/a.json")), Lookup::Missing));
    }

    #[test]
    fn test_set_with_ttl_overrides_default() {
        let cache = ResponseCache::with_ttl(Duration::from_millis(10));
        cache.set_with_ttl(
            key("/a.json"),
            b"x",
            Revalidation::none(),
            Duration::from_secs(60),
        );
        sleep(Duration::from_millis(30));

        assert!(cache.get(&key("/a.json")).is_some());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let cache = ResponseCache::with_defaults();
        cache.set(key("/a.json"), b"x", Revalidation::none());

        assert!(cache.delete(&key("/a.json")));
        assert!(!cache.delete(&key("/a.json")));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_returns_count() {
        let cache = ResponseCache::with_defaults();
        cache.set(key("/a.json"), b"x", Revalidation::none());
        cache.set(key("/b.json"), b"y", Revalidation::none());

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clean_expired_counts_only_expired() {
        let cache = ResponseCache::with_ttl(Duration::from_millis(10));
        cache.set(key("/a.json"), b"x", Revalidation::none());
        cache.set(key("/b.json"), b"y", Revalidation::none());
        cache.set_with_ttl(
            key("/c.json"),
            b"z",
            Revalidation::none(),
            Duration::from_secs(60),
        );
        sleep(Duration::from_millis(30));

        assert_eq!(cache.clean_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.clean_expired(), 0);
    }

    #[test]
    fn test_stats_do_not_evict() {
        let cache = ResponseCache::with_ttl(Duration::from_millis(10));
        cache.set(key("/a.json"), b"12345", Revalidation::none());
        sleep(Duration::from_millis(30));
        cache.set(key("/b.json"), b"123", Revalidation::none());

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.total_size, 8);
        assert_eq!(stats.default_ttl, Duration::from_millis(10));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_stats_serialize_ttl_as_human_duration() {
        let cache = ResponseCache::with_defaults();
        let json = serde_json::to_value(cache.stats()).unwrap();

        assert_eq!(json["default_ttl"], "5m");
        assert_eq!(json["total_entries"], 0);
    }

    #[test]
    fn test_config_deserialize() {
        let config: CacheConfig = serde_json::from_str(r#"{"default_ttl":"2m"}"#).unwrap();
        assert_eq!(config.default_ttl, Duration::from_secs(120));

        let config: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.default_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        use std::sync::Arc;

        let cache = Arc::new(ResponseCache::with_defaults());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for j in 0..100 {
                        let k = key(&format!("/{}.json", j % 10));
                        if i % 2 == 0 {
                            cache.set(k, format!("{i}-{j}").as_bytes(), Revalidation::none());
                        } else {
                            let _ = cache.get(&k);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 10);
    }
}
