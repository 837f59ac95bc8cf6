//! Caching layer
//!
//! - [`LruCache`]: thread-safe LRU map with hit/miss statistics, used for
//!   reference sequence windows and variation sites.
//! - [`SiteCache`]: fetch-or-return-cached lookup of [`VariationSite`]s by
//!   numeric identifier, backed by a caller-supplied [`SiteSource`].
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use ferro_alleles::cache::SiteCache;
//! use ferro_alleles::coords::Strand;
//! use ferro_alleles::variation::VariationSite;
//!
//! let mut store = HashMap::new();
//! store.insert(1, VariationSite::new(1, "rs1", "chr1", 10, 10, Strand::Plus, "A/G"));
//!
//! let cache = SiteCache::new(store, 100);
//! let site = cache.resolve(1).unwrap();
//! assert_eq!(site.name, "rs1");
//! assert!(cache.resolve(2).is_err());
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::FerroError;
use crate::variation::VariationSite;

/// Statistics for cache usage
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of items currently in cache
    pub size: usize,
    /// Maximum cache capacity
    pub capacity: usize,
    /// Number of evictions
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    /// Miss rate as a percentage
    pub fn miss_rate(&self) -> f64 {
        100.0 - self.hit_rate()
    }
}

type Entries<K, V> = HashMap<K, (V, AtomicU64)>;

/// Thread-safe LRU cache
///
/// Each entry carries its last access stamp as an atomic, so reads refresh
/// recency while holding only the shared lock.
pub struct LruCache<K: Hash + Eq + Clone, V: Clone> {
    entries: RwLock<Entries<K, V>>,
    capacity: usize,
    access_counter: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    /// Create a new LRU cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            capacity,
            access_counter: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    // A poisoned lock only means another thread panicked mid-insert; the map
    // itself is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Entries<K, V>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries<K, V>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Get a value from the cache
    ///
    /// Statistics counters use `Relaxed` ordering; counts may be slightly
    /// off under heavy concurrent access.
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.read();
        if let Some((value, last_access)) = entries.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            last_access.store(self.next_access(), Ordering::Relaxed);
            Some(value.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Insert a value, evicting the least recently used entry when full
    pub fn insert(&self, key: K, value: V) {
        let access = self.next_access();
        let mut entries = self.write();

        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            self.evict_lru(&mut entries);
        }

        entries.insert(key, (value, AtomicU64::new(access)));
    }

    fn next_access(&self) -> u64 {
        self.access_counter.fetch_add(1, Ordering::Relaxed)
    }

    fn evict_lru(&self, entries: &mut Entries<K, V>) {
        if let Some(lru_key) = entries
            .iter()
            .min_by_key(|(_, (_, access))| access.load(Ordering::Relaxed))
            .map(|(k, _)| k.clone())
        {
            entries.remove(&lru_key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Remove every entry (statistics are kept)
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Snapshot of the cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = self.read();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: entries.len(),
            capacity: self.capacity,
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Number of items in the cache
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True if the cache holds nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Backing store for variation sites, keyed by numeric identifier
pub trait SiteSource {
    /// Fetch a site, returning `Ok(None)` if the source has no such id
    fn fetch(&self, id: u64) -> Result<Option<VariationSite>, FerroError>;
}

impl SiteSource for HashMap<u64, VariationSite> {
    fn fetch(&self, id: u64) -> Result<Option<VariationSite>, FerroError> {
        Ok(self.get(&id).cloned())
    }
}

impl SiteSource for Vec<VariationSite> {
    fn fetch(&self, id: u64) -> Result<Option<VariationSite>, FerroError> {
        Ok(self.iter().find(|site| site.id == id).cloned())
    }
}

impl<S: SiteSource + ?Sized> SiteSource for Box<S> {
    fn fetch(&self, id: u64) -> Result<Option<VariationSite>, FerroError> {
        (**self).fetch(id)
    }
}

/// Lazily resolves variation sites by id, caching what it has fetched
pub struct SiteCache<S: SiteSource> {
    source: S,
    cache: LruCache<u64, VariationSite>,
}

impl<S: SiteSource> SiteCache<S> {
    /// Wrap `source` with a cache of at most `capacity` sites
    pub fn new(source: S, capacity: usize) -> Self {
        Self {
            source,
            cache: LruCache::new(capacity),
        }
    }

    /// Return the cached site, fetching it from the source on a miss
    pub fn resolve(&self, id: u64) -> Result<VariationSite, FerroError> {
        if let Some(site) = self.cache.get(&id) {
            return Ok(site);
        }

        let site = self
            .source
            .fetch(id)?
            .ok_or(FerroError::SiteNotFound { id })?;
        log::debug!("cached variation site {} ({})", id, site.name);
        self.cache.insert(id, site.clone());
        Ok(site)
    }

    /// Seed the cache with an already-loaded site
    pub fn insert(&self, site: VariationSite) {
        self.cache.insert(site.id, site);
    }

    /// True if `id` is currently cached (does not touch statistics)
    pub fn contains(&self, id: u64) -> bool {
        self.cache.read().contains_key(&id)
    }

    /// Drop every cached site
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Cache statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The wrapped source
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl Default for SiteCache<HashMap<u64, VariationSite>> {
    fn default() -> Self {
        Self::new(HashMap::new(), 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Strand;
    use std::cell::Cell;

    fn site(id: u64) -> VariationSite {
        VariationSite::new(id, format!("rs{}", id), "chr1", 10, 10, Strand::Plus, "A/G")
    }

    /// Counts how often the cache goes to the source
    struct CountingSource {
        calls: Cell<usize>,
    }

    impl SiteSource for CountingSource {
        fn fetch(&self, id: u64) -> Result<Option<VariationSite>, FerroError> {
            self.calls.set(self.calls.get() + 1);
            Ok((id < 10).then(|| site(id)))
        }
    }

    #[test]
    fn test_lru_cache_basic() {
        let cache: LruCache<String, i32> = LruCache::new(10);

        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);

        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.get(&"b".to_string()), Some(2));
        assert_eq!(cache.get(&"c".to_string()), None);
    }

    #[test]
    fn test_lru_cache_eviction() {
        let cache: LruCache<u64, i32> = LruCache::new(2);

        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(3, 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&3), Some(3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_lru_cache_read_refreshes_recency() {
        let cache: LruCache<u64, i32> = LruCache::new(2);

        cache.insert(1, 1);
        cache.insert(2, 2);
        assert_eq!(cache.get(&1), Some(1));
        cache.insert(3, 3);

        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(1));
        assert_eq!(cache.get(&3), Some(3));
    }

    #[test]
    fn test_lru_cache_update_existing_does_not_evict() {
        let cache: LruCache<u64, i32> = LruCache::new(2);
        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(1, 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_lru_cache_zero_capacity_is_clamped() {
        let cache: LruCache<u64, i32> = LruCache::new(0);
        cache.insert(1, 1);
        assert_eq!(cache.get(&1), Some(1));
        assert_eq!(cache.stats().capacity, 1);
    }

    #[test]
    fn test_cache_stats_rates() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 75.0).abs() < 0.01);
        assert!((stats.miss_rate() - 25.0).abs() < 0.01);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_site_cache_fetches_once() {
        let cache = SiteCache::new(CountingSource { calls: Cell::new(0) }, 10);

        assert_eq!(cache.resolve(3).unwrap().name, "rs3");
        assert_eq!(cache.resolve(3).unwrap().name, "rs3");
        assert_eq!(cache.source().calls.get(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!(cache.contains(3));
    }

    #[test]
    fn test_site_cache_not_found() {
        let cache = SiteCache::new(CountingSource { calls: Cell::new(0) }, 10);
        let err = cache.resolve(42).unwrap_err();
        assert!(matches!(err, FerroError::SiteNotFound { id: 42 }));
        assert!(!cache.contains(42));
    }

    #[test]
    fn test_site_cache_insert_and_clear() {
        let cache = SiteCache::default();
        cache.insert(site(5));
        assert_eq!(cache.resolve(5).unwrap().id, 5);

        cache.clear();
        assert!(cache.resolve(5).is_err());
    }

    #[test]
    fn test_vec_source() {
        let cache = SiteCache::new(vec![site(1), site(2)], 4);
        assert_eq!(cache.resolve(2).unwrap().name, "rs2");
        assert!(cache.resolve(7).is_err());
    }
}
