//! Least-recently-used eviction decorator
//!
//! [`LruCache`] wraps any [`Cache`] and bounds it to a fixed number of keys.
//! It keeps its own recency index of keys only; the delegate keeps the
//! values. Every `put` and `get` is one touch, so eviction order is a strict
//! total order over events with no timestamps involved.
//!
//! The decorator takes no locks of its own. Share it across threads through a
//! coordinating lock such as [`SharedCache`](super::SharedCache).

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use tracing::debug;

use super::config::{LruConfig, DEFAULT_CAPACITY};
use super::error::{CacheError, CacheResult};
use super::recency::RecencyIndex;
use super::stats::{CacheStats, MetricsCollector};
use super::Cache;

const DEFAULT_NON_ZERO_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CAPACITY) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// LRU decorator over a delegate cache
///
/// # Type Parameters
/// - `C`: the delegate cache
/// - `K`: key type, shared between the recency index and the delegate
///
/// # Example
/// ```
/// use sqlcache_common::cache::{Cache, LruCache, MemoryCache};
///
/// let mut cache = LruCache::with_capacity(MemoryCache::new("users"), 2)?;
/// cache.put("k1", 1)?;
/// cache.put("k2", 2)?;
/// cache.get(&"k1")?;
/// cache.put("k3", 3)?; // evicts "k2"
///
/// assert_eq!(cache.get(&"k2")?, None);
/// assert_eq!(cache.get(&"k1")?, Some(1));
/// # Ok::<(), sqlcache_common::cache::CacheError>(())
/// ```
pub struct LruCache<C, K>
where
    K: Eq + Hash,
{
    delegate: C,
    index: RecencyIndex<K>,
    capacity: NonZeroUsize,
    config: LruConfig,
    metrics: MetricsCollector,
}

impl<C, K> LruCache<C, K>
where
    K: Eq + Hash,
{
    /// Wrap `delegate` with the default capacity of 1024 keys
    pub fn new(delegate: C) -> Self {
        Self::build(delegate, DEFAULT_NON_ZERO_CAPACITY, LruConfig::default())
    }

    /// Wrap `delegate` with an explicit capacity
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn with_capacity(delegate: C, capacity: usize) -> CacheResult<Self> {
        Self::from_config(delegate, &LruConfig::with_capacity(capacity))
    }

    /// Wrap `delegate` using a validated configuration
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when the configured capacity is
    /// zero.
    pub fn from_config(delegate: C, config: &LruConfig) -> CacheResult<Self> {
        let capacity = non_zero_capacity(config.capacity)?;
        Ok(Self::build(delegate, capacity, config.clone()))
    }

    fn build(delegate: C, capacity: NonZeroUsize, config: LruConfig) -> Self {
        Self {
            delegate,
            index: RecencyIndex::with_capacity(capacity.get()),
            capacity,
            config: LruConfig { capacity: capacity.get(), ..config },
            metrics: MetricsCollector::new(),
        }
    }

    /// Change the capacity and start a fresh recency index
    ///
    /// Recency history is discarded, not migrated: keys already in the
    /// delegate stay there but are no longer tracked until touched by a `put`.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero; the
    /// current capacity and index are kept in that case.
    pub fn set_capacity(&mut self, capacity: usize) -> CacheResult<()> {
        let capacity = non_zero_capacity(capacity)?;
        debug!(
            previous = self.capacity.get(),
            capacity = capacity.get(),
            dropped = self.index.len(),
            "Resetting LRU recency index"
        );
        self.capacity = capacity;
        self.config.capacity = capacity.get();
        self.index = RecencyIndex::with_capacity(capacity.get());
        Ok(())
    }

    /// Maximum number of keys tracked before eviction
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of keys currently in the recency index
    ///
    /// May differ from the delegate size: removals through
    /// [`Cache::remove`] leave their recency entry in place.
    pub fn recency_len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` when `key` is in the recency index
    pub fn is_tracked(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    /// Keys in the recency index from most to least recently touched
    pub fn recency_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.index.iter()
    }

    /// The key that the next overflowing `put` would evict
    pub fn eldest_key(&self) -> Option<&K> {
        self.index.eldest()
    }

    /// The wrapped cache
    pub fn delegate(&self) -> &C {
        &self.delegate
    }

    /// Unwrap the decorator, dropping the recency index
    pub fn into_inner(self) -> C {
        self.delegate
    }

    /// Snapshot of the collected metrics
    ///
    /// Counters stay at zero unless `track_metrics` is enabled.
    pub fn stats<V>(&self) -> CacheStats
    where
        C: Cache<K, V>,
    {
        self.metrics.snapshot(self.delegate.size(), self.capacity.get())
    }
}

impl<C, K> LruCache<C, K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Touch `key` and evict the eldest key if the index overflowed.
    fn cycle_key_list<V>(&mut self, key: K) -> CacheResult<()>
    where
        C: Cache<K, V>,
    {
        self.index.insert(key);
        if self.index.len() <= self.capacity.get() {
            return Ok(());
        }

        if let Some(eldest) = self.index.pop_eldest() {
            debug!(
                cache_id = %self.delegate.id(),
                key = ?eldest,
                capacity = self.capacity.get(),
                "Evicting least recently used entry"
            );
            self.delegate.remove(&eldest)?;
            if self.config.track_metrics {
                self.metrics.record_eviction();
            }
        }
        Ok(())
    }
}

impl<C, K, V> Cache<K, V> for LruCache<C, K>
where
    C: Cache<K, V>,
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn id(&self) -> &str {
        self.delegate.id()
    }

    fn size(&self) -> usize {
        self.delegate.size()
    }

    fn put(&mut self, key: K, value: V) -> CacheResult<()> {
        self.delegate.put(key.clone(), value)?;
        if self.config.track_metrics {
            self.metrics.record_put();
        }
        self.cycle_key_list(key)
    }

    fn get(&mut self, key: &K) -> CacheResult<Option<V>> {
        self.index.touch(key);
        let value = self.delegate.get(key)?;
        if self.config.track_metrics {
            if value.is_some() {
                self.metrics.record_hit();
            } else {
                self.metrics.record_miss();
            }
        }
        Ok(value)
    }

    fn remove(&mut self, key: &K) -> CacheResult<Option<V>> {
        self.delegate.remove(key)
    }

    fn clear(&mut self) -> CacheResult<()> {
        self.delegate.clear()?;
        debug!(cache_id = %self.delegate.id(), dropped = self.index.len(), "Cleared LRU cache");
        self.index.clear();
        if self.config.track_metrics {
            self.metrics.reset();
        }
        Ok(())
    }
}

impl<C, K> fmt::Debug for LruCache<C, K>
where
    C: fmt::Debug,
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("delegate", &self.delegate)
            .field("capacity", &self.capacity)
            .field("tracked", &self.index.len())
            .finish()
    }
}

fn non_zero_capacity(capacity: usize) -> CacheResult<NonZeroUsize> {
    NonZeroUsize::new(capacity).ok_or(CacheError::InvalidCapacity { capacity })
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::lru.
    use super::*;
    use crate::cache::MemoryCache;

    type TestCache = LruCache<MemoryCache<&'static str, i32>, &'static str>;

    fn lru(capacity: usize) -> TestCache {
        LruCache::with_capacity(MemoryCache::new("test"), capacity).unwrap()
    }

    /// Validates `LruCache::new` defaults.
    ///
    /// Assertions:
    /// - Confirms `cache.capacity()` equals `1024`.
    /// - Confirms the id is the delegate's id.
    /// - Ensures no lock is exposed.
    #[test]
    fn test_lru_new_defaults() {
        let cache: LruCache<MemoryCache<u32, u32>, u32> = LruCache::new(MemoryCache::new("mapper"));
        assert_eq!(cache.capacity(), 1024);
        assert_eq!(Cache::<u32, u32>::id(&cache), "mapper");
        assert!(Cache::<u32, u32>::lock(&cache).is_none());
    }

    /// Validates eviction without intervening reads.
    ///
    /// Assertions:
    /// - Confirms `"k1"` is evicted after the third put.
    /// - Confirms the delegate holds exactly two entries.
    #[test]
    fn test_lru_evicts_eldest_on_overflow() {
        let mut cache = lru(2);
        cache.put("k1", 1).unwrap();
        cache.put("k2", 2).unwrap();
        cache.put("k3", 3).unwrap();

        assert!(!cache.delegate().contains(&"k1"));
        assert_eq!(cache.size(), 2);
        assert_eq!(cache.get(&"k2").unwrap(), Some(2));
        assert_eq!(cache.get(&"k3").unwrap(), Some(3));
    }

    /// Validates that a read protects a key from eviction.
    ///
    /// Assertions:
    /// - Confirms `"k2"` is evicted instead of the touched `"k1"`.
    #[test]
    fn test_lru_get_touches_key() {
        let mut cache = lru(2);
        cache.put("k1", 1).unwrap();
        cache.put("k2", 2).unwrap();
        assert_eq!(cache.get(&"k1").unwrap(), Some(1));
        cache.put("k3", 3).unwrap();

        assert_eq!(cache.get(&"k1").unwrap(), Some(1));
        assert_eq!(cache.get(&"k2").unwrap(), None);
        assert_eq!(cache.get(&"k3").unwrap(), Some(3));
    }

    /// Validates that re-putting a key refreshes it without growing the index.
    ///
    /// Assertions:
    /// - Confirms `cache.recency_len()` stays at `2`.
    /// - Confirms the refreshed key survives the next overflow.
    #[test]
    fn test_lru_reput_refreshes_key() {
        let mut cache = lru(2);
        cache.put("k1", 1).unwrap();
        cache.put("k2", 2).unwrap();
        cache.put("k1", 10).unwrap();
        assert_eq!(cache.recency_len(), 2);

        cache.put("k3", 3).unwrap();
        assert_eq!(cache.get(&"k1").unwrap(), Some(10));
        assert_eq!(cache.get(&"k2").unwrap(), None);
    }

    /// Validates that misses do not register keys.
    ///
    /// Assertions:
    /// - Ensures a get for an unknown key leaves the index untouched.
    /// - Ensures the delegate gains no entry.
    #[test]
    fn test_lru_miss_does_not_register_key() {
        let mut cache = lru(2);
        assert_eq!(cache.get(&"ghost").unwrap(), None);
        assert_eq!(cache.recency_len(), 0);
        assert_eq!(cache.size(), 0);
    }

    /// Validates that `remove` leaves its recency entry behind.
    ///
    /// Assertions:
    /// - Confirms the removed key still occupies the index.
    /// - Confirms it is the next eviction victim once it ages out.
    #[test]
    fn test_lru_remove_keeps_recency_entry() {
        let mut cache = lru(2);
        cache.put("k1", 1).unwrap();
        cache.put("k2", 2).unwrap();

        assert_eq!(cache.remove(&"k1").unwrap(), Some(1));
        assert_eq!(cache.recency_len(), 2);
        assert!(cache.is_tracked(&"k1"));
        assert_eq!(cache.eldest_key(), Some(&"k1"));

        // A touch on the stale key still counts as a use.
        assert_eq!(cache.get(&"k1").unwrap(), None);
        assert_eq!(cache.eldest_key(), Some(&"k2"));

        cache.put("k3", 3).unwrap();
        assert_eq!(cache.get(&"k2").unwrap(), None);
        assert_eq!(cache.recency_keys().copied().collect::<Vec<_>>(), vec!["k3", "k1"]);
    }

    /// Validates `clear`.
    ///
    /// Assertions:
    /// - Ensures both the delegate and the index are emptied.
    #[test]
    fn test_lru_clear() {
        let mut cache = lru(4);
        cache.put("k1", 1).unwrap();
        cache.put("k2", 2).unwrap();
        cache.clear().unwrap();

        assert_eq!(cache.size(), 0);
        assert_eq!(cache.recency_len(), 0);
        assert_eq!(cache.get(&"k1").unwrap(), None);
    }

    /// Validates `set_capacity`.
    ///
    /// Assertions:
    /// - Ensures zero is rejected and the old capacity kept.
    /// - Confirms a reset discards recency history.
    #[test]
    fn test_lru_set_capacity_resets_index() {
        let mut cache = lru(3);
        cache.put("k1", 1).unwrap();
        cache.put("k2", 2).unwrap();

        assert!(matches!(cache.set_capacity(0), Err(CacheError::InvalidCapacity { capacity: 0 })));
        assert_eq!(cache.capacity(), 3);
        assert_eq!(cache.recency_len(), 2);

        cache.set_capacity(1).unwrap();
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.recency_len(), 0);
        assert_eq!(cache.size(), 2);

        cache.put("k3", 3).unwrap();
        cache.put("k4", 4).unwrap();
        assert_eq!(cache.get(&"k3").unwrap(), None);
        // Untracked entries survive until a put re-registers them.
        assert_eq!(cache.get(&"k1").unwrap(), Some(1));
    }

    /// Validates rejected construction.
    ///
    /// Assertions:
    /// - Ensures a zero capacity fails with `CacheError::InvalidCapacity`.
    #[test]
    fn test_lru_rejects_zero_capacity() {
        let result: CacheResult<TestCache> = LruCache::with_capacity(MemoryCache::new("x"), 0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity { capacity: 0 })));
    }

    /// Validates very large capacities.
    ///
    /// Assertions:
    /// - Confirms `usize::MAX` builds and accepts puts.
    /// - Confirms a large capacity read from TOML builds and accepts puts.
    /// - Confirms `set_capacity` to `usize::MAX` keeps the cache usable.
    #[test]
    fn test_lru_accepts_huge_capacity() {
        let mut cache = lru(usize::MAX);
        cache.put("k1", 1).unwrap();
        assert_eq!(cache.get(&"k1").unwrap(), Some(1));
        assert_eq!(cache.capacity(), usize::MAX);

        let config = LruConfig::from_toml_str("capacity = 4611686018427387904").unwrap();
        let mut cache: TestCache = LruCache::from_config(MemoryCache::new("toml"), &config).unwrap();
        cache.put("k2", 2).unwrap();
        assert_eq!(cache.capacity(), 4_611_686_018_427_387_904);
        assert_eq!(cache.recency_len(), 1);

        cache.set_capacity(usize::MAX).unwrap();
        cache.put("k3", 3).unwrap();
        assert_eq!(cache.size(), 2);
    }

    /// Validates metrics collection.
    ///
    /// Assertions:
    /// - Confirms hits, misses, puts and evictions are counted.
    #[test]
    fn test_lru_metrics() {
        let config = LruConfig::builder().capacity(1).track_metrics(true).build();
        let mut cache: TestCache = LruCache::from_config(MemoryCache::new("m"), &config).unwrap();

        cache.put("k1", 1).unwrap();
        cache.put("k2", 2).unwrap();
        let _ = cache.get(&"k1").unwrap();
        let _ = cache.get(&"k2").unwrap();

        let stats = cache.stats::<i32>();
        assert_eq!(stats.puts, 2);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.capacity, 1);
    }
}
