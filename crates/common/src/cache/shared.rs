//! Thread-safe handle over any cache
//!
//! Decorators such as [`LruCache`](super::LruCache) take `&mut self` and no
//! locks of their own. `SharedCache` is the coordinating lock around a whole
//! decorator chain: a cheap-to-clone handle over `Arc<RwLock<C>>`.
//!
//! Every cache operation takes the write lock, reads included, because a read
//! reorders the recency index.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::CacheResult;
use super::Cache;

/// Cloneable, thread-safe cache handle
///
/// # Example
/// ```
/// use sqlcache_common::cache::{LruCache, MemoryCache, SharedCache};
///
/// let cache = SharedCache::new(LruCache::with_capacity(MemoryCache::new("orders"), 128)?);
/// let writer = cache.clone();
///
/// std::thread::spawn(move || writer.put(1_u64, "pending".to_string()))
///     .join()
///     .expect("writer thread")?;
///
/// assert_eq!(cache.get(&1_u64)?, Some("pending".to_string()));
/// # Ok::<(), sqlcache_common::cache::CacheError>(())
/// ```
pub struct SharedCache<C> {
    inner: Arc<RwLock<C>>,
}

impl<C> Clone for SharedCache<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C> SharedCache<C> {
    /// Take ownership of `cache` behind a new lock
    pub fn new(cache: C) -> Self {
        Self { inner: Arc::new(RwLock::new(cache)) }
    }

    /// Run `f` with shared access to the wrapped cache
    pub fn with_read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the wrapped cache
    ///
    /// Use this to make several operations atomic with respect to other
    /// handles.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Id of the wrapped cache, copied out of the lock
    pub fn id<K, V>(&self) -> String
    where
        C: Cache<K, V>,
    {
        self.inner.read().id().to_string()
    }

    /// Entry count of the wrapped cache
    ///
    /// # Example
    /// ```
    /// use sqlcache_common::cache::{MemoryCache, SharedCache};
    ///
    /// let cache = SharedCache::new(MemoryCache::<u8, u8>::new("ids"));
    /// cache.put(1, 10)?;
    /// assert_eq!(cache.size::<u8, u8>(), 1);
    /// assert_eq!(cache.id::<u8, u8>(), "ids");
    /// # Ok::<(), sqlcache_common::cache::CacheError>(())
    /// ```
    pub fn size<K, V>(&self) -> usize
    where
        C: Cache<K, V>,
    {
        self.inner.read().size()
    }

    /// Store `value` under `key` while holding the write lock
    pub fn put<K, V>(&self, key: K, value: V) -> CacheResult<()>
    where
        C: Cache<K, V>,
    {
        self.inner.write().put(key, value)
    }

    /// Look up `key` while holding the write lock
    ///
    /// A lookup may reorder recency, so it is not a shared read.
    pub fn get<K, V>(&self, key: &K) -> CacheResult<Option<V>>
    where
        C: Cache<K, V>,
    {
        self.inner.write().get(key)
    }

    /// Remove `key` while holding the write lock
    pub fn remove<K, V>(&self, key: &K) -> CacheResult<Option<V>>
    where
        C: Cache<K, V>,
    {
        self.inner.write().remove(key)
    }

    /// Empty the wrapped cache while holding the write lock
    pub fn clear<K, V>(&self) -> CacheResult<()>
    where
        C: Cache<K, V>,
    {
        self.inner.write().clear()
    }
}

impl<C: fmt::Debug> fmt::Debug for SharedCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Some(cache) => f.debug_struct("SharedCache").field("inner", &*cache).finish(),
            None => f.debug_struct("SharedCache").field("inner", &"<locked>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::shared.
    use std::thread;

    use super::*;
    use crate::cache::{LruCache, MemoryCache};

    /// Validates that clones observe the same cache.
    ///
    /// Assertions:
    /// - Confirms a value put through one handle is visible through another.
    /// - Confirms `clear` through a clone empties the shared cache.
    #[test]
    fn test_shared_cache_clones_share_state() {
        let cache = SharedCache::new(MemoryCache::<String, i32>::new("shared"));
        let other = cache.clone();

        cache.put("a".to_string(), 1).unwrap();
        assert_eq!(other.get(&"a".to_string()).unwrap(), Some(1));
        assert_eq!(other.id::<String, i32>(), "shared");

        other.clear::<String, i32>().unwrap();
        assert_eq!(cache.size::<String, i32>(), 0);
    }

    /// Validates concurrent writers against an LRU chain.
    ///
    /// Assertions:
    /// - Confirms the delegate never exceeds the capacity.
    /// - Confirms the recency index never exceeds the capacity.
    #[test]
    fn test_shared_cache_concurrent_puts() {
        let lru = LruCache::with_capacity(MemoryCache::<u32, u32>::new("threads"), 16).unwrap();
        let cache = SharedCache::new(lru);

        let handles: Vec<_> = (0..4_u32)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100_u32 {
                        cache.put(t * 1000 + i, i).unwrap();
                        let _ = cache.get(&(t * 1000 + i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.size::<u32, u32>(), 16);
        cache.with_read(|lru| assert_eq!(lru.recency_len(), 16));
    }
}
