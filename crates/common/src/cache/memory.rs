//! Unbounded in-memory base store
//!
//! `MemoryCache` is the end of a decorator chain: it owns the values, never
//! evicts and never fails. Bounding and recency belong to the decorators
//! wrapped around it.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::error::CacheResult;
use super::Cache;

/// HashMap-backed cache identified by a string id
pub struct MemoryCache<K, V> {
    id: String,
    entries: HashMap<K, V>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty store with the given id (typically a mapper namespace)
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), entries: HashMap::new() }
    }

    /// Returns `true` when the store holds a value for `key`
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }
}

impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn size(&self) -> usize {
        self.entries.len()
    }

    fn put(&mut self, key: K, value: V) -> CacheResult<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn get(&mut self, key: &K) -> CacheResult<Option<V>> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove(&mut self, key: &K) -> CacheResult<Option<V>> {
        Ok(self.entries.remove(key))
    }

    fn clear(&mut self) -> CacheResult<()> {
        self.entries.clear();
        Ok(())
    }
}

/// Stores are identified by id, not by contents.
impl<K, V> PartialEq for MemoryCache<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K, V> Eq for MemoryCache<K, V> {}

impl<K, V> fmt::Debug for MemoryCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("id", &self.id)
            .field("size", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::memory.
    use super::*;

    /// Validates the basic store operations.
    ///
    /// Assertions:
    /// - Confirms `cache.get` returns stored values.
    /// - Confirms `cache.remove` returns the previous value.
    /// - Confirms `cache.size()` tracks entries.
    #[test]
    fn test_memory_cache_operations() {
        let mut cache: MemoryCache<String, i32> = MemoryCache::new("users");
        assert_eq!(cache.id(), "users");

        cache.put("a".to_string(), 1).unwrap();
        cache.put("b".to_string(), 2).unwrap();
        cache.put("a".to_string(), 3).unwrap();

        assert_eq!(cache.size(), 2);
        assert_eq!(cache.get(&"a".to_string()).unwrap(), Some(3));
        assert_eq!(cache.remove(&"b".to_string()).unwrap(), Some(2));
        assert_eq!(cache.remove(&"b".to_string()).unwrap(), None);
        assert!(cache.lock().is_none());

        cache.clear().unwrap();
        assert_eq!(cache.size(), 0);
        assert!(!cache.contains(&"a".to_string()));
    }

    /// Validates identity by id.
    ///
    /// Assertions:
    /// - Confirms stores with the same id are equal regardless of contents.
    #[test]
    fn test_memory_cache_equality_by_id() {
        let mut a: MemoryCache<u8, u8> = MemoryCache::new("users");
        a.put(1, 1).unwrap();
        assert_eq!(a, MemoryCache::new("users"));
        assert_ne!(a, MemoryCache::new("orders"));
    }
}
