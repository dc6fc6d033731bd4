//! Composable statement-result caches
//!
//! Caches here are built as decorator chains: a base store at the bottom
//! owns the values, and each decorator adds one policy on top while exposing
//! the same [`Cache`] interface. A chain is keyed by
//! [`FingerprintKey`](crate::key::FingerprintKey) in practice, but any
//! `K: Eq + Hash` works.
//!
//! # Features
//!
//! - **Bounded**: [`LruCache`] evicts the least recently used key once its
//!   capacity is exceeded
//! - **Composable**: decorators wrap any `Cache`, including boxed trait objects
//! - **Thread-safe on demand**: [`SharedCache`] is the coordinating lock
//! - **Metrics tracking**: optional hit/miss/eviction statistics
//!
//! # Examples
//!
//! ## Bounded cache keyed by statement fingerprints
//! ```
//! use sqlcache_common::cache::{Cache, LruCache, MemoryCache};
//! use sqlcache_common::key::{QueryKeyBuilder, RowBounds};
//!
//! let mut cache = LruCache::new(MemoryCache::new("mapper.users"));
//!
//! let key = QueryKeyBuilder::new("users.by_id")
//!     .bounds(RowBounds::DEFAULT)
//!     .sql("SELECT * FROM users WHERE id = ?")
//!     .bind(42)
//!     .build();
//!
//! cache.put(key.clone(), vec!["alice".to_string()])?;
//! assert_eq!(cache.get(&key)?, Some(vec!["alice".to_string()]));
//! # Ok::<(), sqlcache_common::cache::CacheError>(())
//! ```
//!
//! ## Configuration from TOML
//! ```
//! use sqlcache_common::cache::{LruCache, LruConfig, MemoryCache};
//!
//! let config = LruConfig::from_toml_str("capacity = 2\ntrack_metrics = true")?;
//! let cache: LruCache<MemoryCache<u32, u32>, u32> =
//!     LruCache::from_config(MemoryCache::new("ids"), &config)?;
//! assert_eq!(cache.capacity(), 2);
//! # Ok::<(), sqlcache_common::cache::CacheError>(())
//! ```

mod config;
mod error;
mod lru;
mod memory;
mod recency;
mod shared;
mod stats;

pub use config::{LruConfig, LruConfigBuilder, DEFAULT_CAPACITY};
pub use error::{CacheError, CacheResult};
pub use lru::LruCache;
pub use memory::MemoryCache;
pub use parking_lot::RwLock;
pub use shared::SharedCache;
pub use stats::{CacheStats, StatsReporter};

/// Uniform interface for base stores and decorators
///
/// Operations take `&mut self` because even a read may reorder internal
/// state. Errors from a delegate propagate unchanged through every decorator.
pub trait Cache<K, V> {
    /// Identifier of the cache, typically the mapper namespace
    fn id(&self) -> &str;

    /// Number of entries currently held
    fn size(&self) -> usize;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: K, value: V) -> CacheResult<()>;

    /// Look up `key`
    fn get(&mut self, key: &K) -> CacheResult<Option<V>>;

    /// Remove `key`, returning the previous value if any
    fn remove(&mut self, key: &K) -> CacheResult<Option<V>>;

    /// Remove every entry
    fn clear(&mut self) -> CacheResult<()>;

    /// Optional read/write lock for callers coordinating several operations
    ///
    /// No cache in this module provides one; use [`SharedCache`] instead.
    fn lock(&self) -> Option<&RwLock<()>> {
        None
    }
}

impl<C, K, V> Cache<K, V> for Box<C>
where
    C: Cache<K, V> + ?Sized,
{
    fn id(&self) -> &str {
        (**self).id()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn put(&mut self, key: K, value: V) -> CacheResult<()> {
        (**self).put(key, value)
    }

    fn get(&mut self, key: &K) -> CacheResult<Option<V>> {
        (**self).get(key)
    }

    fn remove(&mut self, key: &K) -> CacheResult<Option<V>> {
        (**self).remove(key)
    }

    fn clear(&mut self) -> CacheResult<()> {
        (**self).clear()
    }

    fn lock(&self) -> Option<&RwLock<()>> {
        (**self).lock()
    }
}
