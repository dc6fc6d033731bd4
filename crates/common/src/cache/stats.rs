//! Cache statistics and metrics tracking
//!
//! The LRU decorator records puts, hits, misses and evictions here when
//! `track_metrics` is enabled in its [`LruConfig`](super::LruConfig).

use tracing::{info, warn};

/// Hit rate under which [`StatsReporter`] logs a warning
const LOW_HIT_RATE: f64 = 0.5;

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Current number of entries in the delegate
    pub size: usize,

    /// Configured recency capacity
    pub capacity: usize,

    /// Lookups that found a value
    pub hits: u64,

    /// Lookups that found nothing
    pub misses: u64,

    /// Total number of put operations
    pub puts: u64,

    /// Total number of evicted entries
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate hit rate (hits / total accesses)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate miss rate (misses / total accesses)
    pub fn miss_rate(&self) -> f64 {
        1.0 - self.hit_rate()
    }

    /// Calculate fill percentage (size / capacity)
    pub fn fill_percentage(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.size as f64 / self.capacity as f64
        }
    }

    /// Total number of access operations (hits + misses)
    pub fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Counters owned by one decorator
///
/// Updated only through `&mut` access to the owning cache, so plain integers
/// suffice.
#[derive(Debug, Clone, Default)]
pub(crate) struct MetricsCollector {
    hits: u64,
    misses: u64,
    puts: u64,
    evictions: u64,
}

impl MetricsCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses = self.misses.saturating_add(1);
    }

    pub(crate) fn record_put(&mut self) {
        self.puts = self.puts.saturating_add(1);
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions = self.evictions.saturating_add(1);
    }

    /// Get current statistics snapshot
    pub(crate) fn snapshot(&self, size: usize, capacity: usize) -> CacheStats {
        CacheStats {
            size,
            capacity,
            hits: self.hits,
            misses: self.misses,
            puts: self.puts,
            evictions: self.evictions,
        }
    }

    /// Reset all metrics to zero
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Logs cache statistics snapshots under a fixed cache name
///
/// # Example
/// ```
/// use sqlcache_common::cache::{CacheStats, StatsReporter};
///
/// let reporter = StatsReporter::new("statement_cache");
/// reporter.report(&CacheStats { size: 10, capacity: 1024, ..Default::default() });
/// ```
#[derive(Debug, Clone)]
pub struct StatsReporter {
    cache_name: String,
}

impl StatsReporter {
    /// Create a reporter for the named cache
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self { cache_name: cache_name.into() }
    }

    /// Emit one structured log line for the snapshot
    pub fn report(&self, stats: &CacheStats) {
        if stats.total_accesses() > 0 && stats.hit_rate() < LOW_HIT_RATE {
            warn!(
                cache = %self.cache_name,
                hit_rate = stats.hit_rate(),
                size = stats.size,
                capacity = stats.capacity,
                evictions = stats.evictions,
                "Cache hit rate below threshold"
            );
        } else {
            info!(
                cache = %self.cache_name,
                hit_rate = stats.hit_rate(),
                size = stats.size,
                capacity = stats.capacity,
                evictions = stats.evictions,
                "Cache statistics"
            );
        }
    }
}
