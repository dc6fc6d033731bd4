//! LRU decorator configuration and builder
//!
//! The only tunable of the eviction engine is the recency capacity; metrics
//! collection is an opt-in extra. Configuration can be built in code or read
//! from a TOML table:
//!
//! ```toml
//! capacity = 512
//! track_metrics = true
//! ```

use serde::{Deserialize, Serialize};

use super::error::{CacheError, CacheResult};

/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 1024;

/// Configuration for [`LruCache`](super::LruCache)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LruConfig {
    /// Maximum number of keys tracked before the eldest is evicted
    pub capacity: usize,

    /// Whether to collect hit/miss/eviction metrics
    pub track_metrics: bool,
}

impl Default for LruConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY, track_metrics: false }
    }
}

impl LruConfig {
    /// Create a new configuration builder
    pub fn builder() -> LruConfigBuilder {
        LruConfigBuilder::default()
    }

    /// Quick preset with the given capacity
    ///
    /// # Example
    /// ```
    /// use sqlcache_common::cache::LruConfig;
    ///
    /// let config = LruConfig::with_capacity(256);
    /// assert_eq!(config.capacity, 256);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, ..Self::default() }
    }

    /// Parse a flat TOML table and validate it
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_toml_str(input: &str) -> CacheResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| CacheError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the decorator cannot honor
    pub fn validate(&self) -> CacheResult<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity { capacity: self.capacity });
        }
        Ok(())
    }
}

/// Builder for LruConfig with fluent API
#[derive(Debug, Default)]
pub struct LruConfigBuilder {
    config: LruConfig,
}

impl LruConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recency capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Enable or disable metrics tracking
    pub fn track_metrics(mut self, enabled: bool) -> Self {
        self.config.track_metrics = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> LruConfig {
        self.config
    }
}
