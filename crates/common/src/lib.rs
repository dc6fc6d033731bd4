//! Query-result cache building blocks for SQL mapping layers.
//!
//! # Safety and Quality
//!
//! This crate enforces strict safety and quality standards: no unsafe code,
//! and every fallible operation returns a typed error.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors and fingerprint keys
//! - `observability`: tracing for key and cache diagnostics
//! - `runtime`: cache decorators (LRU, shared handle, stats); enabled by
//!   default

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod key;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod cache;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use cache::{Cache, CacheError, CacheResult, LruCache, LruConfig, MemoryCache, SharedCache};
#[cfg(feature = "foundation")]
pub use error::{ErrorClassification, ErrorSeverity};
#[cfg(feature = "foundation")]
pub use key::{Factor, FingerprintKey, KeyError, KeyResult, QueryKeyBuilder, RowBounds, NULL_KEY};
