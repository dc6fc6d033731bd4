//! Cache identity for query results
//!
//! This module folds the inputs that describe a query execution into a single
//! hashable [`FingerprintKey`]:
//!
//! - **[`factor`]**: the [`Factor`] model and the structural hash, equality
//!   and rendering used for sequence-shaped values
//! - **[`fingerprint`]**: the rolling key itself and the [`NULL_KEY`] sentinel
//! - **[`query`]**: [`QueryKeyBuilder`], which feeds factors in the canonical
//!   order (statement id, offset, limit, SQL, parameters, environment)
//!
//! ## Usage
//!
//! ```
//! use sqlcache_common::key::{FingerprintKey, QueryKeyBuilder, RowBounds};
//!
//! let first = QueryKeyBuilder::new("users.selectByTags")
//!     .bounds(RowBounds::DEFAULT)
//!     .sql("SELECT * FROM users WHERE tags && ?")
//!     .bind(vec!["admin", "ops"])
//!     .build();
//!
//! // A separately allocated array with the same contents is the same key.
//! let second = QueryKeyBuilder::new("users.selectByTags")
//!     .sql("SELECT * FROM users WHERE tags && ?")
//!     .bind(vec!["admin".to_string(), "ops".to_string()])
//!     .build();
//!
//! assert_eq!(first, second);
//! assert_ne!(first, FingerprintKey::new());
//! ```

mod error;
pub mod factor;
pub mod fingerprint;
pub mod query;

pub use error::{KeyError, KeyResult};
pub use factor::{
    structural_eq, structural_hash, structural_to_string, Factor, FactorValue, Shape,
};
pub use fingerprint::{FingerprintKey, NULL_KEY};
pub use query::{QueryKeyBuilder, RowBounds};
