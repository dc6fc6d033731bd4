//! Rolling fingerprint over an ordered list of factors
//!
//! A [`FingerprintKey`] keeps the factors it was fed plus three derived
//! scalars: a rolling 32-bit hash, a 64-bit checksum of the factor hashes, and
//! the factor count. The scalars reject most unequal keys in O(1); the factor
//! list settles the rest.
//!
//! # Example
//! ```
//! use sqlcache_common::key::{Factor, FingerprintKey};
//!
//! let mut key = FingerprintKey::new();
//! key.update("users.selectById")?;
//! key.update(vec![1, 2, 3])?;
//!
//! let same = FingerprintKey::from_factors([Factor::from("users.selectById"), vec![1, 2, 3].into()]);
//! assert_eq!(key, same);
//! # Ok::<(), sqlcache_common::key::KeyError>(())
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

use super::error::{KeyError, KeyResult};
use super::factor::{structural_eq, structural_hash, Factor};

const DEFAULT_MULTIPLIER: i32 = 37;
const DEFAULT_HASHCODE: i32 = 17;

/// Hash contribution of a top-level null factor.
const NULL_FACTOR_HASH: i32 = 1;

/// The "no identity" key. Equal to a fresh empty key; rejects updates.
pub static NULL_KEY: FingerprintKey = FingerprintKey::null();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyKind {
    Mutable,
    Null,
}

/// Composite cache identity built factor by factor
///
/// Order is part of the identity: feeding `[a, b]` and `[b, a]` produces
/// different keys. Build a key on one thread, then treat it as frozen once it
/// is used for a lookup.
#[derive(Debug, Clone)]
pub struct FingerprintKey {
    multiplier: i32,
    hashcode: i32,
    checksum: i64,
    count: i32,
    factors: Vec<Factor>,
    kind: KeyKind,
}

impl FingerprintKey {
    /// Create an empty key with the default seed state.
    pub fn new() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
            hashcode: DEFAULT_HASHCODE,
            checksum: 0,
            count: 0,
            factors: Vec::new(),
            kind: KeyKind::Mutable,
        }
    }

    /// The null-key sentinel. See [`NULL_KEY`].
    pub const fn null() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
            hashcode: DEFAULT_HASHCODE,
            checksum: 0,
            count: 0,
            factors: Vec::new(),
            kind: KeyKind::Null,
        }
    }

    /// Build a key from factors in iteration order.
    pub fn from_factors<I, F>(factors: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Factor>,
    {
        let mut key = Self::new();
        for factor in factors {
            key.push(factor.into());
        }
        key
    }

    /// Returns `true` for the null-key sentinel (and clones of it).
    pub fn is_null(&self) -> bool {
        self.kind == KeyKind::Null
    }

    /// Fold one factor into the key.
    ///
    /// # Errors
    /// Returns [`KeyError::NullKeyMutation`] when called on the null key.
    pub fn update(&mut self, factor: impl Into<Factor>) -> KeyResult<()> {
        self.ensure_mutable()?;
        self.push(factor.into());
        Ok(())
    }

    /// Fold every factor in order.
    ///
    /// # Errors
    /// Returns [`KeyError::NullKeyMutation`] when called on the null key; no
    /// factor is applied in that case.
    pub fn update_all<I, F>(&mut self, factors: I) -> KeyResult<()>
    where
        I: IntoIterator<Item = F>,
        F: Into<Factor>,
    {
        self.ensure_mutable()?;
        for factor in factors {
            self.push(factor.into());
        }
        Ok(())
    }

    /// Number of factors folded into the key.
    pub fn update_count(&self) -> usize {
        self.factors.len()
    }

    /// Rolling hash, maintained incrementally.
    pub fn hashcode(&self) -> i32 {
        self.hashcode
    }

    /// Wrapping sum of the factor hashes.
    pub fn checksum(&self) -> i64 {
        self.checksum
    }

    /// Factors in accumulation order.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// `hashcode:checksum[:factor]*`, for diagnostics.
    pub fn canonical_string(&self) -> String {
        self.to_string()
    }

    fn ensure_mutable(&self) -> KeyResult<()> {
        if self.is_null() {
            #[cfg(feature = "observability")]
            tracing::warn!("Rejected update on the null cache key");
            return Err(KeyError::NullKeyMutation);
        }
        Ok(())
    }

    fn push(&mut self, factor: Factor) {
        let base = if factor.is_null() { NULL_FACTOR_HASH } else { structural_hash(&factor) };

        self.count = self.count.wrapping_add(1);
        self.checksum = self.checksum.wrapping_add(i64::from(base));
        let weighted = base.wrapping_mul(self.count);
        self.hashcode = self.multiplier.wrapping_mul(self.hashcode).wrapping_add(weighted);

        self.factors.push(factor);
    }
}

impl Default for FingerprintKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for FingerprintKey {
    fn eq(&self, other: &Self) -> bool {
        if ptr::eq(self, other) {
            return true;
        }
        if self.hashcode != other.hashcode
            || self.checksum != other.checksum
            || self.count != other.count
        {
            return false;
        }
        self.factors.len() == other.factors.len()
            && self.factors.iter().zip(&other.factors).all(|(a, b)| structural_eq(a, b))
    }
}

impl Eq for FingerprintKey {}

impl Hash for FingerprintKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hashcode);
    }
}

impl fmt::Display for FingerprintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hashcode, self.checksum)?;
        for factor in &self.factors {
            write!(f, ":{}", factor)?;
        }
        Ok(())
    }
}

impl From<FingerprintKey> for Factor {
    fn from(key: FingerprintKey) -> Self {
        Factor::opaque(key)
    }
}
