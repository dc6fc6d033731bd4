//! Factors contributed to a fingerprint and their structural identity
//!
//! A [`Factor`] is tagged by [`Shape`]: sequence-shaped factors hash, compare
//! and render elementwise (recursively for nested sequences), every other
//! factor uses its own scalar identity. Two sequences with equal elements in
//! the same order always agree on hash, equality and rendering, no matter
//! which allocation they came from.
//!
//! All hashes are deterministic within a process; nothing here is seeded.

use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Canonical bit pattern used for every NaN so all NaNs compare equal.
const CANONICAL_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

/// Domain value that defines its own fingerprint identity.
///
/// Implemented for every `Hash + Eq + Display` type, so composite request
/// parameters can be fed to a key without converting them to scalars first.
/// Comparing against a value of a different concrete type is never equal.
pub trait FactorValue: fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// 32-bit hash folded into the fingerprint.
    fn factor_hash(&self) -> i32;

    /// Equality against another opaque factor of any type.
    fn factor_eq(&self, other: &dyn FactorValue) -> bool;

    /// Upcast used for type-checked comparisons.
    fn as_any(&self) -> &dyn Any;
}

impl<T> FactorValue for T
where
    T: Hash + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static,
{
    fn factor_hash(&self) -> i32 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        fold_i64(hasher.finish() as i64)
    }

    fn factor_eq(&self, other: &dyn FactorValue) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Structural shape of a factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Fixed-size ordered sequence compared element by element
    Sequence,
    /// Anything else, compared by its own identity
    Scalar,
}

/// One value contributed to a [`FingerprintKey`](super::FingerprintKey)
#[derive(Debug, Clone)]
pub enum Factor {
    /// Absent value (SQL `NULL`, missing parameter)
    Null,
    /// Boolean parameter
    Bool(bool),
    /// Any integral parameter, widened to 64 bits
    Int(i64),
    /// Floating point parameter; NaNs are all equal and `0.0 != -0.0`
    Float(f64),
    /// Statement ids, SQL text, string parameters
    Text(String),
    /// Array-shaped parameter with structural identity
    Sequence(Vec<Factor>),
    /// Composite value with its own identity
    Opaque(Arc<dyn FactorValue>),
}

impl Factor {
    /// Wrap a composite value that defines its own identity.
    pub fn opaque<T: FactorValue>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    /// Structural tag driving hash/equality/rendering dispatch.
    pub fn shape(&self) -> Shape {
        match self {
            Self::Sequence(_) => Shape::Sequence,
            _ => Shape::Scalar,
        }
    }

    /// Returns `true` for [`Factor::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Content hash of a factor.
///
/// Sequences fold `31 * h + element` starting from 1; a nested `Null`
/// contributes 0, as does a top-level `Null` (the fingerprint substitutes 1
/// for top-level nulls itself).
pub fn structural_hash(factor: &Factor) -> i32 {
    match factor {
        Factor::Null => 0,
        Factor::Bool(value) => {
            if *value {
                1231
            } else {
                1237
            }
        }
        Factor::Int(value) => fold_i64(*value),
        Factor::Float(value) => fold_i64(canonical_bits(*value) as i64),
        Factor::Text(text) => text
            .encode_utf16()
            .fold(0_i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit))),
        Factor::Sequence(elements) => elements
            .iter()
            .fold(1_i32, |hash, element| hash.wrapping_mul(31).wrapping_add(structural_hash(element))),
        Factor::Opaque(value) => value.factor_hash(),
    }
}

/// Content equality of two factors.
///
/// Factors of different kinds are never equal (`Int(1)` is not `Float(1.0)`).
pub fn structural_eq(left: &Factor, right: &Factor) -> bool {
    match (left, right) {
        (Factor::Null, Factor::Null) => true,
        (Factor::Bool(a), Factor::Bool(b)) => a == b,
        (Factor::Int(a), Factor::Int(b)) => a == b,
        (Factor::Float(a), Factor::Float(b)) => canonical_bits(*a) == canonical_bits(*b),
        (Factor::Text(a), Factor::Text(b)) => a == b,
        (Factor::Sequence(a), Factor::Sequence(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structural_eq(x, y))
        }
        (Factor::Opaque(a), Factor::Opaque(b)) => Arc::ptr_eq(a, b) || a.factor_eq(&**b),
        _ => false,
    }
}

/// Renders a factor, expanding sequences as `[a, b, c]`.
pub fn structural_to_string(factor: &Factor) -> String {
    factor.to_string()
}

fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        CANONICAL_NAN_BITS
    } else {
        value.to_bits()
    }
}

fn fold_i64(value: i64) -> i32 {
    (value ^ ((value as u64) >> 32) as i64) as i32
}

impl PartialEq for Factor {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other)
    }
}

impl Eq for Factor {}

impl Hash for Factor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(structural_hash(self));
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{:?}", value),
            Self::Text(text) => f.write_str(text),
            Self::Sequence(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
            Self::Opaque(value) => write!(f, "{}", value),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Factor {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// Integers that may not fit in 64 signed bits become `Int` when they do and
/// their decimal `Text` otherwise, so `u64::MAX` matches the string
/// `"18446744073709551615"`.
macro_rules! impl_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Factor {
                fn from(value: $ty) -> Self {
                    i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Int)
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize, isize, i128, u128);

impl From<bool> for Factor {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for Factor {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Factor {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Factor {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Factor {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Factor>> From<Option<T>> for Factor {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Factor>> From<Vec<T>> for Factor {
    fn from(values: Vec<T>) -> Self {
        Self::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Factor>> From<&[T]> for Factor {
    fn from(values: &[T]) -> Self {
        Self::Sequence(values.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Factor>, const N: usize> From<[T; N]> for Factor {
    fn from(values: [T; N]) -> Self {
        Self::Sequence(values.into_iter().map(Into::into).collect())
    }
}
