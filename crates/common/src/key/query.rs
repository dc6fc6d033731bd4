//! Canonical query keys
//!
//! Every query-result lookup must feed its factors in the same order:
//! statement id, pagination offset, pagination limit, SQL text (with its
//! placeholders), each bound parameter in binding order, and finally the
//! environment id when one is configured. [`QueryKeyBuilder`] owns that order
//! so call sites cannot reorder it by accident.

use serde::{Deserialize, Serialize};

use super::factor::Factor;
use super::fingerprint::FingerprintKey;

/// Pagination window applied to a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowBounds {
    /// Rows skipped before the first returned row
    pub offset: i32,
    /// Maximum number of rows returned
    pub limit: i32,
}

impl RowBounds {
    /// Offset used when no pagination is requested
    pub const NO_ROW_OFFSET: i32 = 0;
    /// Limit used when no pagination is requested
    pub const NO_ROW_LIMIT: i32 = i32::MAX;
    /// Unbounded pagination
    pub const DEFAULT: Self = Self::new(Self::NO_ROW_OFFSET, Self::NO_ROW_LIMIT);

    /// Create bounds with the given offset and limit.
    pub const fn new(offset: i32, limit: i32) -> Self {
        Self { offset, limit }
    }
}

impl Default for RowBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Builds a [`FingerprintKey`] for one query execution
///
/// # Example
/// ```
/// use sqlcache_common::key::{QueryKeyBuilder, RowBounds};
///
/// let key = QueryKeyBuilder::new("users.selectByIds")
///     .bounds(RowBounds::new(0, 50))
///     .sql("SELECT * FROM users WHERE id IN (?, ?)")
///     .bind(7)
///     .bind(9)
///     .build();
///
/// assert_eq!(key.update_count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct QueryKeyBuilder {
    statement_id: String,
    bounds: RowBounds,
    sql: String,
    params: Vec<Factor>,
    environment: Option<String>,
}

impl QueryKeyBuilder {
    /// Start a key for the given statement id.
    pub fn new(statement_id: impl Into<String>) -> Self {
        Self {
            statement_id: statement_id.into(),
            bounds: RowBounds::DEFAULT,
            sql: String::new(),
            params: Vec::new(),
            environment: None,
        }
    }

    /// Set the pagination window.
    pub fn bounds(mut self, bounds: RowBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the resolved SQL text, placeholders included.
    pub fn sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = sql.into();
        self
    }

    /// Append the next bound parameter value.
    pub fn bind(mut self, value: impl Into<Factor>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Append several bound parameter values in binding order.
    pub fn bind_all<I, F>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Factor>,
    {
        self.params.extend(values.into_iter().map(Into::into));
        self
    }

    /// Set the environment id, folded in after the parameters.
    pub fn environment(mut self, environment_id: impl Into<String>) -> Self {
        self.environment = Some(environment_id.into());
        self
    }

    /// Fold the collected factors in canonical order.
    pub fn build(self) -> FingerprintKey {
        let mut factors = Vec::with_capacity(self.params.len() + 5);
        factors.push(Factor::Text(self.statement_id));
        factors.push(Factor::from(self.bounds.offset));
        factors.push(Factor::from(self.bounds.limit));
        factors.push(Factor::Text(self.sql));
        factors.extend(self.params);
        if let Some(environment) = self.environment {
            factors.push(Factor::Text(environment));
        }
        FingerprintKey::from_factors(factors)
    }
}
