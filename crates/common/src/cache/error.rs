//! Cache error types
//!
//! Decorators never wrap or translate a delegate's error: whatever the
//! delegate returns is handed back to the caller as-is through `?`.

use std::time::Duration;

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Cache error type
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid cache capacity {capacity}: capacity must be positive")]
    InvalidCapacity { capacity: usize },

    #[error("Cache '{cache_id}' backend failure: {message}")]
    Backend { cache_id: String, message: String },

    #[error("Invalid cache configuration: {0}")]
    Config(String),
}

/// Cache result type
pub type CacheResult<T> = Result<T, CacheError>;

impl CacheError {
    /// Create a backend failure attributed to the given cache id
    pub fn backend<I: Into<String>, M: Into<String>>(cache_id: I, message: M) -> Self {
        Self::Backend { cache_id: cache_id.into(), message: message.into() }
    }
}

impl ErrorClassification for CacheError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidCapacity { .. } => ErrorSeverity::Error,
            Self::Backend { .. } => ErrorSeverity::Error,
            Self::Config(_) => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::error.
    use super::*;

    /// Validates the rendered messages.
    ///
    /// Assertions:
    /// - Confirms the capacity message names the rejected value.
    /// - Confirms the backend message names the cache id.
    #[test]
    fn test_cache_error_display() {
        let err = CacheError::InvalidCapacity { capacity: 0 };
        assert_eq!(err.to_string(), "Invalid cache capacity 0: capacity must be positive");

        let err = CacheError::backend("mapper.users", "disk unavailable");
        assert_eq!(err.to_string(), "Cache 'mapper.users' backend failure: disk unavailable");
    }

    /// Validates classification of every variant.
    ///
    /// Assertions:
    /// - Ensures no variant is retryable or critical.
    /// - Confirms every variant reports `ErrorSeverity::Error`.
    #[test]
    fn test_cache_error_classification() {
        let errors = [
            CacheError::InvalidCapacity { capacity: 0 },
            CacheError::backend("cache", "busy"),
            CacheError::Config("expected an integer".to_string()),
        ];

        for err in errors {
            assert!(!err.is_retryable(), "{err}");
            assert!(!err.is_critical(), "{err}");
            assert_eq!(err.severity(), ErrorSeverity::Error);
            assert!(err.retry_after().is_none());
        }
    }
}
