//! Key error types

use std::time::Duration;

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Errors raised while building a fingerprint key
#[derive(Debug, Error)]
pub enum KeyError {
    /// The null-key sentinel stands for "no identity" and is immutable
    #[error("Cannot update the null cache key")]
    NullKeyMutation,
}

/// Key result type
pub type KeyResult<T> = Result<T, KeyError>;

impl ErrorClassification for KeyError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NullKeyMutation => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::NullKeyMutation)
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}
