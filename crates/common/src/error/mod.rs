//! Error classification for the query cache
//!
//! Module-specific errors (`KeyError`, `CacheError`) are defined next to the
//! code that raises them and implement [`ErrorClassification`] so callers
//! can treat failures from either module the same way:
//!
//! ```rust,ignore
//! impl ErrorClassification for CacheError {
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::InvalidCapacity { .. } => ErrorSeverity::Error,
//!             // ...
//!         }
//!     }
//!     // ...
//! }
//! ```
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case |
//! |-------|----------|
//! | **Info** | Expected conditions |
//! | **Warning** | Degraded but operational |
//! | **Error** | Failure requiring attention |
//! | **Critical** | Programmer error or integrity at risk |

use std::fmt;
use std::time::Duration;

/// Error classification trait for consistent error handling across modules
///
/// Nothing in this crate retries; the classification exists so callers that
/// wrap the cache can decide how to surface a failure.
pub trait ErrorClassification {
    /// Check if this error is retryable
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    ///
    /// Critical errors here are API misuse (for example mutating the null
    /// key) rather than data conditions.
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
