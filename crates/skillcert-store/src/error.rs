//! Storage error types.
//!
//! These represent infrastructure failures of a storage backend. They are
//! defined here so callers can downcast and classify errors for retry
//! decisions without string matching. Domain-level outcomes (expired
//! categories, no-op upserts) are never represented as errors.

use thiserror::Error;

/// Errors a storage backend can raise.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer in time.
    #[error("storage operation timed out after {0}s")]
    Timeout(u64),

    /// Stored data failed to parse or validate.
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Returns `true` if retrying the operation could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }
}
