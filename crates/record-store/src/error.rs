use common::RecordId;
use thiserror::Error;

/// Errors that can occur when interacting with a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistence layer could not be reached (or timed out).
    #[error("store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// A mutation was applied in memory but could not be persisted.
    #[error("commit failed: {reason}")]
    CommitFailed { reason: String },

    /// The targeted record does not exist in the store.
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),
}

impl StoreError {
    /// Builds a `StoreUnavailable` error with the given reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// Builds a `CommitFailed` error with the given reason.
    pub fn commit_failed(reason: impl Into<String>) -> Self {
        Self::CommitFailed {
            reason: reason.into(),
        }
    }
}

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
