//! Engine error types.

use common::RecordId;
use record_store::StoreError;
use thiserror::Error;

/// Errors that can occur during query or mutation operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The supplied name was empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// The supplied age did not parse as a non-negative 16-bit integer.
    #[error("age must be a non-negative 16-bit integer, got {input:?}")]
    InvalidAge { input: String },

    /// The mutation target no longer exists.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RecordNotFound(id) => EngineError::NotFound(id),
            other => EngineError::Store(other),
        }
    }
}

impl EngineError {
    /// Classifies this error for the display boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName | Self::InvalidAge { .. } => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Store(StoreError::StoreUnavailable { .. }) => ErrorKind::StoreUnavailable,
            Self::Store(StoreError::CommitFailed { .. }) => ErrorKind::CommitFailed,
            Self::Store(StoreError::RecordNotFound(_)) => ErrorKind::NotFound,
        }
    }
}

/// Coarse error classification delivered to display collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad user input, rejected before any store operation.
    Validation,
    /// The mutation target no longer exists.
    NotFound,
    /// The persistence layer is unreachable or timed out.
    StoreUnavailable,
    /// A write succeeded in memory but could not be persisted.
    CommitFailed,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::NotFound => "not found",
            Self::StoreUnavailable => "store unavailable",
            Self::CommitFailed => "commit failed",
        };
        write!(f, "{label}")
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
