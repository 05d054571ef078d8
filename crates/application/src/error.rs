//! Use-case level error types.

use domain::DomainError;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by use cases.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An uploaded file does not fit its media slot.
    #[error("Invalid media file for {field}: {reason}")]
    InvalidMediaFile { field: &'static str, reason: String },
}

impl ApplicationError {
    /// Returns true for the not-found kind.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApplicationError::Domain(err) => err.is_not_found(),
            ApplicationError::Storage(StorageError::NotFound(_)) => true,
            _ => false,
        }
    }
}

/// Result type for use cases.
pub type Result<T> = std::result::Result<T, ApplicationError>;
