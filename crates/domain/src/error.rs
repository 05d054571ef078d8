//! Domain error types.

use thiserror::Error;

use crate::notification::Notification;

/// Boxed error used to carry infrastructure failures without leaking their
/// concrete type into the domain.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during domain and repository operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate failed validation; the operation was aborted before
    /// anything was persisted.
    #[error("Entity validation error: {0}")]
    Validation(Notification),

    /// An identity lookup, update or delete matched nothing.
    #[error("{entity} Not Found using ID {}", .ids.join(", "))]
    NotFound { entity: &'static str, ids: Vec<String> },

    /// The caller misused an operation. Never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A transactional operation was attempted outside an active unit of work.
    #[error("No active transaction in unit of work")]
    TransactionNotActive,

    /// The underlying storage or transaction failed.
    #[error("Infrastructure error: {0}")]
    Infrastructure(#[source] BoxError),
}

impl DomainError {
    /// Builds a not-found error for the given entity name and identities.
    pub fn not_found<I, T>(entity: &'static str, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        DomainError::NotFound {
            entity,
            ids: ids.into_iter().map(|id| id.to_string()).collect(),
        }
    }

    /// Wraps an infrastructure failure.
    pub fn infrastructure(err: impl Into<BoxError>) -> Self {
        DomainError::Infrastructure(err.into())
    }

    /// Returns true for the not-found kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
