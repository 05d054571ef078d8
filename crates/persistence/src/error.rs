use domain::DomainError;
use thiserror::Error;

/// Errors raised by the storage backends before they are folded into
/// [`DomainError`].
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be turned back into an aggregate.
    #[error("Invalid value in column {column}: {message}")]
    InvalidRow {
        column: &'static str,
        message: String,
    },

    /// The in-memory backend was told to fail its next commit.
    #[error("Injected commit failure")]
    InjectedCommitFailure,
}

/// Result type for persistence-only operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

impl From<PersistenceError> for DomainError {
    fn from(err: PersistenceError) -> Self {
        DomainError::infrastructure(err)
    }
}

/// Maps a driver error into the domain taxonomy.
pub(crate) fn db_error(err: sqlx::Error) -> DomainError {
    PersistenceError::Database(err).into()
}

/// Maps an insert failure, turning unique violations into `InvalidArgument`.
pub(crate) fn insert_error(entity: &'static str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return DomainError::InvalidArgument(format!("{entity} already exists"));
    }
    db_error(err)
}
