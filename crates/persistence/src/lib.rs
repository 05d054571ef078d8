//! Storage backends for the catalog.
//!
//! Both backends implement the same repository and unit-of-work contracts
//! and return identical search results for identical inputs.

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::{PersistenceError, Result};
pub use memory::{InMemoryRepository, InMemoryTransaction, InMemoryUnitOfWork};
pub use postgres::{
    PgCastMemberRepository, PgCategoryRepository, PgEntity, PgGenreRepository, PgRepository,
    PgTransaction, PgUnitOfWork, PgVideoRepository, run_migrations,
};
