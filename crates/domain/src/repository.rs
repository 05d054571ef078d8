//! Repository contracts.

use async_trait::async_trait;

use crate::aggregate::AggregateRoot;
use crate::error::{DomainError, Result};
use crate::search::{SearchParams, SearchResult, SearchableEntity};

/// Partition of a requested identity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistsByIdResult<Id> {
    /// Requested ids that are stored, in request order.
    pub exists: Vec<Id>,

    /// Requested ids that are not stored, in request order.
    pub not_exists: Vec<Id>,
}

impl<Id> ExistsByIdResult<Id> {
    /// Returns true if every requested id exists.
    pub fn all_exist(&self) -> bool {
        self.not_exists.is_empty()
    }
}

/// Rejects an empty identity list before any lookup runs.
pub fn ensure_ids_not_empty<Id>(ids: &[Id]) -> Result<()> {
    if ids.is_empty() {
        return Err(DomainError::InvalidArgument(
            "ids must be an array with at least one element".to_string(),
        ));
    }
    Ok(())
}

/// Persistence contract for one aggregate type.
///
/// Writes take an optional transaction handle: `Some` enlists the write in
/// that transaction, `None` applies it immediately. Reads always see
/// committed data only.
#[async_trait]
pub trait Repository<A: AggregateRoot>: Send + Sync {
    /// The transactional handle writes can enlist in.
    type Transaction: Send;

    /// Stores a new aggregate.
    ///
    /// Fails with `InvalidArgument` if the id is already stored.
    async fn insert(&self, entity: &A, tx: Option<&mut Self::Transaction>) -> Result<()>;

    /// Stores several new aggregates atomically.
    async fn bulk_insert(&self, entities: &[A], tx: Option<&mut Self::Transaction>) -> Result<()>;

    /// Loads one aggregate.
    async fn find_by_id(&self, id: A::Id) -> Result<Option<A>>;

    /// Loads every aggregate whose id is in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[A::Id]) -> Result<Vec<A>>;

    /// Loads every aggregate in insertion order.
    async fn find_all(&self) -> Result<Vec<A>>;

    /// Partitions `ids` into stored and unknown ids.
    ///
    /// Fails with `InvalidArgument` on an empty list.
    async fn exists_by_id(&self, ids: &[A::Id]) -> Result<ExistsByIdResult<A::Id>>;

    /// Replaces a stored aggregate. Fails with `NotFound` if nothing matched.
    async fn update(&self, entity: &A, tx: Option<&mut Self::Transaction>) -> Result<()>;

    /// Removes a stored aggregate. Fails with `NotFound` if nothing matched.
    async fn delete(&self, id: A::Id, tx: Option<&mut Self::Transaction>) -> Result<()>;
}

/// Repository that also supports filter, sort and paginate.
///
/// Every implementation returns identical `items`, `total` and
/// `last_page` for identical inputs over equivalent data.
#[async_trait]
pub trait SearchableRepository<A: SearchableEntity>: Repository<A> {
    /// Runs a search over committed data.
    async fn search(&self, params: SearchParams<A::Filter>) -> Result<SearchResult<A>>;
}
