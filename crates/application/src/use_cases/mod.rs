//! Catalog use cases.
//!
//! Writes run through [`crate::ApplicationService::run`]; reads go straight
//! to the repositories.

pub mod cast_member;
pub mod category;
pub mod genre;
pub mod video;

use domain::{AggregateRoot, DomainError, Repository};

/// Fails with the aggregate's notification if it holds validation errors.
pub(crate) fn ensure_valid<A: AggregateRoot>(aggregate: &A) -> Result<(), DomainError> {
    if aggregate.notification().has_errors() {
        return Err(DomainError::Validation(aggregate.notification().clone()));
    }
    Ok(())
}

/// Fails with `NotFound` listing every id in `ids` that is not stored.
///
/// An empty list is left to the aggregate's own validation.
pub(crate) async fn ensure_exist<A, R>(repo: &R, ids: &[A::Id]) -> Result<(), DomainError>
where
    A: AggregateRoot,
    R: Repository<A> + ?Sized,
{
    if ids.is_empty() {
        return Ok(());
    }
    let found = repo.exists_by_id(ids).await?;
    if !found.all_exist() {
        return Err(DomainError::not_found(A::aggregate_type(), found.not_exists));
    }
    Ok(())
}

/// Loads an aggregate or fails with `NotFound`.
pub(crate) async fn find_or_fail<A, R>(repo: &R, id: A::Id) -> Result<A, DomainError>
where
    A: AggregateRoot,
    R: Repository<A> + ?Sized,
{
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(A::aggregate_type(), [id]))
}
