//! Domain layer of the catalog service.
//!
//! This crate provides:
//! - Notification and the domain error taxonomy
//! - AggregateRoot, DomainEvent and IntegrationEvent abstractions
//! - The filter/sort/paginate search contract
//! - Repository and UnitOfWork traits
//! - The Category, Genre, CastMember and Video aggregates

pub mod aggregate;
pub mod cast_member;
pub mod catalog;
pub mod category;
pub mod error;
pub mod event;
pub mod genre;
pub mod notification;
pub mod repository;
pub mod search;
pub mod unit_of_work;
pub mod validation;
pub mod video;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use aggregate::{AggregateRoot, PendingEvents};
pub use catalog::CatalogEvent;
pub use error::{BoxError, DomainError, Result};
pub use event::{DomainEvent, IntegrationEvent};
pub use notification::Notification;
pub use repository::{ExistsByIdResult, Repository, SearchableRepository, ensure_ids_not_empty};
pub use search::{
    DEFAULT_PER_PAGE, MAX_PER_PAGE, SearchParams, SearchResult, SearchableEntity, SortDirection,
    SortField,
};
pub use unit_of_work::{AggregateTracker, TrackedAggregate, UnitOfWork, UnitOfWorkExt};
