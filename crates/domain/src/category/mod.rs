//! Category aggregate.

mod aggregate;
mod events;
mod search;

pub use aggregate::{Category, CategoryCreateCommand, CategoryProps};
pub use events::{CategoryCreatedData, CategoryEvent};
pub use search::{CategoryFilter, CategorySortField};
