//! Genre aggregate.

mod aggregate;
mod events;
mod search;

pub use aggregate::{Genre, GenreCreateCommand, GenreProps};
pub use events::{GenreCreatedData, GenreEvent};
pub use search::{GenreFilter, GenreSortField};
