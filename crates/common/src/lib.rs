//! Shared identity types for the video catalog.
//!
//! Every aggregate is identified by its own UUID-backed newtype so that a
//! genre id can never be passed where a category id is expected.

mod ids;

pub use ids::{CastMemberId, CategoryId, GenreId, InvalidIdError, VideoId};
