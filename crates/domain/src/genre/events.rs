//! Genre domain events.

use chrono::{DateTime, Utc};
use common::{CategoryId, GenreId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::DomainEvent;

/// Events emitted by a genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GenreEvent {
    /// Genre was created.
    GenreCreated(GenreCreatedData),
}

impl DomainEvent for GenreEvent {
    fn event_name(&self) -> &'static str {
        match self {
            GenreEvent::GenreCreated(_) => "GenreCreated",
        }
    }

    fn aggregate_id(&self) -> Uuid {
        match self {
            GenreEvent::GenreCreated(data) => data.genre_id.as_uuid(),
        }
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        match self {
            GenreEvent::GenreCreated(data) => data.occurred_on,
        }
    }

    fn event_version(&self) -> u32 {
        1
    }
}

/// Data for GenreCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreCreatedData {
    pub genre_id: GenreId,
    pub name: String,
    pub categories_id: Vec<CategoryId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub occurred_on: DateTime<Utc>,
}
