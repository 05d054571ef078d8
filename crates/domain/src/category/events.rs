//! Category domain events.

use chrono::{DateTime, Utc};
use common::CategoryId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::DomainEvent;

/// Events emitted by a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CategoryEvent {
    /// Category was created.
    CategoryCreated(CategoryCreatedData),
}

impl DomainEvent for CategoryEvent {
    fn event_name(&self) -> &'static str {
        match self {
            CategoryEvent::CategoryCreated(_) => "CategoryCreated",
        }
    }

    fn aggregate_id(&self) -> Uuid {
        match self {
            CategoryEvent::CategoryCreated(data) => data.category_id.as_uuid(),
        }
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        match self {
            CategoryEvent::CategoryCreated(data) => data.occurred_on,
        }
    }

    fn event_version(&self) -> u32 {
        1
    }
}

/// Data for CategoryCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCreatedData {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub occurred_on: DateTime<Utc>,
}
