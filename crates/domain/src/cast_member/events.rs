//! Cast member domain events.

use chrono::{DateTime, Utc};
use common::CastMemberId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::DomainEvent;

use super::CastMemberType;

/// Events emitted by a cast member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CastMemberEvent {
    /// Cast member was created.
    CastMemberCreated(CastMemberCreatedData),
}

impl DomainEvent for CastMemberEvent {
    fn event_name(&self) -> &'static str {
        match self {
            CastMemberEvent::CastMemberCreated(_) => "CastMemberCreated",
        }
    }

    fn aggregate_id(&self) -> Uuid {
        match self {
            CastMemberEvent::CastMemberCreated(data) => data.cast_member_id.as_uuid(),
        }
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        match self {
            CastMemberEvent::CastMemberCreated(data) => data.occurred_on,
        }
    }

    fn event_version(&self) -> u32 {
        1
    }
}

/// Data for CastMemberCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMemberCreatedData {
    pub cast_member_id: CastMemberId,
    pub name: String,
    pub member_type: CastMemberType,
    pub created_at: DateTime<Utc>,
    pub occurred_on: DateTime<Utc>,
}
