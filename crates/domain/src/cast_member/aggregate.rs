//! Cast member aggregate implementation.

use chrono::{DateTime, Utc};
use common::CastMemberId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{AggregateRoot, PendingEvents};
use crate::notification::Notification;
use crate::validation;

use super::{CastMemberCreatedData, CastMemberEvent};

/// Role of a cast member. Stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum CastMemberType {
    Director = 1,
    Actor = 2,
}

/// Returned for an unknown cast member type code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid cast member type: {0}")]
pub struct InvalidCastMemberType(pub i16);

impl CastMemberType {
    /// Returns the numeric code.
    pub fn code(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for CastMemberType {
    type Error = InvalidCastMemberType;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CastMemberType::Director),
            2 => Ok(CastMemberType::Actor),
            other => Err(InvalidCastMemberType(other)),
        }
    }
}

impl From<CastMemberType> for i16 {
    fn from(value: CastMemberType) -> Self {
        value.code()
    }
}

/// Input for [`CastMember::create`].
#[derive(Debug, Clone)]
pub struct CastMemberCreateCommand {
    pub name: String,
    pub member_type: CastMemberType,
}

/// Stored state of a cast member.
#[derive(Debug, Clone)]
pub struct CastMemberProps {
    pub cast_member_id: CastMemberId,
    pub name: String,
    pub member_type: CastMemberType,
    pub created_at: DateTime<Utc>,
}

/// Cast member aggregate root.
#[derive(Debug, Clone)]
pub struct CastMember {
    cast_member_id: CastMemberId,
    name: String,
    member_type: CastMemberType,
    created_at: DateTime<Utc>,
    notification: Notification,
    events: PendingEvents<CastMemberEvent>,
}

impl CastMember {
    /// Creates a new cast member and records `CastMemberCreated`.
    pub fn create(command: CastMemberCreateCommand) -> Self {
        let mut member = Self::restore(CastMemberProps {
            cast_member_id: CastMemberId::new(),
            name: command.name,
            member_type: command.member_type,
            created_at: validation::now(),
        });
        member.validate();
        member.apply_event(CastMemberEvent::CastMemberCreated(CastMemberCreatedData {
            cast_member_id: member.cast_member_id,
            name: member.name.clone(),
            member_type: member.member_type,
            created_at: member.created_at,
            occurred_on: validation::now(),
        }));
        member
    }

    /// Rebuilds a stored cast member.
    pub fn restore(props: CastMemberProps) -> Self {
        Self {
            cast_member_id: props.cast_member_id,
            name: props.name,
            member_type: props.member_type,
            created_at: props.created_at,
            notification: Notification::new(),
            events: PendingEvents::new(),
        }
    }

    /// Renames the cast member and revalidates the name.
    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validate();
    }

    /// Switches between actor and director.
    pub fn change_type(&mut self, member_type: CastMemberType) {
        self.member_type = member_type;
    }

    /// Checks every field rule, recording failures in the notification.
    pub fn validate(&mut self) -> bool {
        validation::validate_name(&mut self.notification, "name", &self.name);
        !self.notification.has_errors()
    }

    pub fn cast_member_id(&self) -> CastMemberId {
        self.cast_member_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_type(&self) -> CastMemberType {
        self.member_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl PartialEq for CastMember {
    fn eq(&self, other: &Self) -> bool {
        self.cast_member_id == other.cast_member_id
    }
}

impl Eq for CastMember {}

impl AggregateRoot for CastMember {
    type Id = CastMemberId;
    type Event = CastMemberEvent;

    fn aggregate_type() -> &'static str {
        "CastMember"
    }

    fn id(&self) -> Self::Id {
        self.cast_member_id
    }

    fn on_event(&mut self, event: &Self::Event) {
        match event {
            CastMemberEvent::CastMemberCreated(_) => {}
        }
    }

    fn pending_events(&self) -> &PendingEvents<Self::Event> {
        &self.events
    }

    fn pending_events_mut(&mut self) -> &mut PendingEvents<Self::Event> {
        &mut self.events
    }

    fn notification(&self) -> &Notification {
        &self.notification
    }
}
