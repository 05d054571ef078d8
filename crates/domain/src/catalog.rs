//! Union of every catalog aggregate's events.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::cast_member::CastMemberEvent;
use crate::category::CategoryEvent;
use crate::event::{DomainEvent, IntegrationEvent};
use crate::genre::GenreEvent;
use crate::video::VideoEvent;

/// Event type carried by units of work that touch several catalog
/// aggregates.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    Category(CategoryEvent),
    Genre(GenreEvent),
    CastMember(CastMemberEvent),
    Video(VideoEvent),
}

macro_rules! delegate {
    ($self:ident, $event:ident => $body:expr) => {
        match $self {
            CatalogEvent::Category($event) => $body,
            CatalogEvent::Genre($event) => $body,
            CatalogEvent::CastMember($event) => $body,
            CatalogEvent::Video($event) => $body,
        }
    };
}

impl DomainEvent for CatalogEvent {
    fn event_name(&self) -> &'static str {
        delegate!(self, event => event.event_name())
    }

    fn aggregate_id(&self) -> Uuid {
        delegate!(self, event => event.aggregate_id())
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        delegate!(self, event => event.occurred_on())
    }

    fn event_version(&self) -> u32 {
        delegate!(self, event => event.event_version())
    }

    fn integration_event(&self) -> Option<IntegrationEvent> {
        delegate!(self, event => event.integration_event())
    }
}

impl From<CategoryEvent> for CatalogEvent {
    fn from(event: CategoryEvent) -> Self {
        CatalogEvent::Category(event)
    }
}

impl From<GenreEvent> for CatalogEvent {
    fn from(event: GenreEvent) -> Self {
        CatalogEvent::Genre(event)
    }
}

impl From<CastMemberEvent> for CatalogEvent {
    fn from(event: CastMemberEvent) -> Self {
        CatalogEvent::CastMember(event)
    }
}

impl From<VideoEvent> for CatalogEvent {
    fn from(event: VideoEvent) -> Self {
        CatalogEvent::Video(event)
    }
}
