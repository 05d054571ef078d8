//! Domain and integration event abstractions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait for domain events.
///
/// Domain events are immutable, in-process records of something that
/// happened inside one aggregate. They are named in past tense.
pub trait DomainEvent: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Returns the event type name.
    fn event_name(&self) -> &'static str;

    /// Returns the identity of the aggregate that emitted the event.
    fn aggregate_id(&self) -> Uuid;

    /// Returns when the event occurred.
    fn occurred_on(&self) -> DateTime<Utc>;

    /// Returns the schema version of the event.
    fn event_version(&self) -> u32;

    /// Derives the broker-facing projection of this event.
    ///
    /// Returns None for events with no integration counterpart.
    fn integration_event(&self) -> Option<IntegrationEvent> {
        None
    }
}

/// Externally published, versioned projection of a domain event.
///
/// Decouples the wire contract from the internal event shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationEvent {
    /// The routable event name.
    pub event_name: String,

    /// Schema version of the payload.
    pub event_version: u32,

    /// When the originating domain event occurred.
    pub occurred_on: DateTime<Utc>,

    /// The payload as JSON.
    pub payload: serde_json::Value,
}

impl IntegrationEvent {
    /// Creates a new integration event.
    pub fn new(
        event_name: impl Into<String>,
        event_version: u32,
        occurred_on: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            event_version,
            occurred_on,
            payload,
        }
    }
}
