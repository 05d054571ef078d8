//! In-process domain event handlers.

use async_trait::async_trait;
use domain::DomainEvent;

use crate::error::HandlerError;

/// A same-process reaction to committed domain events.
///
/// Handlers run after the unit of work commits, so they only ever observe
/// durable writes.
#[async_trait]
pub trait DomainEventHandler<E: DomainEvent>: Send + Sync {
    /// Returns the name used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Returns true if this handler reacts to `event`.
    fn handles(&self, _event: &E) -> bool {
        true
    }

    /// Handles a single event.
    async fn handle(&self, event: &E) -> Result<(), HandlerError>;
}
