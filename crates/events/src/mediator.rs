//! Dispatches committed aggregates' events to handlers and the broker.

use std::sync::Arc;

use domain::{DomainEvent, TrackedAggregate};

use crate::broker::MessageBroker;
use crate::error::{DispatchFailure, MediatorError, PublishFailure, Result};
use crate::handler::DomainEventHandler;

/// Routes the pending events of committed aggregates.
///
/// Events are dispatched in emission order. Handler and broker failures
/// never stop the remaining work: every handler sees every event, and the
/// failures are returned together once all have run.
pub struct DomainEventMediator<E: DomainEvent> {
    handlers: Vec<Arc<dyn DomainEventHandler<E>>>,
    broker: Arc<dyn MessageBroker>,
}

impl<E: DomainEvent> DomainEventMediator<E> {
    /// Creates a mediator with no handlers that publishes integration
    /// events to `broker`.
    pub fn new(broker: Arc<dyn MessageBroker>) -> Self {
        Self {
            handlers: Vec::new(),
            broker,
        }
    }

    /// Registers an in-process handler. Handlers run in registration order.
    pub fn register(&mut self, handler: Arc<dyn DomainEventHandler<E>>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Runs every interested handler for every pending event.
    #[tracing::instrument(
        skip_all,
        fields(
            aggregate_type = aggregate.aggregate_type,
            aggregate_id = %aggregate.aggregate_id,
            events = aggregate.events.len()
        )
    )]
    pub async fn publish(&self, aggregate: &TrackedAggregate<E>) -> Result<()> {
        let mut failures = Vec::new();

        for event in &aggregate.events {
            for handler in self.handlers.iter().filter(|h| h.handles(event)) {
                if let Err(error) = handler.handle(event).await {
                    tracing::warn!(
                        handler = handler.name(),
                        event_name = event.event_name(),
                        error = %error,
                        "event handler failed"
                    );
                    metrics::counter!(
                        "mediator_handler_failures_total",
                        "handler" => handler.name(),
                        "event" => event.event_name()
                    )
                    .increment(1);
                    failures.push(DispatchFailure {
                        handler: handler.name(),
                        event_name: event.event_name(),
                        aggregate_id: aggregate.aggregate_id,
                        error,
                    });
                }
            }
            metrics::counter!("mediator_events_dispatched_total", "event" => event.event_name())
                .increment(1);
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(MediatorError::Dispatch { failures })
        }
    }

    /// Publishes the integration event derived from every pending event.
    ///
    /// Events without an integration counterpart are skipped. Returns the
    /// number of events published.
    #[tracing::instrument(
        skip_all,
        fields(
            aggregate_type = aggregate.aggregate_type,
            aggregate_id = %aggregate.aggregate_id
        )
    )]
    pub async fn publish_integration_events(&self, aggregate: &TrackedAggregate<E>) -> Result<usize> {
        let mut published = 0;
        let mut failures = Vec::new();

        for integration_event in aggregate.events.iter().filter_map(E::integration_event) {
            match self.broker.publish_event(&integration_event).await {
                Ok(()) => {
                    published += 1;
                    metrics::counter!(
                        "integration_events_published_total",
                        "event" => integration_event.event_name.clone()
                    )
                    .increment(1);
                }
                Err(error) => {
                    tracing::warn!(
                        event_name = %integration_event.event_name,
                        error = %error,
                        "integration event not published"
                    );
                    failures.push(PublishFailure {
                        event_name: integration_event.event_name,
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(published)
        } else {
            Err(MediatorError::Publish { failures })
        }
    }
}
