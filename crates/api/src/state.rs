//! Shared state for the HTTP handlers.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{CatalogEvent, DomainEvent};
use events::{BrokerConfig, DomainEventHandler, DomainEventMediator, HandlerError, InMemoryMessageBroker};
use sqlx::PgPool;

use crate::config::Config;

/// Logs every committed domain event.
pub struct EventLogHandler;

#[async_trait]
impl DomainEventHandler<CatalogEvent> for EventLogHandler {
    fn name(&self) -> &'static str {
        "event_log"
    }

    async fn handle(&self, event: &CatalogEvent) -> Result<(), HandlerError> {
        tracing::info!(
            event_name = event.event_name(),
            aggregate_id = %event.aggregate_id(),
            occurred_on = %event.occurred_on(),
            "domain event committed"
        );
        Ok(())
    }
}

/// Database pool and event plumbing shared by the handlers.
pub struct AppState {
    pool: Option<PgPool>,
    broker: InMemoryMessageBroker,
    mediator: Arc<DomainEventMediator<CatalogEvent>>,
}

impl AppState {
    /// Builds the state. Integration events go to an in-memory broker bound
    /// to the configured exchange.
    pub fn new(config: &Config, pool: Option<PgPool>) -> Self {
        let broker = InMemoryMessageBroker::new(BrokerConfig::new(config.broker_exchange.clone()));
        let mut mediator = DomainEventMediator::new(Arc::new(broker.clone()));
        mediator.register(Arc::new(EventLogHandler));

        Self {
            pool,
            broker,
            mediator: Arc::new(mediator),
        }
    }

    /// The Postgres pool, absent when the service runs in memory.
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Broker receiving integration events.
    pub fn broker(&self) -> &InMemoryMessageBroker {
        &self.broker
    }

    /// The mediator application services dispatch through.
    pub fn mediator(&self) -> Arc<DomainEventMediator<CatalogEvent>> {
        Arc::clone(&self.mediator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::testing::VideoFakeBuilder;
    use domain::video::{AudioVideoMedia, AudioVideoMediaField};
    use domain::{AggregateRoot, TrackedAggregate};

    #[tokio::test]
    async fn integration_events_go_to_configured_exchange() {
        let config = Config {
            broker_exchange: "catalog.events".to_string(),
            ..Config::default()
        };
        let state = AppState::new(&config, None);
        assert_eq!(state.mediator().handler_count(), 1);
        assert!(state.pool().is_none());

        let mut video = VideoFakeBuilder::one().build();
        video.replace_audio_video(
            AudioVideoMediaField::Trailer,
            AudioVideoMedia::pending("trailer.mp4", "videos/v/trailer.mp4"),
        );
        let tracked = TrackedAggregate::<CatalogEvent> {
            aggregate_type: "Video",
            aggregate_id: video.video_id().into(),
            events: video.events().iter().cloned().map(CatalogEvent::from).collect(),
        };

        state.mediator().publish(&tracked).await.unwrap();
        let published = state
            .mediator()
            .publish_integration_events(&tracked)
            .await
            .unwrap();

        assert_eq!(published, 1);
        let messages = state.broker().messages().await;
        assert_eq!(messages[0].exchange, "catalog.events");
    }
}
