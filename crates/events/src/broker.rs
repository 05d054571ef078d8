//! Message broker abstraction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::IntegrationEvent;
use tokio::sync::RwLock;

use crate::error::BrokerError;

/// Default exchange integration events are sent to.
pub const DEFAULT_EXCHANGE: &str = "amq.direct";

/// Destination of published integration events.
///
/// Events route by name unless a routing key is configured for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    exchange: String,
    routing_keys: HashMap<String, String>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_EXCHANGE)
    }
}

impl BrokerConfig {
    /// Routes every event to `exchange` under its own name.
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            routing_keys: HashMap::new(),
        }
    }

    /// Overrides the routing key for one event name.
    pub fn route(mut self, event_name: impl Into<String>, routing_key: impl Into<String>) -> Self {
        self.routing_keys.insert(event_name.into(), routing_key.into());
        self
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Routing key for `event_name`; defaults to the name itself.
    pub fn routing_key<'a>(&'a self, event_name: &'a str) -> &'a str {
        self.routing_keys
            .get(event_name)
            .map(String::as_str)
            .unwrap_or(event_name)
    }
}

/// Publishes integration events to out-of-process subscribers.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    async fn publish_event(&self, event: &IntegrationEvent) -> Result<(), BrokerError>;
}

/// A message as it left the broker.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub exchange: String,
    pub routing_key: String,
    /// JSON encoding of the integration event.
    pub body: Vec<u8>,
}

impl PublishedMessage {
    /// Decodes the body back into the integration event.
    pub fn event(&self) -> Result<IntegrationEvent, BrokerError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// In-memory broker recording every published message.
///
/// Clones share the same message log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageBroker {
    config: BrokerConfig,
    messages: Arc<RwLock<Vec<PublishedMessage>>>,
    rejected: Arc<RwLock<Vec<String>>>,
}

impl InMemoryMessageBroker {
    /// Creates a broker that records messages under `config`.
    pub fn new(config: BrokerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Makes every later publish of `event_name` fail.
    pub async fn reject(&self, event_name: impl Into<String>) {
        self.rejected.write().await.push(event_name.into());
    }

    /// Returns every published message, oldest first.
    pub async fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.read().await.clone()
    }

    /// Forgets every recorded message.
    pub async fn clear(&self) {
        self.messages.write().await.clear();
    }
}

#[async_trait]
impl MessageBroker for InMemoryMessageBroker {
    #[tracing::instrument(skip_all, fields(event_name = %event.event_name))]
    async fn publish_event(&self, event: &IntegrationEvent) -> Result<(), BrokerError> {
        let exchange = self.config.exchange().to_string();
        if self.rejected.read().await.contains(&event.event_name) {
            return Err(BrokerError::Publish {
                event_name: event.event_name.clone(),
                exchange,
                message: "rejected by broker".to_string(),
            });
        }

        let message = PublishedMessage {
            routing_key: self.config.routing_key(&event.event_name).to_string(),
            exchange,
            body: serde_json::to_vec(event)?,
        };
        tracing::debug!(
            exchange = %message.exchange,
            routing_key = %message.routing_key,
            "integration event published"
        );
        self.messages.write().await.push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn uploaded() -> IntegrationEvent {
        IntegrationEvent::new(
            "VideoAudioMediaUploadedIntegrationEvent",
            1,
            Utc::now(),
            json!({"resource_id": "abc.video", "file_path": "videos/abc/movie.mp4"}),
        )
    }

    #[test]
    fn routing_key_defaults_to_event_name() {
        let config = BrokerConfig::default().route("Other", "other.key");
        assert_eq!(config.exchange(), "amq.direct");
        assert_eq!(config.routing_key("Other"), "other.key");
        assert_eq!(config.routing_key("Unrouted"), "Unrouted");
    }

    #[tokio::test]
    async fn publish_records_encoded_message() {
        let broker = InMemoryMessageBroker::new(BrokerConfig::new("catalog"));
        let event = uploaded();

        broker.publish_event(&event).await.unwrap();

        let messages = broker.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].exchange, "catalog");
        assert_eq!(messages[0].routing_key, "VideoAudioMediaUploadedIntegrationEvent");
        assert_eq!(messages[0].event().unwrap(), event);
    }

    #[tokio::test]
    async fn rejected_events_are_not_recorded() {
        let broker = InMemoryMessageBroker::default();
        broker.reject("VideoAudioMediaUploadedIntegrationEvent").await;

        let err = broker.publish_event(&uploaded()).await.unwrap_err();
        assert!(matches!(err, BrokerError::Publish { .. }));
        assert!(broker.messages().await.is_empty());
    }
}
