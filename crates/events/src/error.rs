//! Event mediation error types.

use thiserror::Error;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error returned by an in-process event handler.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl HandlerError {
    /// A handler failure without an underlying error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised while handing an integration event to the broker.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The event could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The broker rejected the message.
    #[error("Failed to publish {event_name} to {exchange}: {message}")]
    Publish {
        event_name: String,
        exchange: String,
        message: String,
    },
}

/// One handler that failed on one event.
#[derive(Debug)]
pub struct DispatchFailure {
    pub handler: &'static str,
    pub event_name: &'static str,
    pub aggregate_id: Uuid,
    pub error: HandlerError,
}

/// One integration event the broker did not accept.
#[derive(Debug)]
pub struct PublishFailure {
    pub event_name: String,
    pub error: BrokerError,
}

/// Errors returned by the mediator after every handler or publish ran.
#[derive(Debug, Error)]
pub enum MediatorError {
    /// At least one in-process handler failed.
    #[error("{} event handler(s) failed", failures.len())]
    Dispatch { failures: Vec<DispatchFailure> },

    /// At least one integration event was not published.
    #[error("{} integration event(s) failed to publish", failures.len())]
    Publish { failures: Vec<PublishFailure> },
}

/// Result type for mediator operations.
pub type Result<T> = std::result::Result<T, MediatorError>;
