//! Domain event mediation.
//!
//! - [`DomainEventHandler`] for in-process reactions to committed events
//! - [`MessageBroker`] for publishing derived integration events
//! - [`DomainEventMediator`] tying both to the aggregates a unit of work committed

pub mod broker;
pub mod error;
pub mod handler;
pub mod mediator;

pub use broker::{
    BrokerConfig, DEFAULT_EXCHANGE, InMemoryMessageBroker, MessageBroker, PublishedMessage,
};
pub use error::{
    BrokerError, DispatchFailure, HandlerError, MediatorError, PublishFailure, Result,
};
pub use handler::DomainEventHandler;
pub use mediator::DomainEventMediator;
