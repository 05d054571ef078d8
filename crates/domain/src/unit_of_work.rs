//! Unit-of-work contract and the aggregate tracker shared by implementations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::AggregateRoot;
use crate::error::{DomainError, Result};
use crate::event::DomainEvent;

/// Snapshot of one registered aggregate's pending events.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedAggregate<E> {
    /// Aggregate type name.
    pub aggregate_type: &'static str,

    /// Aggregate identity.
    pub aggregate_id: Uuid,

    /// Pending events at registration time, in emission order.
    pub events: Vec<E>,
}

/// Aggregates registered during one unit of work, deduplicated by identity
/// and kept in registration order.
#[derive(Debug, Clone)]
pub struct AggregateTracker<E> {
    aggregates: Vec<TrackedAggregate<E>>,
}

impl<E> Default for AggregateTracker<E> {
    fn default() -> Self {
        Self {
            aggregates: Vec::new(),
        }
    }
}

impl<E: DomainEvent> AggregateTracker<E> {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an aggregate.
    ///
    /// Registering the same identity again keeps its original slot and
    /// refreshes the event snapshot.
    pub fn track<A>(&mut self, aggregate: &A)
    where
        A: AggregateRoot,
        A::Event: Into<E>,
    {
        let aggregate_id: Uuid = aggregate.id().into();
        let events: Vec<E> = aggregate.events().iter().cloned().map(Into::into).collect();

        let existing = self
            .aggregates
            .iter_mut()
            .find(|t| t.aggregate_id == aggregate_id && t.aggregate_type == A::aggregate_type());
        match existing {
            Some(tracked) => tracked.events = events,
            None => self.aggregates.push(TrackedAggregate {
                aggregate_type: A::aggregate_type(),
                aggregate_id,
                events,
            }),
        }
    }

    /// Returns the tracked aggregates in registration order.
    pub fn as_slice(&self) -> &[TrackedAggregate<E>] {
        &self.aggregates
    }

    /// Removes and returns every tracked aggregate.
    pub fn drain(&mut self) -> Vec<TrackedAggregate<E>> {
        std::mem::take(&mut self.aggregates)
    }

    /// Forgets every tracked aggregate.
    pub fn clear(&mut self) {
        self.aggregates.clear();
    }

    /// Returns the number of tracked aggregates.
    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    /// Returns true if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }
}

/// Binds one transactional resource to the aggregates touched while it is
/// open.
///
/// Lifecycle: idle, then active after [`UnitOfWork::start`], then exactly
/// one of [`UnitOfWork::commit`] or [`UnitOfWork::rollback`], then idle
/// again. A failed commit keeps the tracked aggregates until the caller
/// rolls back.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Handle repositories enlist their writes in.
    type Transaction: Send;

    /// Event type collected from registered aggregates.
    type Event: DomainEvent;

    /// Opens a transaction. No-op while one is already open.
    async fn start(&mut self) -> Result<()>;

    /// Flushes the transaction and hands the tracked aggregates back in
    /// registration order.
    async fn commit(&mut self) -> Result<Vec<TrackedAggregate<Self::Event>>>;

    /// Discards the transaction and every tracked aggregate.
    async fn rollback(&mut self) -> Result<()>;

    /// Returns the open transaction, or None while idle.
    fn transaction(&mut self) -> Option<&mut Self::Transaction>;

    /// Returns true while a transaction is open.
    fn is_active(&self) -> bool;

    /// Registers an aggregate whose events should be dispatched on commit.
    ///
    /// Fails with `TransactionNotActive` while idle.
    fn add_aggregate_root<A>(&mut self, aggregate: &A) -> Result<()>
    where
        A: AggregateRoot,
        A::Event: Into<Self::Event>;

    /// Returns the aggregates registered so far.
    fn aggregate_roots(&self) -> &[TrackedAggregate<Self::Event>];
}

/// Convenience methods for units of work.
#[allow(async_fn_in_trait)]
pub trait UnitOfWorkExt: UnitOfWork + Sized {
    /// Starts the unit and runs `work` inside it.
    ///
    /// Never commits; committing is the caller's job.
    async fn execute<T, E, F>(&mut self, work: F) -> std::result::Result<T, E>
    where
        F: AsyncFnOnce(&mut Self) -> std::result::Result<T, E>,
        E: From<DomainError>,
    {
        self.start().await?;
        work(self).await
    }
}

impl<U: UnitOfWork> UnitOfWorkExt for U {}
