//! Core aggregate root abstraction.

use std::hash::Hash;

use uuid::Uuid;

use crate::event::DomainEvent;
use crate::notification::Notification;

/// Pending domain events of one aggregate, in emission order.
///
/// Append-only from the aggregate's point of view. Every `apply_event`
/// call pushes a fresh event value, so the queue never holds the same
/// event twice.
#[derive(Debug, Clone)]
pub struct PendingEvents<E> {
    events: Vec<E>,
}

impl<E> PendingEvents<E> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    fn push(&mut self, event: E) {
        self.events.push(event);
    }

    /// Returns the queued events, oldest first.
    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    /// Returns the number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<E> Default for PendingEvents<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for aggregate roots.
///
/// An aggregate is the transactional consistency boundary and the only
/// source of domain events for its sub-graph. Two aggregates are the same
/// aggregate iff their identities are equal; implementors compare by
/// [`AggregateRoot::id`] only.
pub trait AggregateRoot: Clone + Send + Sync + 'static {
    /// The identity value object.
    type Id: Copy + Eq + Hash + Ord + std::fmt::Debug + std::fmt::Display + Into<Uuid> + Send + Sync;

    /// The events this aggregate emits.
    type Event: DomainEvent;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's identity.
    fn id(&self) -> Self::Id;

    /// Self-applied handler for an event.
    ///
    /// Implementations match the event enum exhaustively; variants without
    /// local state to maintain use an empty arm.
    fn on_event(&mut self, event: &Self::Event);

    /// Returns the pending-event queue.
    fn pending_events(&self) -> &PendingEvents<Self::Event>;

    /// Returns the pending-event queue for appending.
    fn pending_events_mut(&mut self) -> &mut PendingEvents<Self::Event>;

    /// Returns the validation errors collected so far.
    fn notification(&self) -> &Notification;

    /// Applies an event: runs the local handler synchronously, then queues
    /// the event for dispatch.
    fn apply_event(&mut self, event: Self::Event) {
        self.on_event(&event);
        self.pending_events_mut().push(event);
    }

    /// Returns the pending events, oldest first.
    fn events(&self) -> &[Self::Event] {
        self.pending_events().as_slice()
    }

    /// Returns a copy without pending events, as storage would hand it back.
    fn without_events(&self) -> Self {
        let mut copy = self.clone();
        *copy.pending_events_mut() = PendingEvents::new();
        copy
    }
}
