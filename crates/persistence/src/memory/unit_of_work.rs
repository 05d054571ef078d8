use async_trait::async_trait;
use domain::{
    AggregateRoot, AggregateTracker, DomainError, DomainEvent, Result, TrackedAggregate, UnitOfWork,
};

use crate::error::PersistenceError;

use super::InMemoryTransaction;

/// Unit of work over [`InMemoryTransaction`].
///
/// Writes staged by in-memory repositories become visible only on commit.
pub struct InMemoryUnitOfWork<E> {
    transaction: Option<InMemoryTransaction>,
    tracker: AggregateTracker<E>,
    fail_next_commit: bool,
}

impl<E: DomainEvent> Default for InMemoryUnitOfWork<E> {
    fn default() -> Self {
        Self {
            transaction: None,
            tracker: AggregateTracker::new(),
            fail_next_commit: false,
        }
    }
}

impl<E: DomainEvent> InMemoryUnitOfWork<E> {
    /// Creates an inactive unit of work.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next commit fail without applying any staged write.
    pub fn fail_next_commit(&mut self) {
        self.fail_next_commit = true;
    }
}

#[async_trait]
impl<E: DomainEvent> UnitOfWork for InMemoryUnitOfWork<E> {
    type Transaction = InMemoryTransaction;
    type Event = E;

    async fn start(&mut self) -> Result<()> {
        if self.transaction.is_none() {
            tracing::debug!("starting in-memory unit of work");
            self.transaction = Some(InMemoryTransaction::new());
        }
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn commit(&mut self) -> Result<Vec<TrackedAggregate<E>>> {
        if self.transaction.is_none() {
            return Err(DomainError::TransactionNotActive);
        }
        if std::mem::take(&mut self.fail_next_commit) {
            metrics::counter!("uow_commit_failures_total", "backend" => "memory").increment(1);
            return Err(PersistenceError::InjectedCommitFailure.into());
        }

        let applied = match self.transaction.take() {
            Some(transaction) => transaction.apply(),
            None => Ok(()),
        };
        if let Err(e) = applied {
            tracing::warn!(error = %e, "in-memory commit conflicted with committed state");
            metrics::counter!("uow_commit_failures_total", "backend" => "memory").increment(1);
            return Err(e);
        }
        metrics::counter!("uow_commits_total", "backend" => "memory").increment(1);
        Ok(self.tracker.drain())
    }

    #[tracing::instrument(skip_all)]
    async fn rollback(&mut self) -> Result<()> {
        if let Some(transaction) = self.transaction.take() {
            tracing::debug!(discarded = transaction.len(), "rolling back in-memory unit of work");
        }
        self.tracker.clear();
        metrics::counter!("uow_rollbacks_total", "backend" => "memory").increment(1);
        Ok(())
    }

    fn transaction(&mut self) -> Option<&mut InMemoryTransaction> {
        self.transaction.as_mut()
    }

    fn is_active(&self) -> bool {
        self.transaction.is_some()
    }

    fn add_aggregate_root<A>(&mut self, aggregate: &A) -> Result<()>
    where
        A: AggregateRoot,
        A::Event: Into<E>,
    {
        if !self.is_active() {
            return Err(DomainError::TransactionNotActive);
        }
        self.tracker.track(aggregate);
        Ok(())
    }

    fn aggregate_roots(&self) -> &[TrackedAggregate<E>] {
        self.tracker.as_slice()
    }
}
