use async_trait::async_trait;
use domain::{
    AggregateRoot, AggregateTracker, DomainError, DomainEvent, Result, TrackedAggregate, UnitOfWork,
};
use sqlx::{PgPool, Postgres};

use crate::error::db_error;

/// Transaction handle PostgreSQL repositories enlist in.
pub type PgTransaction = sqlx::Transaction<'static, Postgres>;

/// Unit of work owning one PostgreSQL transaction at a time.
pub struct PgUnitOfWork<E> {
    pool: PgPool,
    transaction: Option<PgTransaction>,
    tracker: AggregateTracker<E>,
}

impl<E: DomainEvent> PgUnitOfWork<E> {
    /// Creates an inactive unit of work over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            transaction: None,
            tracker: AggregateTracker::new(),
        }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl<E: DomainEvent> UnitOfWork for PgUnitOfWork<E> {
    type Transaction = PgTransaction;
    type Event = E;

    async fn start(&mut self) -> Result<()> {
        if self.transaction.is_none() {
            tracing::debug!("beginning postgres transaction");
            self.transaction = Some(self.pool.begin().await.map_err(db_error)?);
        }
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn commit(&mut self) -> Result<Vec<TrackedAggregate<E>>> {
        let transaction = self
            .transaction
            .take()
            .ok_or(DomainError::TransactionNotActive)?;

        if let Err(err) = transaction.commit().await {
            metrics::counter!("uow_commit_failures_total", "backend" => "postgres").increment(1);
            tracing::error!(error = %err, "postgres commit failed");
            return Err(db_error(err));
        }

        metrics::counter!("uow_commits_total", "backend" => "postgres").increment(1);
        Ok(self.tracker.drain())
    }

    #[tracing::instrument(skip_all)]
    async fn rollback(&mut self) -> Result<()> {
        self.tracker.clear();
        metrics::counter!("uow_rollbacks_total", "backend" => "postgres").increment(1);
        if let Some(transaction) = self.transaction.take() {
            transaction.rollback().await.map_err(db_error)?;
        }
        Ok(())
    }

    fn transaction(&mut self) -> Option<&mut PgTransaction> {
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
