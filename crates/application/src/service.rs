//! Runs use-case work inside one unit of work.

use std::sync::Arc;

use domain::{DomainError, TrackedAggregate, UnitOfWork};
use events::DomainEventMediator;

/// Wraps use-case work in a unit of work.
///
/// `run` starts the unit, runs the work, then either commits and
/// dispatches the registered aggregates' events, or rolls back without
/// dispatching anything. Events never fire for a write that did not
/// commit.
pub struct ApplicationService<U: UnitOfWork> {
    uow: U,
    mediator: Arc<DomainEventMediator<U::Event>>,
}

impl<U: UnitOfWork> ApplicationService<U> {
    /// Creates a service over `uow` that dispatches through `mediator`.
    pub fn new(uow: U, mediator: Arc<DomainEventMediator<U::Event>>) -> Self {
        Self { uow, mediator }
    }

    pub fn unit_of_work(&self) -> &U {
        &self.uow
    }

    /// Mutable access, mostly for test setup.
    pub fn unit_of_work_mut(&mut self) -> &mut U {
        &mut self.uow
    }

    /// Opens the unit of work.
    pub async fn start(&mut self) -> Result<(), DomainError> {
        self.uow.start().await
    }

    /// Commits, then dispatches events for every registered aggregate.
    ///
    /// Handler and broker failures happen after the commit, so they are
    /// logged and counted but not returned.
    #[tracing::instrument(skip_all)]
    pub async fn finish(&mut self) -> Result<(), DomainError> {
        let committed = self.uow.commit().await?;
        self.dispatch(&committed).await;
        Ok(())
    }

    /// Rolls back the unit of work. Nothing is dispatched.
    #[tracing::instrument(skip_all)]
    pub async fn fail(&mut self) -> Result<(), DomainError> {
        self.uow.rollback().await
    }

    /// Runs `work` inside the unit of work.
    ///
    /// On success the unit commits and the work's value is returned. If
    /// the work or the commit fails the unit rolls back and the original
    /// error is returned unchanged.
    pub async fn run<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: AsyncFnOnce(&mut U) -> Result<T, E>,
        E: From<DomainError>,
    {
        self.start().await?;

        let value = match work(&mut self.uow).await {
            Ok(value) => value,
            Err(err) => {
                self.rollback_after_failure().await;
                metrics::counter!("application_runs_total", "outcome" => "rolled_back")
                    .increment(1);
                return Err(err);
            }
        };

        if let Err(err) = self.finish().await {
            tracing::error!(error = %err, "commit failed");
            self.rollback_after_failure().await;
            metrics::counter!("application_runs_total", "outcome" => "commit_failed").increment(1);
            return Err(err.into());
        }

        metrics::counter!("application_runs_total", "outcome" => "committed").increment(1);
        Ok(value)
    }

    async fn rollback_after_failure(&mut self) {
        if let Err(err) = self.fail().await {
            tracing::error!(error = %err, "rollback failed");
        }
    }

    async fn dispatch(&self, committed: &[TrackedAggregate<U::Event>]) {
        for aggregate in committed {
            if let Err(err) = self.mediator.publish(aggregate).await {
                tracing::warn!(
                    aggregate_type = aggregate.aggregate_type,
                    aggregate_id = %aggregate.aggregate_id,
                    error = %err,
                    "post-commit event dispatch failed"
                );
            }
        }
        for aggregate in committed {
            if let Err(err) = self.mediator.publish_integration_events(aggregate).await {
                tracing::warn!(
                    aggregate_type = aggregate.aggregate_type,
                    aggregate_id = %aggregate.aggregate_id,
                    error = %err,
                    "post-commit integration publish failed"
                );
            }
        }
    }
}
