//! Mediator behavior over several tracked aggregates.

use std::sync::Arc;

use async_trait::async_trait;
use domain::cast_member::{CastMember, CastMemberCreateCommand, CastMemberType};
use domain::category::{Category, CategoryCreateCommand};
use domain::{AggregateTracker, CatalogEvent, DomainEvent};
use events::{DomainEventHandler, DomainEventMediator, HandlerError, InMemoryMessageBroker};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Records `(aggregate_id, event_name)` for categories only.
#[derive(Default)]
struct CategoryLog {
    entries: Mutex<Vec<(Uuid, &'static str)>>,
}

#[async_trait]
impl DomainEventHandler<CatalogEvent> for CategoryLog {
    fn name(&self) -> &'static str {
        "category-log"
    }

    fn handles(&self, event: &CatalogEvent) -> bool {
        matches!(event, CatalogEvent::Category(_))
    }

    async fn handle(&self, event: &CatalogEvent) -> Result<(), HandlerError> {
        self.entries
            .lock()
            .await
            .push((event.aggregate_id(), event.event_name()));
        Ok(())
    }
}

#[tokio::test]
async fn aggregates_dispatch_in_registration_order() {
    let log = Arc::new(CategoryLog::default());
    let mut mediator = DomainEventMediator::new(Arc::new(InMemoryMessageBroker::default()));
    mediator.register(log.clone());

    let first = Category::create(CategoryCreateCommand {
        name: "Drama".to_string(),
        ..Default::default()
    });
    let member = CastMember::create(CastMemberCreateCommand {
        name: "Jane".to_string(),
        member_type: CastMemberType::Director,
    });
    let second = Category::create(CategoryCreateCommand {
        name: "Comedy".to_string(),
        ..Default::default()
    });

    let mut tracker = AggregateTracker::<CatalogEvent>::new();
    tracker.track(&first);
    tracker.track(&member);
    tracker.track(&second);

    for aggregate in tracker.drain() {
        mediator.publish(&aggregate).await.unwrap();
    }

    let entries = log.entries.lock().await;
    assert_eq!(
        *entries,
        [
            (first.category_id().as_uuid(), "CategoryCreated"),
            (second.category_id().as_uuid(), "CategoryCreated"),
        ]
    );
}

#[tokio::test]
async fn mediator_without_handlers_is_a_no_op() {
    let mediator = DomainEventMediator::<CatalogEvent>::new(Arc::new(
        InMemoryMessageBroker::default(),
    ));
    let category = Category::create(CategoryCreateCommand {
        name: "Drama".to_string(),
        ..Default::default()
    });
    let mut tracker = AggregateTracker::<CatalogEvent>::new();
    tracker.track(&category);

    let tracked = tracker.drain();
    mediator.publish(&tracked[0]).await.unwrap();
    assert_eq!(mediator.handler_count(), 0);
}
