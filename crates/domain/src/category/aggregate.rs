//! Category aggregate implementation.

use chrono::{DateTime, Utc};
use common::CategoryId;

use crate::aggregate::{AggregateRoot, PendingEvents};
use crate::notification::Notification;
use crate::validation;

use super::{CategoryCreatedData, CategoryEvent};

/// Input for [`Category::create`].
#[derive(Debug, Clone, Default)]
pub struct CategoryCreateCommand {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to active.
    pub is_active: Option<bool>,
}

/// Stored state of a category, used to rebuild it without emitting events.
#[derive(Debug, Clone)]
pub struct CategoryProps {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Category aggregate root.
#[derive(Debug, Clone)]
pub struct Category {
    category_id: CategoryId,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    notification: Notification,
    events: PendingEvents<CategoryEvent>,
}

impl Category {
    /// Creates a new category and records `CategoryCreated`.
    ///
    /// Validation errors end up in [`AggregateRoot::notification`].
    pub fn create(command: CategoryCreateCommand) -> Self {
        let mut category = Self::restore(CategoryProps {
            category_id: CategoryId::new(),
            name: command.name,
            description: command.description,
            is_active: command.is_active.unwrap_or(true),
            created_at: validation::now(),
        });
        category.validate();
        category.apply_event(CategoryEvent::CategoryCreated(CategoryCreatedData {
            category_id: category.category_id,
            name: category.name.clone(),
            description: category.description.clone(),
            is_active: category.is_active,
            created_at: category.created_at,
            occurred_on: validation::now(),
        }));
        category
    }

    /// Rebuilds a stored category.
    pub fn restore(props: CategoryProps) -> Self {
        Self {
            category_id: props.category_id,
            name: props.name,
            description: props.description,
            is_active: props.is_active,
            created_at: props.created_at,
            notification: Notification::new(),
            events: PendingEvents::new(),
        }
    }

    /// Renames the category and revalidates the name.
    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validate();
    }

    /// Replaces the description; `None` clears it.
    pub fn change_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Marks the category active.
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Marks the category inactive.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Checks every field rule, recording failures in the notification.
    pub fn validate(&mut self) -> bool {
        validation::validate_name(&mut self.notification, "name", &self.name);
        !self.notification.has_errors()
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.category_id == other.category_id
    }
}

impl Eq for Category {}

impl AggregateRoot for Category {
    type Id = CategoryId;
    type Event = CategoryEvent;

    fn aggregate_type() -> &'static str {
        "Category"
    }

    fn id(&self) -> Self::Id {
        self.category_id
    }

    fn on_event(&mut self, event: &Self::Event) {
        match event {
            CategoryEvent::CategoryCreated(_) => {}
        }
    }

    fn pending_events(&self) -> &PendingEvents<Self::Event> {
        &self.events
    }

    fn pending_events_mut(&mut self) -> &mut PendingEvents<Self::Event> {
        &mut self.events
    }

    fn notification(&self) -> &Notification {
        &self.notification
    }
}
