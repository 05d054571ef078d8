//! Genre aggregate implementation.

use chrono::{DateTime, Utc};
use common::{CategoryId, GenreId};

use crate::aggregate::{AggregateRoot, PendingEvents};
use crate::notification::Notification;
use crate::validation;

use super::{GenreCreatedData, GenreEvent};

/// Input for [`Genre::create`].
#[derive(Debug, Clone, Default)]
pub struct GenreCreateCommand {
    pub name: String,
    pub categories_id: Vec<CategoryId>,
    /// Defaults to active.
    pub is_active: Option<bool>,
}

/// Stored state of a genre.
#[derive(Debug, Clone)]
pub struct GenreProps {
    pub genre_id: GenreId,
    pub name: String,
    pub categories_id: Vec<CategoryId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Genre aggregate root.
///
/// `categories_id` never holds the same category twice and must not be
/// empty for the genre to be valid.
#[derive(Debug, Clone)]
pub struct Genre {
    genre_id: GenreId,
    name: String,
    categories_id: Vec<CategoryId>,
    is_active: bool,
    created_at: DateTime<Utc>,
    notification: Notification,
    events: PendingEvents<GenreEvent>,
}

impl Genre {
    /// Creates a new genre and records `GenreCreated`.
    pub fn create(command: GenreCreateCommand) -> Self {
        let mut genre = Self::restore(GenreProps {
            genre_id: GenreId::new(),
            name: command.name,
            categories_id: command.categories_id,
            is_active: command.is_active.unwrap_or(true),
            created_at: validation::now(),
        });
        genre.validate();
        genre.apply_event(GenreEvent::GenreCreated(GenreCreatedData {
            genre_id: genre.genre_id,
            name: genre.name.clone(),
            categories_id: genre.categories_id.clone(),
            is_active: genre.is_active,
            created_at: genre.created_at,
            occurred_on: validation::now(),
        }));
        genre
    }

    /// Rebuilds a stored genre.
    pub fn restore(props: GenreProps) -> Self {
        Self {
            genre_id: props.genre_id,
            name: props.name,
            categories_id: validation::dedup(props.categories_id),
            is_active: props.is_active,
            created_at: props.created_at,
            notification: Notification::new(),
            events: PendingEvents::new(),
        }
    }

    /// Renames the genre and revalidates the name.
    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        validation::validate_name(&mut self.notification, "name", &self.name);
    }

    /// Links a category; already linked ids are ignored.
    pub fn add_category_id(&mut self, category_id: CategoryId) {
        validation::push_unique(&mut self.categories_id, category_id);
    }

    /// Unlinks a category if it is linked.
    pub fn remove_category_id(&mut self, category_id: CategoryId) {
        self.categories_id.retain(|id| *id != category_id);
    }

    /// Replaces the category set. An empty set is rejected.
    pub fn sync_categories_id(&mut self, categories_id: Vec<CategoryId>) {
        if categories_id.is_empty() {
            self.notification
                .add_error("categories_id should not be empty", Some("categories_id"));
            return;
        }
        self.categories_id = validation::dedup(categories_id);
    }

    /// Marks the genre active.
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Marks the genre inactive.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Checks every field rule, recording failures in the notification.
    pub fn validate(&mut self) -> bool {
        validation::validate_name(&mut self.notification, "name", &self.name);
        validation::validate_not_empty(&mut self.notification, "categories_id", &self.categories_id);
        !self.notification.has_errors()
    }

    pub fn genre_id(&self) -> GenreId {
        self.genre_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn categories_id(&self) -> &[CategoryId] {
        &self.categories_id
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl PartialEq for Genre {
    fn eq(&self, other: &Self) -> bool {
        self.genre_id == other.genre_id
    }
}

impl Eq for Genre {}

impl AggregateRoot for Genre {
    type Id = GenreId;
    type Event = GenreEvent;

    fn aggregate_type() -> &'static str {
        "Genre"
    }

    fn id(&self) -> Self::Id {
        self.genre_id
    }

    fn on_event(&mut self, event: &Self::Event) {
        match event {
            GenreEvent::GenreCreated(_) => {}
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
