//! Genre search filter and sort allowlist.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use common::CategoryId;

use crate::search::{SearchableEntity, SortField, contains_ignore_case};

use super::Genre;

/// Genre search filter. Both keys combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Matches genres referencing any of these categories.
    pub categories_id: Option<Vec<CategoryId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenreSortField {
    Name,
    CreatedAt,
}

impl SortField for GenreSortField {
    const ALL: &'static [Self] = &[GenreSortField::Name, GenreSortField::CreatedAt];

    fn name(self) -> &'static str {
        match self {
            GenreSortField::Name => "name",
            GenreSortField::CreatedAt => "created_at",
        }
    }
}

impl SearchableEntity for Genre {
    type Filter = GenreFilter;
    type SortField = GenreSortField;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at()
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        let name_matches = filter
            .name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(self.name(), name));
        let categories_match = filter
            .categories_id
            .as_deref()
            .is_none_or(|wanted| self.categories_id().iter().any(|id| wanted.contains(id)));
        name_matches && categories_match
    }

    fn compare_by(&self, other: &Self, field: Self::SortField) -> Ordering {
        match field {
            GenreSortField::Name => self.name().cmp(other.name()),
            GenreSortField::CreatedAt => self.created_at().cmp(&other.created_at()),
        }
    }
}
