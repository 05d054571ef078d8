//! Category search filter and sort allowlist.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::search::{SearchableEntity, SortField, contains_ignore_case};

use super::Category;

/// Category search filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}

impl CategoryFilter {
    /// Filter on a case-insensitive name fragment.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySortField {
    Name,
    CreatedAt,
}

impl SortField for CategorySortField {
    const ALL: &'static [Self] = &[CategorySortField::Name, CategorySortField::CreatedAt];

    fn name(self) -> &'static str {
        match self {
            CategorySortField::Name => "name",
            CategorySortField::CreatedAt => "created_at",
        }
    }
}

impl SearchableEntity for Category {
    type Filter = CategoryFilter;
    type SortField = CategorySortField;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at()
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter
            .name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(self.name(), name))
    }

    fn compare_by(&self, other: &Self, field: Self::SortField) -> Ordering {
        match field {
            CategorySortField::Name => self.name().cmp(other.name()),
            CategorySortField::CreatedAt => self.created_at().cmp(&other.created_at()),
        }
    }
}
