//! Cast member search filter and sort allowlist.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::search::{SearchableEntity, SortField, contains_ignore_case};

use super::{CastMember, CastMemberType};

/// Cast member search filter. Both keys combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CastMemberFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Exact role.
    pub member_type: Option<CastMemberType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastMemberSortField {
    Name,
    CreatedAt,
}

impl SortField for CastMemberSortField {
    const ALL: &'static [Self] = &[CastMemberSortField::Name, CastMemberSortField::CreatedAt];

    fn name(self) -> &'static str {
        match self {
            CastMemberSortField::Name => "name",
            CastMemberSortField::CreatedAt => "created_at",
        }
    }
}

impl SearchableEntity for CastMember {
    type Filter = CastMemberFilter;
    type SortField = CastMemberSortField;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at()
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        let name_matches = filter
            .name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(self.name(), name));
        let type_matches = filter
            .member_type
            .is_none_or(|member_type| self.member_type() == member_type);
        name_matches && type_matches
    }

    fn compare_by(&self, other: &Self, field: Self::SortField) -> Ordering {
        match field {
            CastMemberSortField::Name => self.name().cmp(other.name()),
            CastMemberSortField::CreatedAt => self.created_at().cmp(&other.created_at()),
        }
    }
}
