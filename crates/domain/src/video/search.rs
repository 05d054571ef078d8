//! Video search filter and sort allowlist.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use common::{CastMemberId, CategoryId, GenreId};

use crate::search::{SearchableEntity, SortField, contains_ignore_case};

use super::Video;

/// Video search filter. Present keys combine with AND; each id list
/// matches videos referencing any of its ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoFilter {
    pub title: Option<String>,
    pub categories_id: Option<Vec<CategoryId>>,
    pub genres_id: Option<Vec<GenreId>>,
    pub cast_members_id: Option<Vec<CastMemberId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSortField {
    Title,
    CreatedAt,
}

impl SortField for VideoSortField {
    const ALL: &'static [Self] = &[VideoSortField::Title, VideoSortField::CreatedAt];

    fn name(self) -> &'static str {
        match self {
            VideoSortField::Title => "title",
            VideoSortField::CreatedAt => "created_at",
        }
    }
}

fn any_of<T: PartialEq>(wanted: Option<&[T]>, have: &[T]) -> bool {
    wanted.is_none_or(|wanted| have.iter().any(|id| wanted.contains(id)))
}

impl SearchableEntity for Video {
    type Filter = VideoFilter;
    type SortField = VideoSortField;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at()
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter
            .title
            .as_deref()
            .is_none_or(|title| contains_ignore_case(self.title(), title))
            && any_of(filter.categories_id.as_deref(), self.categories_id())
            && any_of(filter.genres_id.as_deref(), self.genres_id())
            && any_of(filter.cast_members_id.as_deref(), self.cast_members_id())
    }

    fn compare_by(&self, other: &Self, field: Self::SortField) -> Ordering {
        match field {
            VideoSortField::Title => self.title().cmp(other.title()),
            VideoSortField::CreatedAt => self.created_at().cmp(&other.created_at()),
        }
    }
}
