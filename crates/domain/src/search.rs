//! Filter, sort and paginate contract shared by every searchable repository.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::aggregate::AggregateRoot;

/// Page size used when none (or an invalid one) is requested.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Largest page size a caller can request.
pub const MAX_PER_PAGE: u32 = 100;

/// Direction of a requested sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Applies the direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Returns the SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A sortable field of one entity. Implemented by a closed enum that acts as
/// the entity's sort allowlist.
pub trait SortField: Copy + std::fmt::Debug + Send + Sync + 'static {
    /// Every allowed field.
    const ALL: &'static [Self];

    /// The external name of the field.
    fn name(self) -> &'static str;

    /// Resolves an external name against the allowlist.
    fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}

/// Entities that can be searched through a [`crate::SearchableRepository`].
pub trait SearchableEntity: AggregateRoot {
    /// Entity-specific filter. Keys present at the same time combine with AND.
    type Filter: Clone + std::fmt::Debug + Send + Sync + 'static;

    /// Sort allowlist.
    type SortField: SortField;

    /// Creation timestamp, used by the default newest-first ordering.
    fn created_at(&self) -> DateTime<Utc>;

    /// Returns true if this entity passes the filter.
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Ascending comparison by one allowed field.
    fn compare_by(&self, other: &Self, field: Self::SortField) -> Ordering;
}

/// Case-insensitive substring test used by text filters.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Normalized search input.
///
/// Invalid page numbers fall back to 1, invalid page sizes fall back to
/// [`DEFAULT_PER_PAGE`], and page sizes are capped at [`MAX_PER_PAGE`].
/// A sort direction only exists when a sort field does.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams<F> {
    page: u32,
    per_page: u32,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<F>,
}

impl<F> Default for SearchParams<F> {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sort: None,
            sort_dir: None,
            filter: None,
        }
    }
}

impl<F> SearchParams<F> {
    /// Creates params for the first page with default size, no sort and no filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number.
    pub fn page(mut self, page: i64) -> Self {
        self.page = u32::try_from(page).ok().filter(|p| *p >= 1).unwrap_or(1);
        self
    }

    /// Sets the page size.
    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = match u32::try_from(per_page) {
            Ok(0) | Err(_) => DEFAULT_PER_PAGE,
            Ok(n) => n.min(MAX_PER_PAGE),
        };
        self
    }

    /// Sets the sort field; blank names clear the sort.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        let sort = sort.into();
        let sort = sort.trim();
        if sort.is_empty() {
            self.sort = None;
            self.sort_dir = None;
        } else {
            self.sort = Some(sort.to_string());
            self.sort_dir.get_or_insert(SortDirection::Asc);
        }
        self
    }

    /// Sets the sort direction. Ignored while no sort field is set.
    pub fn sort_dir(mut self, sort_dir: SortDirection) -> Self {
        if self.sort.is_some() {
            self.sort_dir = Some(sort_dir);
        }
        self
    }

    /// Sets the filter.
    pub fn filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Returns the 1-based page number.
    pub fn current_page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    pub fn page_size(&self) -> u32 {
        self.per_page
    }

    /// Returns the requested sort field name.
    pub fn sort_field(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// Returns the requested direction.
    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    /// Returns the filter.
    pub fn filter_value(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    /// Number of items to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Number of items to take.
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }

    /// Resolves the requested sort against the entity allowlist.
    ///
    /// Returns None when no sort was requested or the field is not allowed,
    /// in which case the newest-created-first default applies.
    pub fn resolved_sort<S: SortField>(&self) -> Option<(S, SortDirection)> {
        let field = S::parse(self.sort.as_deref()?)?;
        Some((field, self.sort_dir.unwrap_or_default()))
    }
}

/// One page of search results.
///
/// `last_page` is derived from `total` and `per_page` on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<E> {
    /// Items on this page, in result order.
    pub items: Vec<E>,

    /// Count of all items matching the filter, before pagination.
    pub total: u64,

    /// The page these items belong to.
    pub current_page: u32,

    /// The page size used.
    pub per_page: u32,
}

impl<E> SearchResult<E> {
    /// Creates a result page.
    pub fn new(items: Vec<E>, total: u64, current_page: u32, per_page: u32) -> Self {
        Self {
            items,
            total,
            current_page,
            per_page,
        }
    }

    /// Returns `ceil(total / per_page)`.
    pub fn last_page(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        u32::try_from(self.total.div_ceil(per_page)).unwrap_or(u32::MAX)
    }

    /// Converts every item, keeping the pagination data.
    pub fn map_items<U>(self, f: impl FnMut(E) -> U) -> SearchResult<U> {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
        }
    }
}

impl<E: Serialize> Serialize for SearchResult<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SearchResult", 5)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("total", &self.total)?;
        state.serialize_field("current_page", &self.current_page)?;
        state.serialize_field("per_page", &self.per_page)?;
        state.serialize_field("last_page", &self.last_page())?;
        state.end()
    }
}
