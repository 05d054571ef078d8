use common::{CategoryId, GenreId};
use domain::genre::{Genre, GenreFilter, GenreProps, GenreSortField};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{PgEntity, column, push_contains, push_overlaps};
use crate::error::PersistenceError;

fn category_uuids(ids: &[CategoryId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.as_uuid()).collect()
}

impl PgEntity for Genre {
    const TABLE: &'static str = "genres";
    const ID_COLUMN: &'static str = "genre_id";
    const COLUMNS: &'static str = "genre_id, name, categories_id, is_active, created_at";

    fn push_row(&self, row: &mut Separated<'_, 'static, Postgres, &'static str>) {
        row.push_bind(self.genre_id().as_uuid())
            .push_bind(self.name().to_string())
            .push_bind(category_uuids(self.categories_id()))
            .push_bind(self.is_active())
            .push_bind(self.created_at());
    }

    fn push_assignments(&self, set: &mut Separated<'_, 'static, Postgres, &'static str>) {
        set.push("name = ").push_bind_unseparated(self.name().to_string());
        set.push("categories_id = ")
            .push_bind_unseparated(category_uuids(self.categories_id()));
        set.push("is_active = ").push_bind_unseparated(self.is_active());
    }

    fn from_row(row: &PgRow) -> Result<Self, PersistenceError> {
        let categories_id: Vec<Uuid> = column(row, "categories_id")?;
        Ok(Genre::restore(GenreProps {
            genre_id: GenreId::from_uuid(column::<Uuid>(row, "genre_id")?),
            name: column(row, "name")?,
            categories_id: categories_id.into_iter().map(CategoryId::from_uuid).collect(),
            is_active: column(row, "is_active")?,
            created_at: column(row, "created_at")?,
        }))
    }

    fn sort_expression(field: GenreSortField) -> &'static str {
        match field {
            GenreSortField::Name => "name COLLATE \"C\"",
            GenreSortField::CreatedAt => "created_at",
        }
    }

    fn push_filter(filter: &GenreFilter, query: &mut QueryBuilder<'static, Postgres>) {
        if let Some(name) = &filter.name {
            push_contains(query, "name", name);
        }
        if let Some(categories_id) = &filter.categories_id {
            push_overlaps(query, "categories_id", category_uuids(categories_id));
        }
    }
}
