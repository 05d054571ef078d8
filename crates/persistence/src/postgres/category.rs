use common::CategoryId;
use domain::category::{Category, CategoryFilter, CategoryProps, CategorySortField};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{PgEntity, column, push_contains};
use crate::error::PersistenceError;

impl PgEntity for Category {
    const TABLE: &'static str = "categories";
    const ID_COLUMN: &'static str = "category_id";
    const COLUMNS: &'static str = "category_id, name, description, is_active, created_at";

    fn push_row(&self, row: &mut Separated<'_, 'static, Postgres, &'static str>) {
        row.push_bind(self.category_id().as_uuid())
            .push_bind(self.name().to_string())
            .push_bind(self.description().map(str::to_string))
            .push_bind(self.is_active())
            .push_bind(self.created_at());
    }

    fn push_assignments(&self, set: &mut Separated<'_, 'static, Postgres, &'static str>) {
        set.push("name = ").push_bind_unseparated(self.name().to_string());
        set.push("description = ")
            .push_bind_unseparated(self.description().map(str::to_string));
        set.push("is_active = ").push_bind_unseparated(self.is_active());
    }

    fn from_row(row: &PgRow) -> Result<Self, PersistenceError> {
        Ok(Category::restore(CategoryProps {
            category_id: CategoryId::from_uuid(column::<Uuid>(row, "category_id")?),
            name: column(row, "name")?,
            description: column(row, "description")?,
            is_active: column(row, "is_active")?,
            created_at: column(row, "created_at")?,
        }))
    }

    fn sort_expression(field: CategorySortField) -> &'static str {
        match field {
            CategorySortField::Name => "name COLLATE \"C\"",
            CategorySortField::CreatedAt => "created_at",
        }
    }

    fn push_filter(filter: &CategoryFilter, query: &mut QueryBuilder<'static, Postgres>) {
        if let Some(name) = &filter.name {
            push_contains(query, "name", name);
        }
    }
}
