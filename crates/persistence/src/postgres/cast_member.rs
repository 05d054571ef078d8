use common::CastMemberId;
use domain::cast_member::{
    CastMember, CastMemberFilter, CastMemberProps, CastMemberSortField, CastMemberType,
};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{PgEntity, column, push_contains};
use crate::error::PersistenceError;

impl PgEntity for CastMember {
    const TABLE: &'static str = "cast_members";
    const ID_COLUMN: &'static str = "cast_member_id";
    const COLUMNS: &'static str = "cast_member_id, name, member_type, created_at";

    fn push_row(&self, row: &mut Separated<'_, 'static, Postgres, &'static str>) {
        row.push_bind(self.cast_member_id().as_uuid())
            .push_bind(self.name().to_string())
            .push_bind(self.member_type().code())
            .push_bind(self.created_at());
    }

    fn push_assignments(&self, set: &mut Separated<'_, 'static, Postgres, &'static str>) {
        set.push("name = ").push_bind_unseparated(self.name().to_string());
        set.push("member_type = ")
            .push_bind_unseparated(self.member_type().code());
    }

    fn from_row(row: &PgRow) -> Result<Self, PersistenceError> {
        let code: i16 = column(row, "member_type")?;
        let member_type =
            CastMemberType::try_from(code).map_err(|err| PersistenceError::InvalidRow {
                column: "member_type",
                message: err.to_string(),
            })?;

        Ok(CastMember::restore(CastMemberProps {
            cast_member_id: CastMemberId::from_uuid(column::<Uuid>(row, "cast_member_id")?),
            name: column(row, "name")?,
            member_type,
            created_at: column(row, "created_at")?,
        }))
    }

    fn sort_expression(field: CastMemberSortField) -> &'static str {
        match field {
            CastMemberSortField::Name => "name COLLATE \"C\"",
            CastMemberSortField::CreatedAt => "created_at",
        }
    }

    fn push_filter(filter: &CastMemberFilter, query: &mut QueryBuilder<'static, Postgres>) {
        if let Some(name) = &filter.name {
            push_contains(query, "name", name);
        }
        if let Some(member_type) = filter.member_type {
            query
                .push(" AND member_type = ")
                .push_bind(member_type.code());
        }
    }
}
