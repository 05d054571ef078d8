//! PostgreSQL storage backend.

mod cast_member;
mod category;
mod genre;
mod unit_of_work;
mod video;

use std::marker::PhantomData;
use std::time::Instant;

use async_trait::async_trait;
use domain::cast_member::CastMember;
use domain::category::Category;
use domain::genre::Genre;
use domain::video::Video;
use domain::{
    AggregateRoot, DomainError, ExistsByIdResult, Repository, Result, SearchParams, SearchResult,
    SearchableEntity, SearchableRepository, SortDirection, ensure_ids_not_empty,
};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::error::{PersistenceError, db_error, insert_error};

pub use unit_of_work::{PgTransaction, PgUnitOfWork};

/// Runs the catalog migrations.
pub async fn run_migrations(pool: &PgPool) -> crate::error::Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Row mapping and query fragments for an aggregate stored in PostgreSQL.
///
/// Every table carries a hidden `seq BIGSERIAL` column recording insertion
/// order; it breaks ties in every ordering so results match the in-memory
/// backend.
pub trait PgEntity: SearchableEntity {
    /// Table name.
    const TABLE: &'static str;

    /// Primary key column.
    const ID_COLUMN: &'static str;

    /// Columns written on insert and read on load, comma separated.
    const COLUMNS: &'static str;

    /// Binds this aggregate's values in `COLUMNS` order.
    fn push_row(&self, row: &mut Separated<'_, 'static, Postgres, &'static str>);

    /// Pushes `column = value` pairs for every mutable column.
    fn push_assignments(&self, set: &mut Separated<'_, 'static, Postgres, &'static str>);

    /// Rebuilds the aggregate from a row selected with `COLUMNS`.
    fn from_row(row: &PgRow) -> std::result::Result<Self, PersistenceError>;

    /// SQL expression for an allowed sort field.
    ///
    /// Text columns use `COLLATE "C"` so the order is byte-wise.
    fn sort_expression(field: Self::SortField) -> &'static str;

    /// Appends ` AND ...` predicates for `filter`.
    fn push_filter(filter: &Self::Filter, query: &mut QueryBuilder<'static, Postgres>);
}

/// Reads a column, wrapping driver errors.
pub(crate) fn column<'r, T>(row: &'r PgRow, name: &'static str) -> std::result::Result<T, PersistenceError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name).map_err(PersistenceError::from)
}

/// Appends a case-insensitive substring predicate.
pub(crate) fn push_contains(query: &mut QueryBuilder<'static, Postgres>, column: &str, value: &str) {
    query
        .push(format!(" AND strpos(lower({column}), lower("))
        .push_bind(value.to_string())
        .push(")) > 0");
}

/// Appends an array-overlap predicate.
pub(crate) fn push_overlaps(query: &mut QueryBuilder<'static, Postgres>, column: &str, ids: Vec<Uuid>) {
    query
        .push(format!(" AND {column} && "))
        .push_bind(ids)
        .push("::uuid[]");
}

/// Generic PostgreSQL repository.
pub struct PgRepository<A> {
    pool: PgPool,
    _entity: PhantomData<fn() -> A>,
}

impl<A> Clone for PgRepository<A> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

pub type PgCategoryRepository = PgRepository<Category>;
pub type PgGenreRepository = PgRepository<Genre>;
pub type PgCastMemberRepository = PgRepository<CastMember>;
pub type PgVideoRepository = PgRepository<Video>;

impl<A: PgEntity> PgRepository<A> {
    /// Creates a repository over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn select() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new(format!("SELECT {} FROM {} WHERE 1=1", A::COLUMNS, A::TABLE))
    }

    fn uuids(ids: &[A::Id]) -> Vec<Uuid> {
        ids.iter().map(|id| (*id).into()).collect()
    }

    async fn execute(
        &self,
        query: &mut QueryBuilder<'static, Postgres>,
        tx: Option<&mut PgTransaction>,
    ) -> std::result::Result<u64, sqlx::Error> {
        let query = query.build();
        let result = match tx {
            Some(tx) => query.execute(&mut **tx).await?,
            None => query.execute(&self.pool).await?,
        };
        Ok(result.rows_affected())
    }

    async fn fetch(&self, mut query: QueryBuilder<'static, Postgres>) -> Result<Vec<A>> {
        let rows = query.build().fetch_all(&self.pool).await.map_err(db_error)?;
        rows.iter()
            .map(|row| A::from_row(row).map_err(DomainError::from))
            .collect()
    }

    fn insert_query<'a>(entities: impl IntoIterator<Item = &'a A>) -> QueryBuilder<'static, Postgres>
    where
        A: 'a,
    {
        let mut query = QueryBuilder::new(format!("INSERT INTO {} ({}) ", A::TABLE, A::COLUMNS));
        query.push_values(entities, |mut row, entity| entity.push_row(&mut row));
        query
    }
}

#[async_trait]
impl<A: PgEntity> Repository<A> for PgRepository<A> {
    type Transaction = PgTransaction;

    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), id = %entity.id()))]
    async fn insert(&self, entity: &A, tx: Option<&mut PgTransaction>) -> Result<()> {
        let mut query = Self::insert_query([entity]);
        self.execute(&mut query, tx)
            .await
            .map_err(|err| insert_error(A::aggregate_type(), err))?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), count = entities.len()))]
    async fn bulk_insert(&self, entities: &[A], tx: Option<&mut PgTransaction>) -> Result<()> {
        if entities.is_empty() {
            return Ok(());
        }
        // A single multi-row INSERT is atomic on its own.
        let mut query = Self::insert_query(entities);
        self.execute(&mut query, tx)
            .await
            .map_err(|err| insert_error(A::aggregate_type(), err))?;
        Ok(())
    }

    async fn find_by_id(&self, id: A::Id) -> Result<Option<A>> {
        let mut query = Self::select();
        query
            .push(format!(" AND {} = ", A::ID_COLUMN))
            .push_bind(Into::<Uuid>::into(id));
        Ok(self.fetch(query).await?.into_iter().next())
    }

    async fn find_by_ids(&self, ids: &[A::Id]) -> Result<Vec<A>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = Self::select();
        query
            .push(format!(" AND {} = ANY(", A::ID_COLUMN))
            .push_bind(Self::uuids(ids))
            .push(") ORDER BY seq ASC");
        self.fetch(query).await
    }

    async fn find_all(&self) -> Result<Vec<A>> {
        let mut query = Self::select();
        query.push(" ORDER BY seq ASC");
        self.fetch(query).await
    }

    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), count = ids.len()))]
    async fn exists_by_id(&self, ids: &[A::Id]) -> Result<ExistsByIdResult<A::Id>> {
        ensure_ids_not_empty(ids)?;

        let found: Vec<Uuid> = sqlx::query_scalar(&format!(
            "SELECT {id} FROM {table} WHERE {id} = ANY($1)",
            id = A::ID_COLUMN,
            table = A::TABLE
        ))
        .bind(Self::uuids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let (exists, not_exists) = ids
            .iter()
            .copied()
            .partition(|id| found.contains(&(*id).into()));
        Ok(ExistsByIdResult { exists, not_exists })
    }

    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), id = %entity.id()))]
    async fn update(&self, entity: &A, tx: Option<&mut PgTransaction>) -> Result<()> {
        let mut query = QueryBuilder::new(format!("UPDATE {} SET ", A::TABLE));
        entity.push_assignments(&mut query.separated(", "));
        query
            .push(format!(" WHERE {} = ", A::ID_COLUMN))
            .push_bind(Into::<Uuid>::into(entity.id()));

        let affected = self.execute(&mut query, tx).await.map_err(db_error)?;
        if affected == 0 {
            return Err(DomainError::not_found(A::aggregate_type(), [entity.id()]));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, tx), fields(entity = A::aggregate_type()))]
    async fn delete(&self, id: A::Id, tx: Option<&mut PgTransaction>) -> Result<()> {
        let mut query = QueryBuilder::new(format!("DELETE FROM {} WHERE {} = ", A::TABLE, A::ID_COLUMN));
        query.push_bind(Into::<Uuid>::into(id));

        let affected = self.execute(&mut query, tx).await.map_err(db_error)?;
        if affected == 0 {
            return Err(DomainError::not_found(A::aggregate_type(), [id]));
        }
        Ok(())
    }
}

#[async_trait]
impl<A: PgEntity> SearchableRepository<A> for PgRepository<A> {
    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), page = params.current_page()))]
    async fn search(&self, params: SearchParams<A::Filter>) -> Result<SearchResult<A>> {
        let started = Instant::now();

        let mut count = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} WHERE 1=1", A::TABLE));
        let mut select = Self::select();
        if let Some(filter) = params.filter_value() {
            A::push_filter(filter, &mut count);
            A::push_filter(filter, &mut select);
        }

        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        match params.resolved_sort::<A::SortField>() {
            Some((field, direction)) => select.push(format!(
                " ORDER BY {} {}, seq ASC",
                A::sort_expression(field),
                direction.as_sql()
            )),
            None => select.push(format!(
                " ORDER BY created_at {}, seq ASC",
                SortDirection::Desc.as_sql()
            )),
        };
        select
            .push(" LIMIT ")
            .push_bind(i64::try_from(params.limit()).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(params.offset()).unwrap_or(i64::MAX));

        let items = self.fetch(select).await?;

        metrics::histogram!(
            "repository_search_duration_seconds",
            "backend" => "postgres",
            "entity" => A::aggregate_type()
        )
        .record(started.elapsed().as_secs_f64());

        Ok(SearchResult::new(
            items,
            u64::try_from(total).unwrap_or_default(),
            params.current_page(),
            params.page_size(),
        ))
    }
}
