//! Genre use cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{CategoryId, GenreId};
use domain::category::Category;
use domain::genre::{Genre, GenreCreateCommand, GenreFilter};
use domain::{CatalogEvent, Repository, SearchParams, SearchResult, SearchableRepository, UnitOfWork};
use serde::Serialize;

use super::{ensure_exist, ensure_valid, find_or_fail};
use crate::error::{ApplicationError, Result};
use crate::service::ApplicationService;

/// Genre as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreOutput {
    pub id: GenreId,
    pub name: String,
    pub categories_id: Vec<CategoryId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Genre> for GenreOutput {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.genre_id(),
            name: genre.name().to_string(),
            categories_id: genre.categories_id().to_vec(),
            is_active: genre.is_active(),
            created_at: genre.created_at(),
        }
    }
}

/// Fields for a new genre.
#[derive(Debug, Clone, Default)]
pub struct CreateGenreInput {
    pub name: String,
    pub categories_id: Vec<CategoryId>,
    pub is_active: Option<bool>,
}

/// Stores a new genre after checking that every linked category exists.
pub struct CreateGenreUseCase<U: UnitOfWork, R, C> {
    service: ApplicationService<U>,
    repo: Arc<R>,
    categories: Arc<C>,
}

impl<U, R, C> CreateGenreUseCase<U, R, C>
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<Genre, Transaction = U::Transaction>,
    C: Repository<Category>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<R>, categories: Arc<C>) -> Self {
        Self {
            service,
            repo,
            categories,
        }
    }

    #[tracing::instrument(skip_all, fields(name = %input.name))]
    pub async fn execute(&mut self, input: CreateGenreInput) -> Result<GenreOutput> {
        let genre = Genre::create(GenreCreateCommand {
            name: input.name,
            categories_id: input.categories_id,
            is_active: input.is_active,
        });
        ensure_valid(&genre)?;
        ensure_exist::<Category, _>(self.categories.as_ref(), genre.categories_id()).await?;

        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.insert(&genre, uow.transaction()).await?;
                uow.add_aggregate_root(&genre)?;
                Ok::<_, ApplicationError>(GenreOutput::from(&genre))
            })
            .await
    }
}

/// Fields left as None keep their current value. `categories_id`
/// replaces the whole set.
#[derive(Debug, Clone)]
pub struct UpdateGenreInput {
    pub id: GenreId,
    pub name: Option<String>,
    pub categories_id: Option<Vec<CategoryId>>,
    pub is_active: Option<bool>,
}

/// Applies a partial update to a stored genre. A replaced category set
/// is checked against the category repository.
pub struct UpdateGenreUseCase<U: UnitOfWork, R, C> {
    service: ApplicationService<U>,
    repo: Arc<R>,
    categories: Arc<C>,
}

impl<U, R, C> UpdateGenreUseCase<U, R, C>
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<Genre, Transaction = U::Transaction>,
    C: Repository<Category>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<R>, categories: Arc<C>) -> Self {
        Self {
            service,
            repo,
            categories,
        }
    }

    #[tracing::instrument(skip_all, fields(id = %input.id))]
    pub async fn execute(&mut self, input: UpdateGenreInput) -> Result<GenreOutput> {
        let mut genre = find_or_fail::<Genre, _>(self.repo.as_ref(), input.id).await?;

        if let Some(name) = input.name {
            genre.change_name(name);
        }
        if let Some(categories_id) = input.categories_id {
            genre.sync_categories_id(categories_id);
        }
        match input.is_active {
            Some(true) => genre.activate(),
            Some(false) => genre.deactivate(),
            None => {}
        }
        ensure_valid(&genre)?;
        ensure_exist::<Category, _>(self.categories.as_ref(), genre.categories_id()).await?;

        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.update(&genre, uow.transaction()).await?;
                uow.add_aggregate_root(&genre)?;
                Ok::<_, ApplicationError>(GenreOutput::from(&genre))
            })
            .await
    }
}

/// Deletes a genre by id.
pub struct DeleteGenreUseCase<U: UnitOfWork, R> {
    service: ApplicationService<U>,
    repo: Arc<R>,
}

impl<U, R> DeleteGenreUseCase<U, R>
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<Genre, Transaction = U::Transaction>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<R>) -> Self {
        Self { service, repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&mut self, id: GenreId) -> Result<()> {
        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.delete(id, uow.transaction()).await?;
                Ok::<_, ApplicationError>(())
            })
            .await
    }
}

pub struct GetGenreUseCase<R> {
    repo: Arc<R>,
}

impl<R: Repository<Genre>> GetGenreUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: GenreId) -> Result<GenreOutput> {
        let genre = find_or_fail::<Genre, _>(self.repo.as_ref(), id).await?;
        Ok(GenreOutput::from(&genre))
    }
}

/// Searches genres.
pub struct ListGenresUseCase<R> {
    repo: Arc<R>,
}

impl<R: SearchableRepository<Genre>> ListGenresUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, params: SearchParams<GenreFilter>) -> Result<SearchResult<GenreOutput>> {
        let result = self.repo.search(params).await?;
        Ok(result.map_items(|genre| GenreOutput::from(&genre)))
    }
}
