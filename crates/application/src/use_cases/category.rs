//! Category use cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::CategoryId;
use domain::category::{Category, CategoryCreateCommand, CategoryFilter};
use domain::{CatalogEvent, Repository, SearchParams, SearchResult, SearchableRepository, UnitOfWork};
use serde::Serialize;

use super::{ensure_valid, find_or_fail};
use crate::error::{ApplicationError, Result};
use crate::service::ApplicationService;

/// Category as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOutput {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryOutput {
    fn from(category: &Category) -> Self {
        Self {
            id: category.category_id(),
            name: category.name().to_string(),
            description: category.description().map(str::to_string),
            is_active: category.is_active(),
            created_at: category.created_at(),
        }
    }
}

/// Fields for a new category. `is_active` defaults to true.
#[derive(Debug, Clone, Default)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Validates and stores a new category, then publishes `CategoryCreated`.
pub struct CreateCategoryUseCase<U: UnitOfWork, R> {
    service: ApplicationService<U>,
    repo: Arc<R>,
}

impl<U, R> CreateCategoryUseCase<U, R>
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<Category, Transaction = U::Transaction>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<R>) -> Self {
        Self { service, repo }
    }

    #[tracing::instrument(skip_all, fields(name = %input.name))]
    pub async fn execute(&mut self, input: CreateCategoryInput) -> Result<CategoryOutput> {
        let category = Category::create(CategoryCreateCommand {
            name: input.name,
            description: input.description,
            is_active: input.is_active,
        });
        ensure_valid(&category)?;

        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.insert(&category, uow.transaction()).await?;
                uow.add_aggregate_root(&category)?;
                Ok::<_, ApplicationError>(CategoryOutput::from(&category))
            })
            .await
    }
}

/// Fields left as None keep their current value.
#[derive(Debug, Clone)]
pub struct UpdateCategoryInput {
    pub id: CategoryId,
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl UpdateCategoryInput {
    /// An update that changes nothing yet.
    pub fn new(id: CategoryId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            is_active: None,
        }
    }
}

/// Applies a partial update to a stored category.
pub struct UpdateCategoryUseCase<U: UnitOfWork, R> {
    service: ApplicationService<U>,
    repo: Arc<R>,
}

impl<U, R> UpdateCategoryUseCase<U, R>
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<Category, Transaction = U::Transaction>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<R>) -> Self {
        Self { service, repo }
    }

    #[tracing::instrument(skip_all, fields(id = %input.id))]
    pub async fn execute(&mut self, input: UpdateCategoryInput) -> Result<CategoryOutput> {
        let mut category = find_or_fail::<Category, _>(self.repo.as_ref(), input.id).await?;

        if let Some(name) = input.name {
            category.change_name(name);
        }
        if let Some(description) = input.description {
            category.change_description(description);
        }
        match input.is_active {
            Some(true) => category.activate(),
            Some(false) => category.deactivate(),
            None => {}
        }
        ensure_valid(&category)?;

        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.update(&category, uow.transaction()).await?;
                uow.add_aggregate_root(&category)?;
                Ok::<_, ApplicationError>(CategoryOutput::from(&category))
            })
            .await
    }
}

/// Deletes a category by id. Unknown ids fail with `NotFound`.
pub struct DeleteCategoryUseCase<U: UnitOfWork, R> {
    service: ApplicationService<U>,
    repo: Arc<R>,
}

impl<U, R> DeleteCategoryUseCase<U, R>
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<Category, Transaction = U::Transaction>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<R>) -> Self {
        Self { service, repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&mut self, id: CategoryId) -> Result<()> {
        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.delete(id, uow.transaction()).await?;
                Ok::<_, ApplicationError>(())
            })
            .await
    }
}

/// Loads one category.
pub struct GetCategoryUseCase<R> {
    repo: Arc<R>,
}

impl<R: Repository<Category>> GetCategoryUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: CategoryId) -> Result<CategoryOutput> {
        let category = find_or_fail::<Category, _>(self.repo.as_ref(), id).await?;
        Ok(CategoryOutput::from(&category))
    }
}

/// Searches categories.
pub struct ListCategoriesUseCase<R> {
    repo: Arc<R>,
}

impl<R: SearchableRepository<Category>> ListCategoriesUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        params: SearchParams<CategoryFilter>,
    ) -> Result<SearchResult<CategoryOutput>> {
        let result = self.repo.search(params).await?;
        Ok(result.map_items(|category| CategoryOutput::from(&category)))
    }
}
