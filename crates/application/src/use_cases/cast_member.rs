//! Cast member use cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::CastMemberId;
use domain::cast_member::{CastMember, CastMemberCreateCommand, CastMemberFilter, CastMemberType};
use domain::{CatalogEvent, Repository, SearchParams, SearchResult, SearchableRepository, UnitOfWork};
use serde::Serialize;

use super::{ensure_valid, find_or_fail};
use crate::error::{ApplicationError, Result};
use crate::service::ApplicationService;

/// Cast member as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastMemberOutput {
    pub id: CastMemberId,
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: CastMemberType,
    pub created_at: DateTime<Utc>,
}

impl From<&CastMember> for CastMemberOutput {
    fn from(member: &CastMember) -> Self {
        Self {
            id: member.cast_member_id(),
            name: member.name().to_string(),
            member_type: member.member_type(),
            created_at: member.created_at(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateCastMemberInput {
    pub name: String,
    pub member_type: CastMemberType,
}

/// Validates and stores a new cast member.
pub struct CreateCastMemberUseCase<U: UnitOfWork, R> {
    service: ApplicationService<U>,
    repo: Arc<R>,
}

impl<U, R> CreateCastMemberUseCase<U, R>
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<CastMember, Transaction = U::Transaction>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<R>) -> Self {
        Self { service, repo }
    }

    #[tracing::instrument(skip_all, fields(name = %input.name))]
    pub async fn execute(&mut self, input: CreateCastMemberInput) -> Result<CastMemberOutput> {
        let member = CastMember::create(CastMemberCreateCommand {
            name: input.name,
            member_type: input.member_type,
        });
        ensure_valid(&member)?;

        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.insert(&member, uow.transaction()).await?;
                uow.add_aggregate_root(&member)?;
                Ok::<_, ApplicationError>(CastMemberOutput::from(&member))
            })
            .await
    }
}

/// Fields left as None keep their current value.
#[derive(Debug, Clone)]
pub struct UpdateCastMemberInput {
    pub id: CastMemberId,
    pub name: Option<String>,
    pub member_type: Option<CastMemberType>,
}

/// Applies a partial update to a stored cast member.
pub struct UpdateCastMemberUseCase<U: UnitOfWork, R> {
    service: ApplicationService<U>,
    repo: Arc<R>,
}

impl<U, R> UpdateCastMemberUseCase<U, R>
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<CastMember, Transaction = U::Transaction>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<R>) -> Self {
        Self { service, repo }
    }

    #[tracing::instrument(skip_all, fields(id = %input.id))]
    pub async fn execute(&mut self, input: UpdateCastMemberInput) -> Result<CastMemberOutput> {
        let mut member = find_or_fail::<CastMember, _>(self.repo.as_ref(), input.id).await?;

        if let Some(name) = input.name {
            member.change_name(name);
        }
        if let Some(member_type) = input.member_type {
            member.change_type(member_type);
        }
        ensure_valid(&member)?;

        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.update(&member, uow.transaction()).await?;
                uow.add_aggregate_root(&member)?;
                Ok::<_, ApplicationError>(CastMemberOutput::from(&member))
            })
            .await
    }
}

/// Deletes a cast member by id.
pub struct DeleteCastMemberUseCase<U: UnitOfWork, R> {
    service: ApplicationService<U>,
    repo: Arc<R>,
}

impl<U, R> DeleteCastMemberUseCase<U, R>
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<CastMember, Transaction = U::Transaction>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<R>) -> Self {
        Self { service, repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&mut self, id: CastMemberId) -> Result<()> {
        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.delete(id, uow.transaction()).await?;
                Ok::<_, ApplicationError>(())
            })
            .await
    }
}

/// Loads one cast member.
pub struct GetCastMemberUseCase<R> {
    repo: Arc<R>,
}

impl<R: Repository<CastMember>> GetCastMemberUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: CastMemberId) -> Result<CastMemberOutput> {
        let member = find_or_fail::<CastMember, _>(self.repo.as_ref(), id).await?;
        Ok(CastMemberOutput::from(&member))
    }
}

pub struct ListCastMembersUseCase<R> {
    repo: Arc<R>,
}

impl<R: SearchableRepository<CastMember>> ListCastMembersUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        params: SearchParams<CastMemberFilter>,
    ) -> Result<SearchResult<CastMemberOutput>> {
        let result = self.repo.search(params).await?;
        Ok(result.map_items(|member| CastMemberOutput::from(&member)))
    }
}
