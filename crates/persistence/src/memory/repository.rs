use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use async_trait::async_trait;
use domain::{
    AggregateRoot, DomainError, ExistsByIdResult, Repository, Result, SearchParams, SearchResult,
    SearchableEntity, SearchableRepository, ensure_ids_not_empty,
};
use uuid::Uuid;

use super::InMemoryTransaction;
use super::transaction::Undo;

type Items<A> = Arc<RwLock<Vec<A>>>;

fn read<A>(items: &Items<A>) -> RwLockReadGuard<'_, Vec<A>> {
    items.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<A>(items: &Items<A>) -> RwLockWriteGuard<'_, Vec<A>> {
    items.write().unwrap_or_else(PoisonError::into_inner)
}

fn push_new<A: AggregateRoot>(items: &Items<A>, entity: A) -> Result<Undo> {
    let id = entity.id();
    let mut guard = write(items);
    if guard.iter().any(|e| e.id() == id) {
        return Err(already_exists::<A>(id));
    }
    guard.push(entity);
    let items = Arc::clone(items);
    Ok(Box::new(move || write(&items).retain(|e| e.id() != id)))
}

fn replace_existing<A: AggregateRoot>(items: &Items<A>, entity: A) -> Result<Undo> {
    let id = entity.id();
    let mut guard = write(items);
    let slot = guard
        .iter_mut()
        .find(|e| e.id() == id)
        .ok_or_else(|| DomainError::not_found(A::aggregate_type(), [id]))?;
    let previous = std::mem::replace(slot, entity);
    let items = Arc::clone(items);
    Ok(Box::new(move || {
        if let Some(slot) = write(&items).iter_mut().find(|e| e.id() == id) {
            *slot = previous;
        }
    }))
}

fn remove_existing<A: AggregateRoot>(items: &Items<A>, id: A::Id) -> Result<Undo> {
    let mut guard = write(items);
    let position = guard
        .iter()
        .position(|e| e.id() == id)
        .ok_or_else(|| DomainError::not_found(A::aggregate_type(), [id]))?;
    let removed = guard.remove(position);
    let items = Arc::clone(items);
    Ok(Box::new(move || {
        let mut items = write(&items);
        let position = position.min(items.len());
        items.insert(position, removed);
    }))
}

fn already_exists<A: AggregateRoot>(id: A::Id) -> DomainError {
    DomainError::InvalidArgument(format!(
        "{} with ID {id} already exists",
        A::aggregate_type()
    ))
}

/// In-memory repository for one aggregate type.
///
/// Items keep insertion order; updates replace in place. Clones share the
/// same storage.
#[derive(Clone)]
pub struct InMemoryRepository<A> {
    items: Items<A>,
}

impl<A> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<A: AggregateRoot> InMemoryRepository<A> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of committed items.
    pub fn len(&self) -> usize {
        read(&self.items).len()
    }

    /// Returns true when nothing is committed.
    pub fn is_empty(&self) -> bool {
        read(&self.items).is_empty()
    }

    /// Returns a copy of every committed item.
    pub fn items(&self) -> Vec<A> {
        read(&self.items).clone()
    }

    fn key(id: A::Id) -> (&'static str, Uuid) {
        (A::aggregate_type(), id.into())
    }

    fn contains(&self, id: A::Id) -> bool {
        read(&self.items).iter().any(|e| e.id() == id)
    }
}

#[async_trait]
impl<A: AggregateRoot> Repository<A> for InMemoryRepository<A> {
    type Transaction = InMemoryTransaction;

    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), id = %entity.id()))]
    async fn insert(&self, entity: &A, tx: Option<&mut InMemoryTransaction>) -> Result<()> {
        let id = entity.id();
        let stored = entity.without_events();
        match tx {
            Some(tx) => {
                let key = Self::key(id);
                if tx.exists(&key, self.contains(id)) {
                    return Err(already_exists::<A>(id));
                }
                tx.record_insert(key);
                let items = Arc::clone(&self.items);
                tx.stage(move || push_new(&items, stored));
            }
            None => {
                let mut items = write(&self.items);
                if items.iter().any(|e| e.id() == id) {
                    return Err(already_exists::<A>(id));
                }
                items.push(stored);
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), count = entities.len()))]
    async fn bulk_insert(&self, entities: &[A], tx: Option<&mut InMemoryTransaction>) -> Result<()> {
        let mut seen = Vec::with_capacity(entities.len());
        for entity in entities {
            if seen.contains(&entity.id()) {
                return Err(already_exists::<A>(entity.id()));
            }
            seen.push(entity.id());
        }

        match tx {
            Some(tx) => {
                for entity in entities {
                    if tx.exists(&Self::key(entity.id()), self.contains(entity.id())) {
                        return Err(already_exists::<A>(entity.id()));
                    }
                }
                for entity in entities {
                    tx.record_insert(Self::key(entity.id()));
                    let items = Arc::clone(&self.items);
                    let stored = entity.without_events();
                    tx.stage(move || push_new(&items, stored));
                }
            }
            None => {
                let mut items = write(&self.items);
                if let Some(existing) = entities
                    .iter()
                    .find(|entity| items.iter().any(|e| e.id() == entity.id()))
                {
                    return Err(already_exists::<A>(existing.id()));
                }
                items.extend(entities.iter().map(A::without_events));
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, id: A::Id) -> Result<Option<A>> {
        Ok(read(&self.items).iter().find(|e| e.id() == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[A::Id]) -> Result<Vec<A>> {
        Ok(read(&self.items)
            .iter()
            .filter(|e| ids.contains(&e.id()))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<A>> {
        Ok(self.items())
    }

    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), count = ids.len()))]
    async fn exists_by_id(&self, ids: &[A::Id]) -> Result<ExistsByIdResult<A::Id>> {
        ensure_ids_not_empty(ids)?;
        let items = read(&self.items);
        let (exists, not_exists) = ids
            .iter()
            .copied()
            .partition(|id| items.iter().any(|e| e.id() == *id));
        Ok(ExistsByIdResult { exists, not_exists })
    }

    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), id = %entity.id()))]
    async fn update(&self, entity: &A, tx: Option<&mut InMemoryTransaction>) -> Result<()> {
        let id = entity.id();
        let stored = entity.without_events();
        match tx {
            Some(tx) => {
                if !tx.exists(&Self::key(id), self.contains(id)) {
                    return Err(DomainError::not_found(A::aggregate_type(), [id]));
                }
                let items = Arc::clone(&self.items);
                tx.stage(move || replace_existing(&items, stored));
            }
            None => {
                let mut items = write(&self.items);
                let slot = items
                    .iter_mut()
                    .find(|e| e.id() == id)
                    .ok_or_else(|| DomainError::not_found(A::aggregate_type(), [id]))?;
                *slot = stored;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, tx), fields(entity = A::aggregate_type()))]
    async fn delete(&self, id: A::Id, tx: Option<&mut InMemoryTransaction>) -> Result<()> {
        match tx {
            Some(tx) => {
                let key = Self::key(id);
                if !tx.exists(&key, self.contains(id)) {
                    return Err(DomainError::not_found(A::aggregate_type(), [id]));
                }
                tx.record_delete(key);
                let items = Arc::clone(&self.items);
                tx.stage(move || remove_existing(&items, id));
            }
            None => {
                let mut items = write(&self.items);
                let before = items.len();
                items.retain(|e| e.id() != id);
                if items.len() == before {
                    return Err(DomainError::not_found(A::aggregate_type(), [id]));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<A: SearchableEntity> SearchableRepository<A> for InMemoryRepository<A> {
    #[tracing::instrument(skip_all, fields(entity = A::aggregate_type(), page = params.current_page()))]
    async fn search(&self, params: SearchParams<A::Filter>) -> Result<SearchResult<A>> {
        let started = Instant::now();

        let mut matched: Vec<A> = {
            let items = read(&self.items);
            match params.filter_value() {
                Some(filter) => items.iter().filter(|e| e.matches(filter)).cloned().collect(),
                None => items.clone(),
            }
        };
        let total = matched.len() as u64;

        // Stable sorts keep insertion order among equal keys.
        match params.resolved_sort::<A::SortField>() {
            Some((field, direction)) => {
                matched.sort_by(|a, b| direction.apply(a.compare_by(b, field)))
            }
            None => matched.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        }

        let offset = usize::try_from(params.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(params.limit()).unwrap_or(usize::MAX);
        let items: Vec<A> = matched.into_iter().skip(offset).take(limit).collect();

        metrics::histogram!(
            "repository_search_duration_seconds",
            "backend" => "memory",
            "entity" => A::aggregate_type()
        )
        .record(started.elapsed().as_secs_f64());

        Ok(SearchResult::new(
            items,
            total,
            params.current_page(),
            params.page_size(),
        ))
    }
}
