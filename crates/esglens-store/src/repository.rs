//! Generic staging repository with unit-of-work commit semantics.

use std::sync::Arc;

use esglens_core::{Filter, Queryable};

use crate::StoreError;

/// A mutation staged on a repository, not yet visible to readers.
#[derive(Debug, Clone, PartialEq)]
pub enum StagedOp<T> {
    Add(T),
    Update(T),
    Delete(T),
}

/// Storage collaborator for one entity type.
///
/// Reads return entities in the backend's natural order, which both
/// provided backends define as ascending identity; callers that need a
/// specific order must sort. `commit` applies a batch atomically: either
/// every staged operation takes effect or the store is left in its
/// pre-commit state.
pub trait EntityStore<T: Queryable>: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<T>, StoreError>;

    fn fetch_by_id(&self, id: i64) -> Result<Option<T>, StoreError>;

    fn fetch_where(&self, filter: &Filter<T::Field>) -> Result<Vec<T>, StoreError>;

    fn count_where(&self, filter: Option<&Filter<T::Field>>) -> Result<u64, StoreError>;

    /// Apply a batch of staged operations in one atomic transaction and
    /// return the number of affected entities.
    fn commit(&self, batch: Vec<StagedOp<T>>) -> Result<u64, StoreError>;
}

/// A unit of work over an [`EntityStore`].
///
/// `add`/`update`/`delete` only stage; nothing is durable or visible to
/// other readers until [`Repository::save_changes`] commits the batch.
/// Identity is assigned by the store during commit, so a staged `Add`
/// carries `id: None` and the caller re-reads to observe the assigned id.
pub struct Repository<T: Queryable> {
    store: Arc<dyn EntityStore<T>>,
    staged: Vec<StagedOp<T>>,
}

impl<T: Queryable> Repository<T> {
    pub fn new(store: Arc<dyn EntityStore<T>>) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }

    /// All entities in natural order.
    pub fn get_all(&self) -> Result<Vec<T>, StoreError> {
        self.store.fetch_all()
    }

    /// Entity by id; a missing id is `Ok(None)`, never an error.
    pub fn get_by_id(&self, id: i64) -> Result<Option<T>, StoreError> {
        self.store.fetch_by_id(id)
    }

    /// All entities matching the filter, in natural order.
    pub fn find(&self, filter: &Filter<T::Field>) -> Result<Vec<T>, StoreError> {
        self.store.fetch_where(filter)
    }

    /// First match in natural order, or `None`.
    pub fn first_or_default(&self, filter: &Filter<T::Field>) -> Result<Option<T>, StoreError> {
        Ok(self.store.fetch_where(filter)?.into_iter().next())
    }

    /// Stage a new entity. Identity is assigned at commit.
    pub fn add(&mut self, entity: T) {
        self.staged.push(StagedOp::Add(entity));
    }

    /// Stage several new entities.
    pub fn add_range(&mut self, entities: impl IntoIterator<Item = T>) {
        self.staged.extend(entities.into_iter().map(StagedOp::Add));
    }

    /// Stage an update of a committed entity.
    pub fn update(&mut self, entity: T) {
        self.staged.push(StagedOp::Update(entity));
    }

    /// Stage removal of a committed entity. Its id is never reused.
    pub fn delete(&mut self, entity: T) {
        self.staged.push(StagedOp::Delete(entity));
    }

    /// Stage removal of several committed entities.
    pub fn delete_range(&mut self, entities: impl IntoIterator<Item = T>) {
        self.staged
            .extend(entities.into_iter().map(StagedOp::Delete));
    }

    /// Commit every staged operation as one atomic batch and return the
    /// number of affected entities.
    ///
    /// The batch is consumed by the attempt either way; on failure the
    /// store is unchanged and the error reports why.
    pub fn save_changes(&mut self) -> Result<u64, StoreError> {
        if self.staged.is_empty() {
            return Ok(0);
        }

        let batch = std::mem::take(&mut self.staged);
        let staged = batch.len();
        let affected = self.store.commit(batch)?;
        tracing::debug!(staged, affected, "unit of work committed");
        Ok(affected)
    }

    /// Whether any entity matches the filter.
    pub fn exists(&self, filter: &Filter<T::Field>) -> Result<bool, StoreError> {
        Ok(self.store.count_where(Some(filter))? > 0)
    }

    /// Count matching entities; `None` counts everything.
    pub fn count(&self, filter: Option<&Filter<T::Field>>) -> Result<u64, StoreError> {
        self.store.count_where(filter)
    }

    /// Number of operations staged and not yet committed.
    pub fn pending_ops(&self) -> usize {
        self.staged.len()
    }
}
