use async_trait::async_trait;
use common::RecordId;

use crate::{FetchRequest, Person, Result};

/// Core trait for record store implementations.
///
/// A record store is the sole source of truth for person records. All
/// implementations must be thread-safe (Send + Sync). Mutations are staged
/// against a working state and become durable on [`commit`]; [`rollback`]
/// discards staged changes and restores the last committed state.
///
/// [`commit`]: RecordStore::commit
/// [`rollback`]: RecordStore::rollback
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches records matching the request.
    ///
    /// Filtering and stable name sorting are applied before
    /// `offset`/`limit`. An empty result is `Ok`, not an error.
    async fn fetch(&self, request: FetchRequest) -> Result<Vec<Person>>;

    /// Looks up a single record by identity.
    async fn get(&self, id: RecordId) -> Result<Option<Person>>;

    /// Stages a new record.
    async fn insert(&self, record: Person) -> Result<()>;

    /// Stages a full overwrite of an existing record, matched by id.
    ///
    /// Fails with `RecordNotFound` if the id is unknown.
    async fn update(&self, record: Person) -> Result<()>;

    /// Stages removal of a record.
    ///
    /// Fails with `RecordNotFound` if the id is unknown.
    async fn delete(&self, id: RecordId) -> Result<()>;

    /// Stages removal of every record. Idempotent.
    async fn delete_all(&self) -> Result<()>;

    /// Makes staged changes durable.
    ///
    /// Fails with `CommitFailed` when the write cannot be persisted; the
    /// staged state is left untouched so the caller can roll it back.
    async fn commit(&self) -> Result<()>;

    /// Discards staged changes, restoring the last committed state.
    async fn rollback(&self) -> Result<()>;
}

/// Extension trait providing convenience methods for record stores.
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    /// Returns the number of records currently visible to fetches.
    async fn count(&self) -> Result<usize> {
        Ok(self.fetch(FetchRequest::new()).await?.len())
    }

    /// Returns true if no records are visible.
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.count().await? == 0)
    }

    /// Returns true if a record with the given id exists.
    async fn exists(&self, id: RecordId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

// Blanket implementation for all RecordStore implementations
impl<T: RecordStore + ?Sized> RecordStoreExt for T {}
