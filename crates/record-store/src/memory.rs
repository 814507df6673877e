use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::RecordId;
use tokio::sync::RwLock;

use crate::{
    FetchRequest, Person, Result, StoreError,
    store::RecordStore,
};

/// In-memory record store.
///
/// Holds two layers: a working state that fetches and mutations see, and a
/// committed state that `commit` copies the working state into. `rollback`
/// restores the working state from the committed layer. Insertion order of
/// the working state is the iteration order that stable sorting preserves
/// for records with equal names.
///
/// Failure injection for exercising error paths: `set_offline` makes every
/// operation fail with `StoreUnavailable`; `fail_next_commit` makes exactly
/// the next `commit` fail with `CommitFailed`.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    working: Arc<RwLock<Vec<Person>>>,
    committed: Arc<RwLock<Vec<Person>>>,
    offline: Arc<AtomicBool>,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryRecordStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records in the working state.
    pub async fn record_count(&self) -> usize {
        self.working.read().await.len()
    }

    /// Takes the store offline (or back online).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes the next `commit` call fail with `CommitFailed`.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("store is offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch(&self, request: FetchRequest) -> Result<Vec<Person>> {
        self.ensure_online()?;

        let rows = self.working.read().await;
        let mut matched: Vec<Person> = rows
            .iter()
            .filter(|p| request.matches(p))
            .cloned()
            .collect();
        drop(rows);

        // Stable sort: records with equal names keep insertion order,
        // ascending and descending both.
        if request.ascending {
            matched.sort_by(|a, b| a.name.cmp(&b.name));
        } else {
            matched.sort_by(|a, b| b.name.cmp(&a.name));
        }

        let matched: Vec<Person> = matched.into_iter().skip(request.offset).collect();
        let matched: Vec<Person> = if let Some(limit) = request.limit {
            matched.into_iter().take(limit).collect()
        } else {
            matched
        };

        metrics::counter!("record_store_rows_fetched").increment(matched.len() as u64);
        Ok(matched)
    }

    async fn get(&self, id: RecordId) -> Result<Option<Person>> {
        self.ensure_online()?;
        let rows = self.working.read().await;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, record: Person) -> Result<()> {
        self.ensure_online()?;
        self.working.write().await.push(record);
        Ok(())
    }

    async fn update(&self, record: Person) -> Result<()> {
        self.ensure_online()?;
        let mut rows = self.working.write().await;
        match rows.iter_mut().find(|p| p.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(StoreError::RecordNotFound(record.id)),
        }
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        self.ensure_online()?;
        let mut rows = self.working.write().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(StoreError::RecordNotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.ensure_online()?;
        self.working.write().await.clear();
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        self.ensure_online()?;
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            metrics::counter!("record_store_commit_failures").increment(1);
            return Err(StoreError::commit_failed("commit rejected by store"));
        }
        let working = self.working.read().await;
        *self.committed.write().await = working.clone();
        metrics::counter!("record_store_commits").increment(1);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.ensure_online()?;
        let committed = self.committed.read().await;
        *self.working.write().await = committed.clone();
        tracing::debug!(rows = committed.len(), "working state rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStoreExt;

    fn names(rows: &[Person]) -> Vec<Option<&str>> {
        rows.iter().map(|p| p.name()).collect()
    }

    async fn seeded_store() -> InMemoryRecordStore {
        let store = InMemoryRecordStore::new();
        for person in [
            Person::new("Alice", 30),
            Person::new("bob", 25),
            Person::new("Carol", 40),
        ] {
            store.insert(person).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn insert_then_fetch_returns_each_record_once() {
        let store = seeded_store().await;
        let rows = store.fetch(FetchRequest::new()).await.unwrap();
        assert_eq!(rows.len(), 3);

        let mut ids: Vec<_> = rows.iter().map(|p| p.id).collect();
        ids.sort_by_key(|id| id.as_uuid());
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn fetch_sorts_by_name_ascending_by_default() {
        let store = seeded_store().await;
        let rows = store.fetch(FetchRequest::new()).await.unwrap();
        assert_eq!(names(&rows), vec![Some("Alice"), Some("Carol"), Some("bob")]);
    }

    #[tokio::test]
    async fn fetch_descending_reverses_order() {
        let store = seeded_store().await;
        let rows = store.fetch(FetchRequest::new().ascending(false)).await.unwrap();
        assert_eq!(names(&rows), vec![Some("bob"), Some("Carol"), Some("Alice")]);
    }

    #[tokio::test]
    async fn equal_names_keep_insertion_order() {
        let store = InMemoryRecordStore::new();
        let first = Person::new("Alice", 30);
        let second = Person::new("Alice", 31);
        store.insert(first.clone()).await.unwrap();
        store.insert(second.clone()).await.unwrap();

        let ascending = store.fetch(FetchRequest::new()).await.unwrap();
        assert_eq!(ascending[0].id, first.id);
        assert_eq!(ascending[1].id, second.id);

        // Descending reverses the comparator, not the rows, so ties
        // keep insertion order here too.
        let descending = store.fetch(FetchRequest::new().ascending(false)).await.unwrap();
        assert_eq!(descending[0].id, first.id);
        assert_eq!(descending[1].id, second.id);
    }

    #[tokio::test]
    async fn unnamed_records_sort_first_ascending() {
        let store = InMemoryRecordStore::new();
        store.insert(Person::new("Alice", 30)).await.unwrap();
        store.insert(Person::unnamed(7)).await.unwrap();

        let rows = store.fetch(FetchRequest::new()).await.unwrap();
        assert_eq!(names(&rows), vec![None, Some("Alice")]);
    }

    #[tokio::test]
    async fn filter_and_sort_apply_before_offset_and_limit() {
        let store = InMemoryRecordStore::new();
        for (name, age) in [("e", 50), ("d", 40), ("c", 30), ("b", 20), ("a", 10)] {
            store.insert(Person::new(name, age)).await.unwrap();
        }

        let rows = store
            .fetch(FetchRequest::new().min_age(20).offset(1).limit(2))
            .await
            .unwrap();
        assert_eq!(names(&rows), vec![Some("c"), Some("d")]);
    }

    #[tokio::test]
    async fn offset_past_end_returns_empty() {
        let store = seeded_store().await;
        let rows = store.fetch(FetchRequest::new().offset(10)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn name_filter_folds_case_and_diacritics() {
        let store = seeded_store().await;
        store.insert(Person::new("José", 41)).await.unwrap();

        let rows = store
            .fetch(FetchRequest::new().name_contains("al"))
            .await
            .unwrap();
        assert_eq!(names(&rows), vec![Some("Alice")]);

        let rows = store
            .fetch(FetchRequest::new().name_contains("jose"))
            .await
            .unwrap();
        assert_eq!(names(&rows), vec![Some("José")]);
    }

    #[tokio::test]
    async fn get_finds_by_id() {
        let store = InMemoryRecordStore::new();
        let person = Person::new("Alice", 30);
        store.insert(person.clone()).await.unwrap();

        assert_eq!(store.get(person.id).await.unwrap(), Some(person));
        assert_eq!(store.get(RecordId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_overwrites_matched_record() {
        let store = InMemoryRecordStore::new();
        let person = Person::new("bob", 25);
        store.insert(person.clone()).await.unwrap();

        store.update(person.overwritten("Bobby", 26)).await.unwrap();

        let updated = store.get(person.id).await.unwrap().unwrap();
        assert_eq!(updated.name(), Some("Bobby"));
        assert_eq!(updated.age, 26);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = InMemoryRecordStore::new();
        let result = store.update(Person::new("ghost", 1)).await;
        assert!(matches!(result, Err(StoreError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = seeded_store().await;
        let rows = store.fetch(FetchRequest::new()).await.unwrap();
        store.delete(rows[0].id).await.unwrap();
        assert_eq!(store.record_count().await, 2);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let store = InMemoryRecordStore::new();
        let result = store.delete(RecordId::new()).await;
        assert!(matches!(result, Err(StoreError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn delete_all_twice_is_idempotent() {
        let store = seeded_store().await;
        store.delete_all().await.unwrap();
        assert!(store.is_empty().await.unwrap());
        store.delete_all().await.unwrap();
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn rollback_restores_last_committed_state() {
        let store = InMemoryRecordStore::new();
        store.insert(Person::new("Alice", 30)).await.unwrap();
        store.commit().await.unwrap();

        store.insert(Person::new("bob", 25)).await.unwrap();
        store.rollback().await.unwrap();

        let rows = store.fetch(FetchRequest::new()).await.unwrap();
        assert_eq!(names(&rows), vec![Some("Alice")]);
    }

    #[tokio::test]
    async fn failed_commit_leaves_working_state_for_rollback() {
        let store = InMemoryRecordStore::new();
        store.insert(Person::new("Alice", 30)).await.unwrap();
        store.commit().await.unwrap();

        store.insert(Person::new("bob", 25)).await.unwrap();
        store.fail_next_commit();
        let result = store.commit().await;
        assert!(matches!(result, Err(StoreError::CommitFailed { .. })));

        // The injected failure is spent; rollback then commit recovers.
        store.rollback().await.unwrap();
        store.commit().await.unwrap();
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn offline_store_fails_every_operation() {
        let store = seeded_store().await;
        store.set_offline(true);

        assert!(matches!(
            store.fetch(FetchRequest::new()).await,
            Err(StoreError::StoreUnavailable { .. })
        ));
        assert!(matches!(
            store.insert(Person::new("x", 1)).await,
            Err(StoreError::StoreUnavailable { .. })
        ));
        assert!(matches!(
            store.commit().await,
            Err(StoreError::StoreUnavailable { .. })
        ));

        store.set_offline(false);
        assert_eq!(store.fetch(FetchRequest::new()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn ext_count_and_exists() {
        let store = seeded_store().await;
        assert_eq!(store.count().await.unwrap(), 3);

        let rows = store.fetch(FetchRequest::new()).await.unwrap();
        assert!(store.exists(rows[0].id).await.unwrap());
        assert!(!store.exists(RecordId::new()).await.unwrap());
    }
}
