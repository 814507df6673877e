//! Controller wiring the engine and mutation service to registered views.

use common::RecordId;
use engine::{
    EngineConfig, EngineError, MutationResult, MutationService, PageCursor, QueryEngine,
    QueryOptions,
};
use record_store::{Person, RecordStore};
use tokio::sync::Mutex;

use crate::view::View;

/// Drives the query/mutation flow and fans results and errors out to views.
///
/// One logical caller issues one operation at a time; every successful
/// operation delivers the fresh result set to each registered view, and
/// every failure delivers its kind and message. Errors are also returned
/// to the caller, and the controller stays usable after any of them.
pub struct Controller<S: RecordStore> {
    engine: QueryEngine<S>,
    mutations: MutationService<S>,
    views: Vec<Box<dyn View>>,
    cursor: Mutex<Option<PageCursor<S>>>,
}

impl<S: RecordStore + Clone> Controller<S> {
    /// Creates a controller over the given store with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Creates a controller with an explicit engine configuration.
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        let engine = QueryEngine::with_config(store, config);
        let mutations = MutationService::new(engine.clone());
        Self {
            engine,
            mutations,
            views: Vec::new(),
            cursor: Mutex::new(None),
        }
    }

    /// Starts a paging session with the configured default page size and
    /// loads the first page.
    pub async fn begin_paging(&self, options: QueryOptions) -> Result<Vec<Person>, EngineError> {
        let page_size = self.engine.config().page_size;
        self.begin_paging_with(options, page_size).await
    }

    /// Starts a paging session with an explicit page size and loads the
    /// first page. Panics if `page_size` is zero.
    #[tracing::instrument(skip(self))]
    pub async fn begin_paging_with(
        &self,
        options: QueryOptions,
        page_size: usize,
    ) -> Result<Vec<Person>, EngineError> {
        let mut cursor = PageCursor::new(self.engine.clone(), options, page_size);
        match cursor.load_next_page().await {
            Ok(_) => {
                let rows = cursor.records().to_vec();
                *self.cursor.lock().await = Some(cursor);
                self.notify_results(&rows).await;
                Ok(rows)
            }
            Err(err) => {
                self.notify_error(&err).await;
                Err(err)
            }
        }
    }
}

impl<S: RecordStore> Controller<S> {
    /// Registers a view to receive result and error notifications.
    pub fn register(&mut self, view: Box<dyn View>) {
        self.views.push(view);
    }

    /// Returns the number of registered views.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Returns the engine this controller queries through.
    pub fn engine(&self) -> &QueryEngine<S> {
        &self.engine
    }

    /// Runs a query and delivers the result set to every view.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, options: QueryOptions) -> Result<Vec<Person>, EngineError> {
        match self.engine.query(options).await {
            Ok(rows) => {
                self.notify_results(&rows).await;
                Ok(rows)
            }
            Err(err) => {
                self.notify_error(&err).await;
                Err(err)
            }
        }
    }

    /// Creates a person from raw text input and delivers the refreshed
    /// result set.
    #[tracing::instrument(skip(self))]
    pub async fn add_person(&self, name: &str, age: &str) -> Result<MutationResult, EngineError> {
        self.deliver(self.mutations.create(name, age).await).await
    }

    /// Overwrites an existing person and delivers the refreshed result set.
    #[tracing::instrument(skip(self))]
    pub async fn update_person(
        &self,
        id: RecordId,
        new_name: &str,
        new_age: &str,
    ) -> Result<MutationResult, EngineError> {
        self.deliver(self.mutations.update(id, new_name, new_age).await)
            .await
    }

    /// Removes a person and delivers the refreshed result set.
    #[tracing::instrument(skip(self))]
    pub async fn remove_person(&self, id: RecordId) -> Result<MutationResult, EngineError> {
        self.deliver(self.mutations.delete(id).await).await
    }

    /// Removes every person and delivers the (empty) result set.
    #[tracing::instrument(skip(self))]
    pub async fn remove_all(&self) -> Result<MutationResult, EngineError> {
        self.deliver(self.mutations.delete_all().await).await
    }

    /// Loads the next page of the active paging session and delivers the
    /// accumulated rows. Without an active session this is a no-op
    /// returning no rows.
    #[tracing::instrument(skip(self))]
    pub async fn load_next_page(&self) -> Result<Vec<Person>, EngineError> {
        let mut slot = self.cursor.lock().await;
        let Some(cursor) = slot.as_mut() else {
            return Ok(Vec::new());
        };
        match cursor.load_next_page().await {
            Ok(_) => {
                let rows = cursor.records().to_vec();
                drop(slot);
                self.notify_results(&rows).await;
                Ok(rows)
            }
            Err(err) => {
                drop(slot);
                self.notify_error(&err).await;
                Err(err)
            }
        }
    }

    /// Returns true while the active paging session has more pages.
    pub async fn has_more(&self) -> bool {
        self.cursor
            .lock()
            .await
            .as_ref()
            .map(|cursor| cursor.has_more())
            .unwrap_or(false)
    }

    async fn deliver(
        &self,
        outcome: Result<MutationResult, EngineError>,
    ) -> Result<MutationResult, EngineError> {
        match outcome {
            Ok(result) => {
                self.notify_results(&result.results).await;
                Ok(result)
            }
            Err(err) => {
                self.notify_error(&err).await;
                Err(err)
            }
        }
    }

    async fn notify_results(&self, rows: &[Person]) {
        for view in &self.views {
            view.on_results_changed(rows).await;
        }
        metrics::counter!("view_notifications").increment(1);
    }

    async fn notify_error(&self, err: &EngineError) {
        let kind = err.kind();
        let message = err.to_string();
        tracing::warn!(%kind, error = %message, "delivering error to views");
        for view in &self.views {
            view.on_error(kind, &message).await;
        }
    }
}
