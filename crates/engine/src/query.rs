use std::future::Future;
use std::sync::Arc;

use record_store::{FetchRequest, Person, RecordStore, StoreError};
use tokio::sync::RwLock;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::options::QueryOptions;

/// Executes filter/sort/pagination queries against a record store.
///
/// The engine never caches result rows: every query returns an owned
/// snapshot to the caller. It remembers only the most recent
/// [`QueryOptions`] so that a mutation can re-run them via [`refresh`].
///
/// [`refresh`]: QueryEngine::refresh
pub struct QueryEngine<S: RecordStore> {
    store: S,
    config: EngineConfig,
    last_options: Arc<RwLock<QueryOptions>>,
}

impl<S: RecordStore + Clone> Clone for QueryEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            last_options: Arc::clone(&self.last_options),
        }
    }
}

impl<S: RecordStore> QueryEngine<S> {
    /// Creates an engine over the given store with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            last_options: Arc::new(RwLock::new(QueryOptions::default())),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs a query and returns the matching records in order.
    ///
    /// Filtering and sorting happen before limit/offset; multiple filters
    /// combine with logical AND; no match is an empty result, not an
    /// error. The options become the remembered options for [`refresh`].
    ///
    /// [`refresh`]: QueryEngine::refresh
    #[tracing::instrument(skip(self))]
    pub async fn query(&self, options: QueryOptions) -> Result<Vec<Person>> {
        let rows = self.timed_fetch(options.to_request()).await?;
        *self.last_options.write().await = options;
        metrics::counter!("engine_queries").increment(1);
        tracing::debug!(rows = rows.len(), "query complete");
        Ok(rows)
    }

    /// Re-runs the last remembered query with `offset = 0`.
    ///
    /// This is the mutation-triggered refresh: the result reflects the
    /// store after the mutation, under the filters and sort the caller
    /// last asked for.
    pub async fn refresh(&self) -> Result<Vec<Person>> {
        let options = self.last_options.read().await.clone().offset(0);
        self.timed_fetch(options.to_request()).await
    }

    async fn timed_fetch(&self, request: FetchRequest) -> Result<Vec<Person>> {
        self.timed(self.store.fetch(request)).await
    }

    /// Bounds a persistence call by the configured timeout; expiry
    /// surfaces as `StoreUnavailable`.
    pub(crate) async fn timed<T>(
        &self,
        op: impl Future<Output = record_store::Result<T>> + Send,
    ) -> Result<T> {
        match tokio::time::timeout(self.config.store_timeout, op).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(EngineError::Store(StoreError::unavailable(
                "store call timed out",
            ))),
        }
    }
}
