//! Table read model: the row list a list screen renders from.

use std::sync::Arc;

use async_trait::async_trait;
use engine::ErrorKind;
use record_store::Person;
use tokio::sync::RwLock;

use crate::view::View;

/// Read model holding the rows of a table plus the last reported error.
///
/// The rows are a snapshot of the store as of the last notification; they
/// are not guaranteed to still exist. The last error sticks until
/// [`clear_error`] or the next failure, mirroring a dismissable alert.
///
/// [`clear_error`]: TableView::clear_error
#[derive(Clone, Default)]
pub struct TableView {
    rows: Arc<RwLock<Vec<Person>>>,
    last_error: Arc<RwLock<Option<(ErrorKind, String)>>>,
}

impl TableView {
    /// Creates a new empty table view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of rows currently held.
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns the row at the given index, if any.
    pub async fn row(&self, index: usize) -> Option<Person> {
        self.rows.read().await.get(index).cloned()
    }

    /// Returns a copy of all rows in display order.
    pub async fn rows(&self) -> Vec<Person> {
        self.rows.read().await.clone()
    }

    /// Returns the last reported error, if any.
    pub async fn last_error(&self) -> Option<(ErrorKind, String)> {
        self.last_error.read().await.clone()
    }

    /// Clears the last reported error.
    pub async fn clear_error(&self) {
        *self.last_error.write().await = None;
    }
}

#[async_trait]
impl View for TableView {
    fn name(&self) -> &'static str {
        "TableView"
    }

    async fn on_results_changed(&self, results: &[Person]) {
        *self.rows.write().await = results.to_vec();
    }

    async fn on_error(&self, kind: ErrorKind, message: &str) {
        *self.last_error.write().await = Some((kind, message.to_string()));
    }
}
