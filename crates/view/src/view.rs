//! Display collaborator trait.

use async_trait::async_trait;
use engine::ErrorKind;
use record_store::Person;

/// A display collaborator receiving result sets and errors from the core.
///
/// Replaces the delegate/data-source callbacks of a UI toolkit with an
/// explicit seam: implementations render, record, or log, independently of
/// the engine.
#[async_trait]
pub trait View: Send + Sync {
    /// Returns the name of this view.
    fn name(&self) -> &'static str;

    /// Called after every successful query or mutation-triggered refresh
    /// with the full, ordered result set.
    async fn on_results_changed(&self, results: &[Person]);

    /// Called with every propagated failure. Failures are never retried
    /// and never fatal; the next operation may succeed.
    async fn on_error(&self, kind: ErrorKind, message: &str);
}

/// A view that logs result-set sizes and errors via `tracing`.
pub struct TracingView;

#[async_trait]
impl View for TracingView {
    fn name(&self) -> &'static str {
        "TracingView"
    }

    async fn on_results_changed(&self, results: &[Person]) {
        tracing::info!(rows = results.len(), "results changed");
    }

    async fn on_error(&self, kind: ErrorKind, message: &str) {
        tracing::error!(%kind, error = message, "operation failed");
    }
}
