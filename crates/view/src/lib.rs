//! Display collaborators for the record query engine.
//!
//! This crate provides the display side of the system:
//! - [`View`] trait for receiving result sets and errors
//! - [`TableView`] read model shaped like a table data source
//! - [`TracingView`] logging view
//! - [`Controller`] wiring engine and mutations to registered views

pub mod controller;
pub mod table;
pub mod view;

pub use controller::Controller;
pub use table::TableView;
pub use view::{TracingView, View};
