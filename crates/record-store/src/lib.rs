pub mod error;
pub mod memory;
pub mod record;
pub mod request;
pub mod store;

pub use common::RecordId;
pub use error::{Result, StoreError};
pub use memory::InMemoryRecordStore;
pub use record::Person;
pub use request::{FetchRequest, fold};
pub use store::{RecordStore, RecordStoreExt};
