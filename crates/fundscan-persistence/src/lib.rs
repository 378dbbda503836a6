//! Snapshot persistence.
//!
//! The store holds exactly one document, `{coins, last_updated, next_update}`.
//! Every write replaces the whole document; there are no partial updates.

pub mod config;
pub mod document;
pub mod error;
pub mod store;

pub use config::{PersistenceConfig, StoreBackend};
pub use document::SnapshotDocument;
pub use error::{PersistenceError, PersistenceResult};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
