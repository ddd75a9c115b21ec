//! Durable storage for classified consultation records.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;

/// Store error type.
pub use error::StoreError;
/// In-process store.
pub use memory::MemoryRecordStore;
/// SQLite-backed store.
pub use sqlite::{DEFAULT_BUSY_TIMEOUT, SqliteRecordStore};
/// Record store interface.
pub use store::RecordStore;
