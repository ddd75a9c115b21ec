//! Error types for record store operations.

use sentify_protocol::RecordId;

/// Errors returned by record stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error while preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A persisted row could not be decoded.
    #[error("corrupt record {id}: {message}")]
    Corrupt { id: RecordId, message: String },
    /// The backing store refused service.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Serial lookups require a non-empty pattern.
    #[error("serial pattern must not be empty")]
    EmptyPattern,
}

impl StoreError {
    /// Whether the error reflects an unreachable or failing persistence layer
    /// rather than a caller mistake.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, Self::EmptyPattern)
    }
}
