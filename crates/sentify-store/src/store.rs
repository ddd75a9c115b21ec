//! Record store abstraction.

use crate::error::StoreError;
use sentify_protocol::{ConsultationRecord, NewRecord};

/// Persistent store for consultation records.
///
/// Implementations own record identity: ids and timestamps are assigned on
/// insert, and records are never updated or deleted afterwards.
pub trait RecordStore: Send + Sync {
    /// Create the backing schema if needed. Safe to call repeatedly.
    fn init(&self) -> Result<(), StoreError>;

    /// Persist a classified record, returning the stored value.
    ///
    /// Either the full record becomes visible to readers or nothing does.
    fn insert(&self, record: NewRecord) -> Result<ConsultationRecord, StoreError>;

    /// All records, most recent first.
    fn list_all(&self) -> Result<Vec<ConsultationRecord>, StoreError>;

    /// Records whose serial id contains `pattern`, ignoring case, most recent
    /// first. An empty pattern is rejected with [`StoreError::EmptyPattern`].
    fn find_by_serial(&self, pattern: &str) -> Result<Vec<ConsultationRecord>, StoreError>;
}

/// Sort records into listing order: newest first, later ids first on ties.
pub(crate) fn sort_newest_first(records: &mut [ConsultationRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
