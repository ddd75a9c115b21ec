use parking_lot::Mutex;
use sentify_protocol::{ConsultationRecord, NewRecord};
use sentify_store::{MemoryRecordStore, RecordStore, StoreError};
use std::collections::BTreeSet;

/// A store whose every operation reports the backend as unreachable.
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn new() -> Self {
        Self
    }

    fn error() -> StoreError {
        StoreError::Unavailable("connection refused".to_string())
    }
}

impl RecordStore for FailingStore {
    fn init(&self) -> Result<(), StoreError> {
        Err(Self::error())
    }

    fn insert(&self, _record: NewRecord) -> Result<ConsultationRecord, StoreError> {
        Err(Self::error())
    }

    fn list_all(&self) -> Result<Vec<ConsultationRecord>, StoreError> {
        Err(Self::error())
    }

    fn find_by_serial(&self, _pattern: &str) -> Result<Vec<ConsultationRecord>, StoreError> {
        Err(Self::error())
    }
}

/// In-memory store that fails selected insert calls (zero-based call index).
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryRecordStore,
    failing_calls: BTreeSet<usize>,
    calls: Mutex<usize>,
}

impl FlakyStore {
    pub fn failing_on(calls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            inner: MemoryRecordStore::new(),
            failing_calls: calls.into_iter().collect(),
            calls: Mutex::new(0),
        }
    }

    /// Number of insert calls made so far, failed or not.
    pub fn insert_calls(&self) -> usize {
        *self.calls.lock()
    }

    /// Records that were actually stored.
    pub fn stored(&self) -> usize {
        self.inner.len()
    }
}

impl RecordStore for FlakyStore {
    fn init(&self) -> Result<(), StoreError> {
        self.inner.init()
    }

    fn insert(&self, record: NewRecord) -> Result<ConsultationRecord, StoreError> {
        let call = {
            let mut calls = self.calls.lock();
            let call = *calls;
            *calls += 1;
            call
        };
        if self.failing_calls.contains(&call) {
            return Err(StoreError::Unavailable(format!(
                "insert call {call} rejected"
            )));
        }
        self.inner.insert(record)
    }

    fn list_all(&self) -> Result<Vec<ConsultationRecord>, StoreError> {
        self.inner.list_all()
    }

    fn find_by_serial(&self, pattern: &str) -> Result<Vec<ConsultationRecord>, StoreError> {
        self.inner.find_by_serial(pattern)
    }
}
