//! In-process record store for tests and ephemeral runs.

use crate::error::StoreError;
use crate::store::{RecordStore, sort_newest_first};
use chrono::Utc;
use log::debug;
use parking_lot::Mutex;
use sentify_protocol::{ConsultationRecord, NewRecord, RecordId};

/// Record store held entirely in memory; contents vanish on drop.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: RecordId,
    records: Vec<ConsultationRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Whether no records have been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryRecordStore {
    fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn insert(&self, record: NewRecord) -> Result<ConsultationRecord, StoreError> {
        let mut state = self.state.lock();
        let now = Utc::now();
        let created_at = state
            .records
            .last()
            .map_or(now, |last| last.created_at.max(now));
        state.last_id += 1;
        let stored = ConsultationRecord {
            id: state.last_id,
            serial_id: record.serial_id,
            comment_text: record.comment_text,
            label: record.label,
            confidence: record.confidence,
            created_at,
        };
        state.records.push(stored.clone());
        debug!("stored consultation in memory (id={})", stored.id);
        Ok(stored)
    }

    fn list_all(&self) -> Result<Vec<ConsultationRecord>, StoreError> {
        let mut records = self.state.lock().records.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn find_by_serial(&self, pattern: &str) -> Result<Vec<ConsultationRecord>, StoreError> {
        if pattern.is_empty() {
            return Err(StoreError::EmptyPattern);
        }
        let needle = pattern.to_lowercase();
        let mut records: Vec<_> = self
            .state
            .lock()
            .records
            .iter()
            .filter(|record| record.serial_id.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryRecordStore;
    use crate::{RecordStore, StoreError};
    use pretty_assertions::assert_eq;
    use sentify_protocol::{NewRecord, SentimentLabel};

    fn new_record(serial: &str) -> NewRecord {
        NewRecord {
            serial_id: serial.to_string(),
            comment_text: "comment".to_string(),
            label: SentimentLabel::Neutral,
            confidence: 0.0,
        }
    }

    #[test]
    fn assigns_increasing_ids_and_lists_newest_first() {
        let store = MemoryRecordStore::new();
        let a = store.insert(new_record("a")).expect("insert");
        let b = store.insert(new_record("b")).expect("insert");
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(store.list_all().expect("list"), vec![b, a]);
    }

    #[test]
    fn finds_unicode_serials_ignoring_case() {
        let store = MemoryRecordStore::new();
        store.insert(new_record("ÄRZTE-1")).expect("insert");
        store.insert(new_record("other")).expect("insert");
        let found = store.find_by_serial("ärzte").expect("find");
        assert_eq!(found.len(), 1);
        assert!(matches!(
            store.find_by_serial(""),
            Err(StoreError::EmptyPattern)
        ));
    }
}
