//! SQLite-backed record store.
//!
//! A connection is opened per operation and dropped on return, so no handle
//! outlives a call. Writers serialize through `BEGIN IMMEDIATE` transactions
//! and SQLite's busy timeout.

use crate::error::StoreError;
use crate::store::RecordStore;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use log::{debug, info};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use sentify_protocol::{ConsultationRecord, NewRecord, RecordId, SentimentLabel};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default time a writer waits for a competing lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS consultations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    serial_no   TEXT NOT NULL DEFAULT '',
    comment     TEXT NOT NULL,
    sentiment   TEXT NOT NULL CHECK (sentiment IN ('Positive', 'Neutral', 'Negative')),
    confidence  REAL NOT NULL,
    timestamp   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS consultations_timestamp ON consultations (timestamp);
"#;

/// Unicode lowercase; SQLite's built-in `lower()` only folds ASCII.
const FOLD_CASE_FN: &str = "sentify_fold_case";

const SELECT_COLUMNS: &str = "SELECT id, serial_no, comment, sentiment, confidence, timestamp FROM consultations";

/// Record store persisted in a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteRecordStore {
    /// Create a store handle without touching the database.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Create the parent directory, initialize the schema, and return the store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        store.init()?;
        info!("opened sqlite record store (path={})", store.path.display());
        Ok(store)
    }

    /// Override the lock wait timeout.
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.create_scalar_function(
            FOLD_CASE_FN,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value: Option<String> = ctx.get(0)?;
                Ok(value.map(|value| value.to_lowercase()))
            },
        )?;
        Ok(conn)
    }

    fn query(&self, sql: &str, pattern: Option<&str>) -> Result<Vec<ConsultationRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = match pattern {
            Some(pattern) => stmt
                .query_map(params![pattern], RawRecord::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], RawRecord::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        rows.into_iter().map(RawRecord::into_record).collect()
    }
}

impl RecordStore for SqliteRecordStore {
    fn init(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA_SQL)?;
        debug!("sqlite schema ready (path={})", self.path.display());
        Ok(())
    }

    fn insert(&self, record: NewRecord) -> Result<ConsultationRecord, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let latest: Option<String> = tx
            .query_row(
                "SELECT timestamp FROM consultations ORDER BY timestamp DESC, id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let now = Utc::now().trunc_subsecs(6);
        let created_at = match latest {
            Some(latest) => parse_timestamp(0, &latest)?.max(now),
            None => now,
        };

        tx.execute(
            "INSERT INTO consultations (serial_no, comment, sentiment, confidence, timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.serial_id,
                record.comment_text,
                record.label.as_str(),
                record.confidence,
                format_timestamp(created_at),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(
            "stored consultation (id={id}, label={}, comment_len={})",
            record.label,
            record.comment_text.len()
        );
        Ok(ConsultationRecord {
            id,
            serial_id: record.serial_id,
            comment_text: record.comment_text,
            label: record.label,
            confidence: record.confidence,
            created_at,
        })
    }

    fn list_all(&self) -> Result<Vec<ConsultationRecord>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY timestamp DESC, id DESC");
        let records = self.query(&sql, None)?;
        debug!("listed consultations (count={})", records.len());
        Ok(records)
    }

    fn find_by_serial(&self, pattern: &str) -> Result<Vec<ConsultationRecord>, StoreError> {
        if pattern.is_empty() {
            return Err(StoreError::EmptyPattern);
        }
        let sql = format!(
            "{SELECT_COLUMNS} WHERE instr({FOLD_CASE_FN}(serial_no), ?1) > 0 \
             ORDER BY timestamp DESC, id DESC"
        );
        let folded = pattern.to_lowercase();
        let records = self.query(&sql, Some(folded.as_str()))?;
        debug!(
            "found consultations by serial (pattern_len={}, count={})",
            pattern.len(),
            records.len()
        );
        Ok(records)
    }
}

/// Column values as read from SQLite, before domain decoding.
struct RawRecord {
    id: RecordId,
    serial_id: String,
    comment_text: String,
    sentiment: String,
    confidence: f64,
    timestamp: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            serial_id: row.get(1)?,
            comment_text: row.get(2)?,
            sentiment: row.get(3)?,
            confidence: row.get(4)?,
            timestamp: row.get(5)?,
        })
    }

    fn into_record(self) -> Result<ConsultationRecord, StoreError> {
        let label = self
            .sentiment
            .parse::<SentimentLabel>()
            .map_err(|err| StoreError::Corrupt {
                id: self.id,
                message: err.to_string(),
            })?;
        let created_at = parse_timestamp(self.id, &self.timestamp)?;
        Ok(ConsultationRecord {
            id: self.id,
            serial_id: self.serial_id,
            comment_text: self.comment_text,
            label,
            confidence: self.confidence,
            created_at,
        })
    }
}

/// Fixed-width RFC 3339 so lexical order matches chronological order.
fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(id: RecordId, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| StoreError::Corrupt {
            id,
            message: format!("invalid timestamp {value:?}: {err}"),
        })
}

#[cfg(test)]
mod tests {
    use super::{SqliteRecordStore, format_timestamp};
    use crate::{RecordStore, StoreError};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use sentify_protocol::{NewRecord, SentimentLabel};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn new_record(serial: &str, comment: &str, label: SentimentLabel) -> NewRecord {
        NewRecord {
            serial_id: serial.to_string(),
            comment_text: comment.to_string(),
            label,
            confidence: 0.5,
        }
    }

    #[test]
    fn lists_newest_first() {
        let temp = tempdir().expect("tempdir");
        let store = SqliteRecordStore::open(temp.path().join("db.sqlite")).expect("store");
        let first = store
            .insert(new_record("A1", "one", SentimentLabel::Positive))
            .expect("insert");
        let second = store
            .insert(new_record("A2", "two", SentimentLabel::Negative))
            .expect("insert");

        assert!(second.id > first.id);
        assert!(second.created_at >= first.created_at);
        let listed = store.list_all().expect("list");
        assert_eq!(listed, vec![second, first]);
    }

    #[test]
    fn finds_serial_substring_ignoring_case() {
        let temp = tempdir().expect("tempdir");
        let store = SqliteRecordStore::open(temp.path().join("db.sqlite")).expect("store");
        store
            .insert(new_record("WARD-12", "fine", SentimentLabel::Neutral))
            .expect("insert");
        store
            .insert(new_record("ward-7", "fine", SentimentLabel::Neutral))
            .expect("insert");
        store
            .insert(new_record("", "no serial", SentimentLabel::Neutral))
            .expect("insert");

        let found = store.find_by_serial("Ward-").expect("find");
        let serials: Vec<_> = found.iter().map(|r| r.serial_id.as_str()).collect();
        assert_eq!(serials, vec!["ward-7", "WARD-12"]);
    }

    #[test]
    fn finds_unicode_serials_ignoring_case() {
        let temp = tempdir().expect("tempdir");
        let store = SqliteRecordStore::open(temp.path().join("db.sqlite")).expect("store");
        store
            .insert(new_record("ÄRZTE-1", "gut", SentimentLabel::Neutral))
            .expect("insert");
        store
            .insert(new_record("ΣΤΑΘΜΌΣ-2", "fine", SentimentLabel::Neutral))
            .expect("insert");
        store
            .insert(new_record("arzte-3", "fine", SentimentLabel::Neutral))
            .expect("insert");

        let found = store.find_by_serial("ärzte").expect("find");
        let serials: Vec<_> = found.iter().map(|r| r.serial_id.as_str()).collect();
        assert_eq!(serials, vec!["ÄRZTE-1"]);

        assert_eq!(store.find_by_serial("σταθμ").expect("find").len(), 1);
    }

    #[test]
    fn serial_pattern_is_bound_not_interpolated() {
        let temp = tempdir().expect("tempdir");
        let store = SqliteRecordStore::open(temp.path().join("db.sqlite")).expect("store");
        store
            .insert(new_record("S1", "fine", SentimentLabel::Neutral))
            .expect("insert");
        store
            .insert(new_record("50%_off", "fine", SentimentLabel::Neutral))
            .expect("insert");

        assert!(store.find_by_serial("' OR '1'='1").expect("find").is_empty());
        assert!(store.find_by_serial("%").expect("find").len() == 1);
        assert_eq!(store.list_all().expect("list").len(), 2);
    }

    #[test]
    fn rejects_empty_pattern() {
        let temp = tempdir().expect("tempdir");
        let store = SqliteRecordStore::open(temp.path().join("db.sqlite")).expect("store");
        let err = store.find_by_serial("").unwrap_err();
        assert!(matches!(err, StoreError::EmptyPattern));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn init_is_idempotent_and_keeps_records() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("db.sqlite");
        let store = SqliteRecordStore::open(&path).expect("store");
        store
            .insert(new_record("S1", "kept", SentimentLabel::Positive))
            .expect("insert");

        store.init().expect("second init");
        let reopened = SqliteRecordStore::open(&path).expect("reopen");
        let records = reopened.list_all().expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].comment_text, "kept");
    }

    #[test]
    fn unreachable_database_is_unavailable() {
        let temp = tempdir().expect("tempdir");
        let store = SqliteRecordStore::new(temp.path());
        let err = store.list_all().unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn concurrent_inserts_keep_ids_and_order() {
        let temp = tempdir().expect("tempdir");
        let store =
            Arc::new(SqliteRecordStore::open(temp.path().join("db.sqlite")).expect("store"));

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for n in 0..10 {
                        store
                            .insert(new_record(
                                &format!("W{worker}"),
                                &format!("comment {n}"),
                                SentimentLabel::Neutral,
                            ))
                            .expect("insert");
                    }
                });
            }
        });

        let mut records = store.list_all().expect("list");
        assert_eq!(records.len(), 40);
        records.sort_by_key(|record| record.id);
        records.dedup_by_key(|record| record.id);
        assert_eq!(records.len(), 40);
        for pair in records.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
    }

    #[test]
    fn timestamps_have_fixed_width() {
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_timestamp(early), "2024-01-02T03:04:05.000000Z");
    }
}
