//! Shared data model and wire types for Sentify.

mod label;

pub use label::{ParseLabelError, SentimentLabel};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned record identifier; monotonically increasing.
pub type RecordId = i64;

/// A classified, persisted feedback comment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationRecord {
    /// Identifier assigned by the store on insert.
    pub id: RecordId,
    /// Free-form grouping key; may be empty and is not unique.
    pub serial_id: String,
    /// Original comment text.
    pub comment_text: String,
    /// Derived sentiment label.
    pub label: SentimentLabel,
    /// Magnitude of the polarity score, rounded to 2 decimals.
    pub confidence: f64,
    /// Insertion timestamp assigned by the store.
    pub created_at: DateTime<Utc>,
}

/// A classified comment awaiting persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub serial_id: String,
    pub comment_text: String,
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// One row of a batch submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BatchRow {
    /// Grouping key for the row; empty when the producer had none.
    #[serde(default, alias = "serial_no")]
    pub serial_id: String,
    /// Comment text to classify.
    #[serde(alias = "comment_text")]
    pub comment: String,
}

impl BatchRow {
    /// Build a row from a serial id and comment.
    pub fn new(serial_id: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            serial_id: serial_id.into(),
            comment: comment.into(),
        }
    }
}

/// Category of a per-row batch failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RowFailureKind {
    /// The row failed input validation.
    Validation,
    /// The classifier could not score the row.
    Classification,
    /// The store rejected or could not persist the row.
    StoreUnavailable,
    /// Configuration was rejected before the row could be processed.
    Config,
}

/// A row that could not be stored during a batch submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowFailure {
    /// Zero-based index of the row in the submitted batch.
    pub index: usize,
    /// Serial id carried by the failing row.
    pub serial_id: String,
    /// Failure category.
    pub kind: RowFailureKind,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Outcome of a batch submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BatchReport {
    /// Number of rows stored successfully.
    pub success_count: usize,
    /// Failures in row order.
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    /// Total rows processed (stored plus failed).
    pub fn processed(&self) -> usize {
        self.success_count + self.failures.len()
    }
}

/// Request body for a single submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitRequest {
    #[serde(default)]
    pub serial_id: String,
    pub comment: String,
}

/// Error payload returned by remote surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Stable error category (`validation`, `store_unavailable`, `classification`).
    pub kind: String,
    pub message: String,
}
