//! Read paths: listings, filters, and summaries that degrade instead of failing.

use crate::aggregate::{AggregateOptions, Summary, aggregate};
use crate::error::SentifyError;
use log::warn;
use sentify_protocol::{ConsultationRecord, SentimentLabel};
use sentify_store::RecordStore;
use std::sync::Arc;

/// Records returned by a read, plus the error that emptied them, if any.
///
/// An unreachable store yields no records and `error: Some(..)`, so callers
/// can tell "nothing stored" apart from "could not read".
#[derive(Debug, Default)]
pub struct Listing {
    pub records: Vec<ConsultationRecord>,
    pub error: Option<SentifyError>,
}

impl Listing {
    pub fn ok(records: Vec<ConsultationRecord>) -> Self {
        Self {
            records,
            error: None,
        }
    }

    pub fn degraded(error: SentifyError) -> Self {
        Self {
            records: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Strict view: the error if the read failed, otherwise the records.
    pub fn into_result(self) -> Result<Vec<ConsultationRecord>, SentifyError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

/// Summary over a listing, carrying the listing's error through.
#[derive(Debug)]
pub struct SummaryReport {
    pub summary: Summary,
    pub error: Option<SentifyError>,
}

/// Selection applied to a listing or summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Case-insensitive serial substring; blank means every record.
    pub serial: Option<String>,
    pub label: Option<SentimentLabel>,
}

impl RecordQuery {
    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn label(mut self, label: SentimentLabel) -> Self {
        self.label = Some(label);
        self
    }
}

/// Records carrying `label`, order preserved.
pub fn filter_by_label(
    records: &[ConsultationRecord],
    label: SentimentLabel,
) -> Vec<ConsultationRecord> {
    records
        .iter()
        .filter(|record| record.label == label)
        .cloned()
        .collect()
}

/// Read side over a record store.
#[derive(Clone)]
pub struct Reporter {
    store: Arc<dyn RecordStore>,
    options: AggregateOptions,
}

impl Reporter {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            options: AggregateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AggregateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// Every record, newest first.
    pub fn list_all(&self) -> Listing {
        match self.store.list_all() {
            Ok(records) => Listing::ok(records),
            Err(err) => {
                warn!("listing degraded to empty: {err}");
                Listing::degraded(err.into())
            }
        }
    }

    /// Records whose serial id contains `pattern`, ignoring case.
    pub fn find_by_serial(&self, pattern: &str) -> Listing {
        match self.store.find_by_serial(pattern) {
            Ok(records) => Listing::ok(records),
            Err(err) => {
                warn!("serial lookup degraded to empty (pattern={pattern}): {err}");
                Listing::degraded(err.into())
            }
        }
    }

    /// Listing narrowed by serial substring and label.
    pub fn query(&self, query: &RecordQuery) -> Listing {
        let serial = query
            .serial
            .as_deref()
            .map(str::trim)
            .filter(|serial| !serial.is_empty());
        let mut listing = match serial {
            Some(pattern) => self.find_by_serial(pattern),
            None => self.list_all(),
        };
        if let Some(label) = query.label {
            listing.records = filter_by_label(&listing.records, label);
        }
        listing
    }

    /// Aggregate the records selected by `query`.
    pub fn summary(&self, query: &RecordQuery) -> SummaryReport {
        let Listing { records, error } = self.query(query);
        SummaryReport {
            summary: aggregate(&records, &self.options),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use sentify_protocol::NewRecord;
    use sentify_store::{MemoryRecordStore, StoreError};

    fn seeded() -> Reporter {
        let store = Arc::new(MemoryRecordStore::new());
        for (serial_id, label) in [
            ("AB-1", SentimentLabel::Positive),
            ("ab-2", SentimentLabel::Negative),
            ("CD-3", SentimentLabel::Positive),
        ] {
            store
                .insert(NewRecord {
                    serial_id: serial_id.to_string(),
                    comment_text: "text".to_string(),
                    label,
                    confidence: 0.5,
                })
                .expect("insert");
        }
        Reporter::new(store)
    }

    fn record(id: i64, label: SentimentLabel) -> ConsultationRecord {
        ConsultationRecord {
            id,
            serial_id: String::new(),
            comment_text: String::new(),
            label,
            confidence: 0.5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filter_keeps_order_and_matching_labels() {
        let records = vec![
            record(3, SentimentLabel::Positive),
            record(2, SentimentLabel::Neutral),
            record(1, SentimentLabel::Positive),
        ];
        let ids: Vec<i64> = filter_by_label(&records, SentimentLabel::Positive)
            .iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(filter_by_label(&records, SentimentLabel::Negative).is_empty());
    }

    #[test]
    fn query_combines_serial_and_label() {
        let reporter = seeded();
        let listing = reporter.query(
            &RecordQuery::default()
                .serial("ab")
                .label(SentimentLabel::Positive),
        );
        assert!(!listing.is_degraded());
        assert_eq!(listing.records.len(), 1);
        assert_eq!(listing.records[0].serial_id, "AB-1");
    }

    #[test]
    fn blank_serial_lists_everything() {
        let reporter = seeded();
        let listing = reporter.query(&RecordQuery::default().serial("  "));
        assert_eq!(listing.records.len(), 3);
    }

    #[test]
    fn empty_pattern_is_reported_as_validation() {
        let reporter = seeded();
        let listing = reporter.find_by_serial("");
        assert!(listing.records.is_empty());
        assert!(matches!(listing.error, Some(SentifyError::Validation(_))));
    }

    #[test]
    fn summary_respects_query() {
        let reporter = seeded();
        let report = reporter.summary(&RecordQuery::default().label(SentimentLabel::Positive));
        assert!(report.error.is_none());
        assert_eq!(report.summary.counts.total, 2);
        assert_eq!(report.summary.counts.negative, 0);
    }

    #[test]
    fn into_result_surfaces_the_error() {
        let listing = Listing::degraded(StoreError::Unavailable("down".to_string()).into());
        assert!(matches!(
            listing.into_result(),
            Err(SentifyError::StoreUnavailable(_))
        ));
        assert_eq!(Listing::ok(Vec::new()).into_result().expect("ok"), Vec::new());
    }
}
