//! Single and batch submission: validate, classify, then store.

use crate::error::SentifyError;
use log::{debug, warn};
use sentify_classifier::SentimentClassifier;
use sentify_config::IngestionConfig;
use sentify_protocol::{BatchReport, BatchRow, ConsultationRecord, NewRecord, RowFailure};
use sentify_store::RecordStore;
use std::sync::Arc;

/// Input rules applied before a comment is classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionPolicy {
    /// Reject blank serial ids instead of storing `""`.
    pub require_serial_id: bool,
    pub max_serial_chars: usize,
    pub max_comment_chars: Option<usize>,
}

impl Default for IngestionPolicy {
    fn default() -> Self {
        Self::from(&IngestionConfig::default())
    }
}

impl From<&IngestionConfig> for IngestionPolicy {
    fn from(config: &IngestionConfig) -> Self {
        Self {
            require_serial_id: config.require_serial_id,
            max_serial_chars: config.max_serial_chars,
            max_comment_chars: config.max_comment_chars,
        }
    }
}

impl IngestionPolicy {
    /// Check a submission, returning the normalized serial id.
    pub fn check(&self, serial_id: &str, comment_text: &str) -> Result<String, SentifyError> {
        if comment_text.trim().is_empty() {
            return Err(SentifyError::Validation(
                "comment text must not be blank".to_string(),
            ));
        }
        if let Some(limit) = self.max_comment_chars {
            let chars = comment_text.chars().count();
            if chars > limit {
                return Err(SentifyError::Validation(format!(
                    "comment text has {chars} characters; the limit is {limit}"
                )));
            }
        }
        let serial_id = serial_id.trim();
        if serial_id.is_empty() && self.require_serial_id {
            return Err(SentifyError::Validation(
                "serial id must not be blank".to_string(),
            ));
        }
        let chars = serial_id.chars().count();
        if chars > self.max_serial_chars {
            return Err(SentifyError::Validation(format!(
                "serial id has {chars} characters; the limit is {}",
                self.max_serial_chars
            )));
        }
        Ok(serial_id.to_string())
    }
}

/// Routes submissions through the classifier into the store.
#[derive(Clone)]
pub struct IngestionCoordinator {
    classifier: Arc<dyn SentimentClassifier>,
    store: Arc<dyn RecordStore>,
    policy: IngestionPolicy,
}

impl IngestionCoordinator {
    pub fn new(classifier: Arc<dyn SentimentClassifier>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            classifier,
            store,
            policy: IngestionPolicy::default(),
        }
    }

    /// Replace the validation policy.
    pub fn with_policy(mut self, policy: IngestionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &IngestionPolicy {
        &self.policy
    }

    /// Classify and persist one comment.
    ///
    /// Nothing is written when validation or classification fails.
    pub fn submit_one(
        &self,
        serial_id: &str,
        comment_text: &str,
    ) -> Result<ConsultationRecord, SentifyError> {
        let serial_id = self.policy.check(serial_id, comment_text)?;
        let classification = self.classifier.classify(comment_text)?;
        let record = self.store.insert(NewRecord {
            serial_id,
            comment_text: comment_text.to_string(),
            label: classification.label,
            confidence: classification.confidence,
        })?;
        debug!(
            "record stored (id={}, serial_id={}, label={}, confidence={:.2})",
            record.id, record.serial_id, record.label, record.confidence
        );
        Ok(record)
    }

    /// Submit rows in order. A failing row is recorded and skipped; it never
    /// stops the rows after it.
    pub fn submit_batch<I>(&self, rows: I) -> BatchReport
    where
        I: IntoIterator<Item = BatchRow>,
    {
        let mut report = BatchReport::default();
        for (index, row) in rows.into_iter().enumerate() {
            match self.submit_one(&row.serial_id, &row.comment) {
                Ok(_) => report.success_count += 1,
                Err(err) => {
                    warn!(
                        "batch row skipped (index={}, serial_id={}, kind={}): {}",
                        index,
                        row.serial_id,
                        err.kind(),
                        err
                    );
                    report.failures.push(RowFailure {
                        index,
                        serial_id: row.serial_id,
                        kind: err.row_failure_kind(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        debug!(
            "batch processed (stored={}, failed={})",
            report.success_count,
            report.failures.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sentify_classifier::LexiconClassifier;
    use sentify_protocol::{RowFailureKind, SentimentLabel};
    use sentify_store::MemoryRecordStore;

    fn coordinator() -> (IngestionCoordinator, Arc<MemoryRecordStore>) {
        let store = Arc::new(MemoryRecordStore::new());
        let coordinator = IngestionCoordinator::new(Arc::new(LexiconClassifier::new()), store.clone());
        (coordinator, store)
    }

    #[test]
    fn blank_comment_is_rejected_without_writing() {
        let (coordinator, store) = coordinator();
        let err = coordinator.submit_one("S1", "   \n").unwrap_err();
        assert!(matches!(err, SentifyError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn serial_id_is_trimmed_and_empty_is_allowed() {
        let (coordinator, _store) = coordinator();
        let record = coordinator.submit_one("  S9 ", "good").expect("stored");
        assert_eq!(record.serial_id, "S9");
        let record = coordinator.submit_one("", "good").expect("stored");
        assert_eq!(record.serial_id, "");
    }

    #[test]
    fn required_serial_id_rejects_blank() {
        let (coordinator, store) = coordinator();
        let coordinator = coordinator.with_policy(IngestionPolicy {
            require_serial_id: true,
            ..IngestionPolicy::default()
        });
        let err = coordinator.submit_one("  ", "good").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(store.is_empty());
    }

    #[test]
    fn length_limits_are_counted_in_characters() {
        let (coordinator, _store) = coordinator();
        let coordinator = coordinator.with_policy(IngestionPolicy {
            require_serial_id: false,
            max_serial_chars: 3,
            max_comment_chars: Some(5),
        });
        assert!(coordinator.submit_one("äöü", "good").is_ok());
        assert!(matches!(
            coordinator.submit_one("S100", "good"),
            Err(SentifyError::Validation(_))
        ));
        assert!(matches!(
            coordinator.submit_one("S1", "good!!"),
            Err(SentifyError::Validation(_))
        ));
    }

    #[test]
    fn stores_label_and_confidence_from_classifier() {
        let (coordinator, _store) = coordinator();
        let record = coordinator
            .submit_one("S1", "Excellent service")
            .expect("stored");
        assert_eq!(record.label, SentimentLabel::Positive);
        assert_eq!(record.confidence, 1.0);
        assert_eq!(record.comment_text, "Excellent service");
    }

    #[test]
    fn batch_skips_failing_rows() {
        let (coordinator, store) = coordinator();
        let report = coordinator.submit_batch(vec![
            BatchRow::new("S1", "good"),
            BatchRow::new("S2", ""),
            BatchRow::new("S3", "bad"),
        ]);
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].serial_id, "S2");
        assert_eq!(report.failures[0].kind, RowFailureKind::Validation);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let (coordinator, store) = coordinator();
        let report = coordinator.submit_batch(Vec::new());
        assert_eq!(report, BatchReport::default());
        assert!(store.is_empty());
    }
}
