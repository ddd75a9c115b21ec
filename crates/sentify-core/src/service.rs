//! Sentify facade: one handle over ingestion, listings, and summaries.

use crate::aggregate::{AggregateOptions, Summary, aggregate};
use crate::error::SentifyError;
use crate::ingest::{IngestionCoordinator, IngestionPolicy};
use crate::report::{Listing, RecordQuery, Reporter, SummaryReport};
use log::{debug, info};
use sentify_classifier::{Classification, Lexicon, LexiconClassifier, SentimentClassifier};
use sentify_config::{ClassifierConfig, SentifyConfig, StoreConfig, StoreProvider};
use sentify_protocol::{BatchReport, BatchRow, ConsultationRecord};
use sentify_store::{MemoryRecordStore, RecordStore, SqliteRecordStore};
use std::sync::Arc;
use std::time::Duration;

/// Entry point for embedding applications, the CLI, and the HTTP server.
#[derive(Clone)]
pub struct Sentify {
    config: Arc<SentifyConfig>,
    classifier: Arc<dyn SentimentClassifier>,
    store: Arc<dyn RecordStore>,
    ingestion: IngestionCoordinator,
    reporter: Reporter,
}

impl Sentify {
    /// Construct from config, optionally overriding the classifier or store.
    ///
    /// Without an override the store is built from `config.store` and its
    /// schema is initialized.
    pub fn new(
        config: SentifyConfig,
        classifier: Option<Arc<dyn SentimentClassifier>>,
        store: Option<Arc<dyn RecordStore>>,
    ) -> Result<Self, SentifyError> {
        info!("initializing sentify");
        config.validate()?;
        debug!(
            "sentify config (provider={:?}, extra_words={}, require_serial_id={})",
            config.store.provider,
            config.classifier.extra_words.len(),
            config.ingestion.require_serial_id
        );
        let classifier = match classifier {
            Some(classifier) => classifier,
            None => Arc::new(build_default_classifier(&config.classifier)),
        };
        let store = match store {
            Some(store) => store,
            None => build_default_store(&config.store)?,
        };
        let ingestion = IngestionCoordinator::new(classifier.clone(), store.clone())
            .with_policy(IngestionPolicy::from(&config.ingestion));
        let reporter = Reporter::new(store.clone())
            .with_options(AggregateOptions::from_config(&config.analytics));

        info!("sentify initialized");
        Ok(Self {
            config: Arc::new(config),
            classifier,
            store,
            ingestion,
            reporter,
        })
    }

    /// Construct from config using the default classifier and store.
    pub fn from_config(config: SentifyConfig) -> Result<Self, SentifyError> {
        Self::new(config, None, None)
    }

    pub fn config(&self) -> &SentifyConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Create the store schema if needed. Existing records are kept.
    pub fn init(&self) -> Result<(), SentifyError> {
        self.store.init()?;
        Ok(())
    }

    /// Classify text without storing it.
    pub fn classify(&self, text: &str) -> Result<Classification, SentifyError> {
        Ok(self.classifier.classify(text)?)
    }

    pub fn submit_one(
        &self,
        serial_id: &str,
        comment_text: &str,
    ) -> Result<ConsultationRecord, SentifyError> {
        self.ingestion.submit_one(serial_id, comment_text)
    }

    pub fn submit_batch<I>(&self, rows: I) -> BatchReport
    where
        I: IntoIterator<Item = BatchRow>,
    {
        self.ingestion.submit_batch(rows)
    }

    pub fn list_all(&self) -> Listing {
        self.reporter.list_all()
    }

    pub fn find_by_serial(&self, pattern: &str) -> Listing {
        self.reporter.find_by_serial(pattern)
    }

    pub fn query(&self, query: &RecordQuery) -> Listing {
        self.reporter.query(query)
    }

    /// Aggregate an already-fetched record set with the configured options.
    pub fn aggregate(&self, records: &[ConsultationRecord]) -> Summary {
        aggregate(records, self.reporter.options())
    }

    pub fn summary(&self, query: &RecordQuery) -> SummaryReport {
        self.reporter.summary(query)
    }
}

/// Lexicon classifier with configured extra words merged in.
pub fn build_default_classifier(config: &ClassifierConfig) -> LexiconClassifier {
    if config.extra_words.is_empty() {
        return LexiconClassifier::new();
    }
    let lexicon = Lexicon::new().with_words(
        config
            .extra_words
            .iter()
            .map(|(word, polarity)| (word.as_str(), *polarity)),
    );
    LexiconClassifier::with_lexicon(lexicon)
}

/// Build the configured record store.
pub fn build_default_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>, SentifyError> {
    info!("initializing record store (provider={:?})", config.provider);
    match config.provider {
        StoreProvider::Memory => Ok(Arc::new(MemoryRecordStore::new())),
        StoreProvider::Sqlite => {
            let store = SqliteRecordStore::open(&config.path)?
                .with_busy_timeout(Duration::from_millis(config.busy_timeout_ms));
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sentify_config::StoreProvider;
    use sentify_protocol::SentimentLabel;
    use std::collections::BTreeMap;

    fn memory_config() -> SentifyConfig {
        let mut config = SentifyConfig::default();
        config.store.provider = StoreProvider::Memory;
        config
    }

    #[test]
    fn extra_words_reach_the_classifier() {
        let mut config = memory_config();
        config.classifier.extra_words = BTreeMap::from([("stellar".to_string(), 0.9)]);
        let sentify = Sentify::from_config(config).expect("sentify");
        let classification = sentify.classify("stellar").expect("classify");
        assert_eq!(classification.label, SentimentLabel::Positive);
        assert_eq!(classification.confidence, 0.9);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = memory_config();
        config.ingestion.max_serial_chars = 0;
        assert!(matches!(
            Sentify::from_config(config),
            Err(SentifyError::Config(_))
        ));
    }

    #[test]
    fn sqlite_store_is_created_on_demand() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut config = SentifyConfig::default();
        config.store.path = temp
            .path()
            .join("nested/sentify.db")
            .to_string_lossy()
            .to_string();
        let sentify = Sentify::from_config(config).expect("sentify");
        sentify.submit_one("S1", "good").expect("stored");
        assert_eq!(sentify.list_all().records.len(), 1);
        assert!(temp.path().join("nested/sentify.db").exists());
    }

    #[test]
    fn aggregate_uses_configured_options() {
        let mut config = memory_config();
        config.analytics.top_terms = 1;
        let sentify = Sentify::from_config(config).expect("sentify");
        sentify.submit_one("S1", "great coffee, great staff").expect("stored");
        let listing = sentify.list_all();
        let summary = sentify.aggregate(&listing.records);
        assert_eq!(summary.top_terms.len(), 1);
        assert_eq!(summary.top_terms[0].term, "great");
    }
}
