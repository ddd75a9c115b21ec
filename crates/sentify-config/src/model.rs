//! Configuration schema for Sentify.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root config for Sentify.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SentifyConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl SentifyConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> SentifyConfigBuilder {
        SentifyConfigBuilder::new()
    }
}

/// Builder for assembling a `SentifyConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct SentifyConfigBuilder {
    config: SentifyConfig,
}

impl SentifyConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: SentifyConfig::default(),
        }
    }

    /// Replace the store configuration.
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Replace the classifier configuration.
    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.config.classifier = classifier;
        self
    }

    /// Replace the ingestion configuration.
    pub fn ingestion(mut self, ingestion: IngestionConfig) -> Self {
        self.config.ingestion = ingestion;
        self
    }

    /// Replace the analytics configuration.
    pub fn analytics(mut self, analytics: AnalyticsConfig) -> Self {
        self.config.analytics = analytics;
        self
    }

    /// Replace the server configuration.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Finalize and return the built `SentifyConfig`.
    pub fn build(self) -> SentifyConfig {
        self.config
    }
}

/// Record store backend selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    #[default]
    Sqlite,
    Memory,
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub provider: StoreProvider,
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: StoreProvider::default(),
            path: default_store_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Default database location, relative to the working directory.
fn default_store_path() -> String {
    ".sentify/sentify.db".to_string()
}

/// Default time a writer waits on a locked database.
fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Classifier tuning.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassifierConfig {
    /// Additional word polarities merged over the built-in lexicon.
    #[serde(default)]
    pub extra_words: BTreeMap<String, f64>,
}

/// Submission validation rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Reject submissions with a blank serial id.
    #[serde(default)]
    pub require_serial_id: bool,
    #[serde(default = "default_max_serial_chars")]
    pub max_serial_chars: usize,
    #[serde(default)]
    pub max_comment_chars: Option<usize>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            require_serial_id: false,
            max_serial_chars: default_max_serial_chars(),
            max_comment_chars: None,
        }
    }
}

/// Default serial id length limit in characters.
fn default_max_serial_chars() -> usize {
    100
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Fixed offset from UTC used for day bucketing.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Number of frequent terms reported in summaries.
    #[serde(default = "default_top_terms")]
    pub top_terms: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            top_terms: default_top_terms(),
        }
    }
}

fn default_top_terms() -> usize {
    20
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_address")]
    pub address: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_server_address(),
            port: default_server_port(),
        }
    }
}

fn default_server_address() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}
