//! Core ingestion and reporting for Sentify.
//!
//! This crate wires the classifier and record store together: submissions
//! are validated, classified, and stored; reads come back as listings that
//! degrade to empty on store failure; summaries are computed from scratch
//! over whatever a listing returned.

pub mod aggregate;
pub mod error;
pub mod ingest;
pub mod report;
pub mod service;

/// Summary statistics.
pub use aggregate::{
    AggregateOptions, LabelCounts, LatestReading, Summary, TermCount, TrendPoint, aggregate,
    average_confidence, top_terms, trend,
};
pub use error::SentifyError;
/// Submission pipeline.
pub use ingest::{IngestionCoordinator, IngestionPolicy};
/// Read side.
pub use report::{Listing, RecordQuery, Reporter, SummaryReport, filter_by_label};
/// Facade and default component builders.
pub use service::{Sentify, build_default_classifier, build_default_store};
