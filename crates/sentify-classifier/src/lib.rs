//! Deterministic sentiment classification for feedback comments.
//!
//! The default classifier scores text against a built-in polarity lexicon
//! and maps the score onto a [`SentimentLabel`] with fixed thresholds.

pub mod classifier;
pub mod error;
pub mod lexicon;

/// Classifier trait, lexicon implementation, and score mapping.
pub use classifier::{
    Classification, LexiconClassifier, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD,
    SentimentClassifier, classify,
};
/// Classification error type.
pub use error::ClassificationError;
/// Polarity lexicon.
pub use lexicon::Lexicon;
/// Re-export for convenience.
pub use sentify_protocol::SentimentLabel;
