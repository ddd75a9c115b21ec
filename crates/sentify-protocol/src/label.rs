//! Sentiment label shared by every Sentify crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment label assigned to a classified comment.
///
/// Serialized and persisted as `"Positive"`, `"Neutral"` or `"Negative"`.
/// The declaration order is the canonical reporting order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// All labels in reporting order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// Persisted text form of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sentiment label: {0}")]
pub struct ParseLabelError(pub String);

impl FromStr for SentimentLabel {
    type Err = ParseLabelError;

    /// Parse a label, ignoring case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        SentimentLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLabelError(value.to_string()))
    }
}
