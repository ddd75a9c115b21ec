//! Error types for classifiers.

/// Errors returned by sentiment classifiers.
///
/// The lexicon classifier fails only if its tokenizer cannot be built; the
/// other variants exist for classifiers backed by remote models.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    /// The backing model could not be reached.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    /// The model produced output that cannot be mapped to a label.
    #[error("invalid classifier output: {0}")]
    InvalidOutput(String),
    /// The word tokenizer could not be compiled.
    #[error("tokenizer unavailable: {0}")]
    Tokenizer(#[from] regex::Error),
}
