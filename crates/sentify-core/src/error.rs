//! Error types for the ingestion and reporting crate.

use sentify_classifier::ClassificationError;
use sentify_config::ConfigError;
use sentify_protocol::RowFailureKind;
use sentify_store::StoreError;
use thiserror::Error;

/// Errors returned by Sentify operations.
#[derive(Debug, Error)]
pub enum SentifyError {
    /// Caller-supplied input failed a precondition.
    #[error("validation error: {0}")]
    Validation(String),
    /// The record store could not be reached or rejected the operation.
    #[error(transparent)]
    StoreUnavailable(StoreError),
    /// The classifier failed to score the input.
    #[error("classification error: {0}")]
    Classification(#[from] ClassificationError),
    /// Configuration was rejected.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<StoreError> for SentifyError {
    fn from(err: StoreError) -> Self {
        if err.is_unavailable() {
            Self::StoreUnavailable(err)
        } else {
            Self::Validation(err.to_string())
        }
    }
}

impl SentifyError {
    /// Stable category name used by remote surfaces.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Classification(_) => "classification",
            Self::Config(_) => "config",
        }
    }

    /// Batch failure category for this error.
    pub fn row_failure_kind(&self) -> RowFailureKind {
        match self {
            Self::Validation(_) => RowFailureKind::Validation,
            Self::Classification(_) => RowFailureKind::Classification,
            Self::StoreUnavailable(_) => RowFailureKind::StoreUnavailable,
            Self::Config(_) => RowFailureKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SentifyError;
    use pretty_assertions::assert_eq;
    use sentify_config::ConfigError;
    use sentify_protocol::RowFailureKind;
    use sentify_store::StoreError;

    #[test]
    fn config_errors_keep_their_own_row_kind() {
        let err = SentifyError::from(ConfigError::Invalid("port must be set".to_string()));
        assert_eq!(err.kind(), "config");
        assert_eq!(err.row_failure_kind(), RowFailureKind::Config);
        assert_eq!(
            serde_json::to_value(err.row_failure_kind()).expect("json"),
            serde_json::json!("config")
        );
    }

    #[test]
    fn store_errors_split_by_availability() {
        let down = SentifyError::from(StoreError::Unavailable("locked".to_string()));
        assert_eq!(down.row_failure_kind(), RowFailureKind::StoreUnavailable);
        let empty = SentifyError::from(StoreError::EmptyPattern);
        assert_eq!(empty.row_failure_kind(), RowFailureKind::Validation);
    }
}
