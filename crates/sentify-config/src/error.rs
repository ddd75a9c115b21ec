//! Error types for config loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A config layer is not valid JSON5.
    #[error("{origin}: not valid JSON5: {source}")]
    Syntax {
        /// Layer label, e.g. `user(/home/a/.sentify/sentify.json5)`.
        origin: String,
        #[source]
        source: json5::Error,
    },
    /// A key in a layer has the wrong shape or is not recognised.
    #[error("{origin}: {field}: {message}")]
    Schema {
        origin: String,
        /// Dotted key path, `root` for the top-level object.
        field: String,
        message: String,
    },
    /// The merged layers did not decode into `SentifyConfig`.
    #[error("config does not decode: {0}")]
    Decode(#[from] serde_json::Error),
    /// A value is well-formed but out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
