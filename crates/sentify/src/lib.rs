//! Public SDK surface for Sentify.
//!
//! This crate re-exports the core building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

pub mod batch;

/// Re-export for convenience.
pub use sentify_classifier as classifier;
pub use sentify_config as config;
pub use sentify_core as core;
/// Re-export for convenience.
pub use sentify_protocol as protocol;
pub use sentify_server as server;
/// Re-export for convenience.
pub use sentify_store as store;

pub use batch::{BatchParseError, parse_batch_rows};
pub use sentify_core::{RecordQuery, Sentify, SentifyError};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
