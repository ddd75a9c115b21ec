//! Sentify settings: the JSON5 schema, range checks, and the layered file
//! search shared by the CLI, the HTTP server, and embedders.

mod error;
mod loader;
mod model;

pub use error::ConfigError;
pub use loader::{AppliedLayer, ConfigSearch, LayerOrigin, LayeredConfig};
pub use model::*;
