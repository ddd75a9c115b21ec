//! Config loading for single files and the layered search.
//!
//! Layers are read lowest precedence first: system, user, project root,
//! working directory, then explicit override files. Each layer is
//! schema-checked on its own so errors name the file that introduced them,
//! then objects merge key by key into one value that serde decodes.

mod discovery;
mod merge;
mod schema;


use crate::{ConfigError, SentifyConfig, StoreProvider};
use discovery::Candidate;
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name looked up in each local layer.
const CONFIG_FILE_NAME: &str = "sentify.json5";
/// Directory under the home directory holding the user layer.
const USER_CONFIG_DIR: &str = ".sentify";
/// Largest accepted day-bucketing offset (14 hours).
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Where a config layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerOrigin {
    System,
    User,
    /// `sentify.json5` in the nearest ancestor holding a project marker.
    Project,
    WorkingDir,
    /// File named explicitly by the caller; applied last.
    Override,
}

impl LayerOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Project => "project",
            Self::WorkingDir => "cwd",
            Self::Override => "override",
        }
    }

    fn is_required(self) -> bool {
        self == Self::Override
    }
}

/// A config file that contributed to the effective config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedLayer {
    pub origin: LayerOrigin,
    pub path: PathBuf,
}

/// Effective config plus the files it was merged from, lowest precedence first.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub config: SentifyConfig,
    pub layers: Vec<AppliedLayer>,
}

/// Locations searched by [`SentifyConfig::load_layered_with`].
#[derive(Debug, Clone)]
pub struct ConfigSearch {
    /// Directory whose `sentify.json5` and project root are consulted.
    pub cwd: PathBuf,
    pub system_file: Option<PathBuf>,
    pub user_file: Option<PathBuf>,
    /// Entries that mark a project root, e.g. `.git`.
    pub project_markers: Vec<String>,
    /// Files applied after every discovered layer. Each must exist.
    pub overrides: Vec<PathBuf>,
}

impl ConfigSearch {
    /// Default system and user locations plus the layers around `cwd`.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_file: discovery::system_config_file(),
            user_file: discovery::user_config_file(),
            project_markers: vec![".git".to_string()],
            overrides: Vec::new(),
        }
    }

    /// Skip the system and user layers.
    pub fn local_only(mut self) -> Self {
        self.system_file = None;
        self.user_file = None;
        self
    }

    pub fn with_override(mut self, path: impl AsRef<Path>) -> Self {
        self.overrides.push(path.as_ref().to_path_buf());
        self
    }
}

impl SentifyConfig {
    /// Load one config file without layering.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config (path={})", path.display());
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::read(path, err))?;
        let value = parse_layer(&contents, &format!("file({})", path.display()))?;
        decode(value)
    }

    /// Load config from JSON5 text without layering.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading inline config (len={})", contents.len());
        decode(parse_layer(contents, "inline")?)
    }

    /// Load the layered config around `cwd` from the default locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with(ConfigSearch::new(cwd))
    }

    /// Load the layered config from explicit locations.
    ///
    /// Missing discovered layers are skipped; a missing override is an error.
    /// The same file reached through two origins is applied once.
    pub fn load_layered_with(search: ConfigSearch) -> Result<LayeredConfig, ConfigError> {
        info!("loading layered config (cwd={})", search.cwd.display());
        let mut merged = Value::Object(Map::new());
        let mut layers = Vec::new();

        for Candidate { origin, path } in discovery::candidates(&search)? {
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(err) if err.kind() == ErrorKind::NotFound && !origin.is_required() => {
                    debug!(
                        "config layer absent (origin={}, path={})",
                        origin.as_str(),
                        path.display()
                    );
                    continue;
                }
                Err(err) => return Err(ConfigError::read(path, err)),
            };
            let label = format!("{}({})", origin.as_str(), path.display());
            merge::overlay(&mut merged, parse_layer(&contents, &label)?);
            debug!("config layer applied ({label})");
            layers.push(AppliedLayer { origin, path });
        }

        let config = decode(merged)?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Check ranges and cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.provider == StoreProvider::Sqlite && self.store.path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.path is required for the sqlite provider".to_string(),
            ));
        }
        if self.ingestion.max_serial_chars == 0 {
            return Err(ConfigError::Invalid(
                "ingestion.max_serial_chars must be greater than zero".to_string(),
            ));
        }
        if self.ingestion.max_comment_chars == Some(0) {
            return Err(ConfigError::Invalid(
                "ingestion.max_comment_chars must be greater than zero".to_string(),
            ));
        }
        if self.analytics.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "analytics.utc_offset_minutes must be within +/-{MAX_UTC_OFFSET_MINUTES}"
            )));
        }
        for (word, polarity) in &self.classifier.extra_words {
            if word.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "classifier.extra_words keys must not be blank".to_string(),
                ));
            }
            if !(-1.0..=1.0).contains(polarity) {
                return Err(ConfigError::Invalid(format!(
                    "classifier.extra_words.{word} must be within [-1, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn parse_layer(contents: &str, origin: &str) -> Result<Value, ConfigError> {
    let value: Value = json5::from_str(contents).map_err(|source| ConfigError::Syntax {
        origin: origin.to_string(),
        source,
    })?;
    schema::validate_layer_schema(&value, origin)?;
    Ok(value)
}

fn decode(value: Value) -> Result<SentifyConfig, ConfigError> {
    let config: SentifyConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
