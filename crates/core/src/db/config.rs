use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DEFAULT_ENTRY_POINT;
use crate::services::EngineOptions;

/// Output file used when neither the config nor the command line names one.
pub const DEFAULT_OUTPUT_FILE: &str = "sliced_data.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML config {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse JSON config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config format for {} (expected .yaml, .yml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Settings for a slicing run, loaded from `varslice.yaml` / `.json`.
///
/// Every field is optional in the file; command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerConfig {
    /// Explicit path to `llvm-src-slicer`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_path: Option<PathBuf>,
    /// Entry point for ad-hoc criteria.
    pub default_entry: String,
    /// Ask the engine to verify sliced modules.
    pub verify: bool,
    /// Where the JSON batch output is written.
    pub output: PathBuf,
    /// Optional results database to record runs in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<PathBuf>,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            engine_path: None,
            default_entry: DEFAULT_ENTRY_POINT.to_string(),
            verify: false,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            db: None,
        }
    }
}

impl SlicerConfig {
    /// Load a config file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        match ext {
            "yaml" | "yml" => serde_yaml::from_str(&body)
                .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source }),
            "json" => serde_json::from_str(&body)
                .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source }),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Load `path` if given, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions { verify: self.verify }
    }
}
