//! Configuration file loading.
//!
//! Config files are YAML:
//!
//! ```yaml
//! analysis:
//!   node_crossings: true
//!   path_intersections: true
//!   shared_endpoints: true
//!   segment_overlaps: false
//!   node_overlaps: true
//! fail_on_warnings: true
//! inventory: false
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tangle::AnalysisConfig;

/// Looked up in the working directory when no `--config` is given.
pub const LOCAL_CONFIG: &str = "tangle.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse YAML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings for a `check` run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which detection passes run
    pub analysis: AnalysisConfig,

    /// Treat a warnings-only report as a failure
    pub fail_on_warnings: bool,

    /// Print node and path inventories in text reports
    pub inventory: bool,
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// Find and load configuration.
///
/// Search order:
/// 1. Explicit path if provided (must exist)
/// 2. `tangle.yaml` in the working directory
/// 3. Defaults
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit_path {
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local = Path::new(LOCAL_CONFIG);
    if local.exists() {
        info!(path = local.display().to_string(); "Loading configuration from local path");
        return load_config_file(local);
    }

    debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}

fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Config::from_yaml(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
