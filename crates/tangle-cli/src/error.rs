//! Errors surfaced by the CLI.

use thiserror::Error;

use tangle::ExtractError;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to serialize JSON output: {0}")]
    Json(#[from] serde_json::Error),
}
