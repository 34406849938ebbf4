//! Configuration error types

use std::path::PathBuf;

/// Errors from loading or validating a [`GridConfig`](crate::config::GridConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config is not valid JSON for the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config parsed but its values are inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}
