//! Error types for resync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading configuration or compiling rules.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A transform rule pattern is not a valid regular expression.
    #[error("invalid pattern for rule #{index} ({pattern:?}): {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The tracked extension was configured as an empty string.
    #[error("tracked file extension must not be empty")]
    EmptyExtension,
}
