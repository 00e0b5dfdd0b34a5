//! Error types for resync-release.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Cargo.toml not found at: {path}")]
    ManifestMissing { path: PathBuf },

    #[error("Version line not found in {path}")]
    VersionLineMissing { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ReleaseError {
    ReleaseError::Io {
        path: path.into(),
        source,
    }
}
