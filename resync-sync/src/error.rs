//! Error types for resync-sync.

use std::path::PathBuf;

use thiserror::Error;

use resync_core::ConfigError;
use resync_mirror::MirrorError;

/// All errors that can arise from scan, apply, and pipeline operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the mirror manager (clone / refresh / purge).
    #[error(transparent)]
    Mirror(#[from] MirrorError),

    /// Invalid configuration (e.g. a rule that does not compile).
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A requested position does not exist in the scan snapshot.
    #[error("index {index} is out of range: the scan found {len} change(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The fresh scan no longer matches the snapshot the operator reviewed.
    #[error("upstream or local tree changed since snapshot {expected} (now {actual}); re-run the report")]
    SnapshotMismatch { expected: String, actual: String },

    /// Writing one record failed; records before `position` stay applied.
    #[error("applying [{position}] {} failed after {applied} change(s) were applied: {source}", relative_path.display())]
    ApplyFailed {
        position: usize,
        relative_path: PathBuf,
        applied: usize,
        #[source]
        source: Box<SyncError>,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
