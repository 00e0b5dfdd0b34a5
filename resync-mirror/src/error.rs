use std::path::PathBuf;

use thiserror::Error;

/// A single failed version-control command.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The client process could not be started (e.g. not installed).
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The client ran and exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Error surface for mirror cache management.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Every configured client failed to clone. Each attempt keeps its own
    /// diagnostic, primary first.
    #[error("could not clone upstream into {}: {}", cache_dir.display(), describe_attempts(attempts))]
    CloneFailed {
        cache_dir: PathBuf,
        attempts: Vec<(String, TransportError)>,
    },

    /// Fetch or hard reset of an existing cache failed.
    #[error("could not refresh upstream cache at {}: {source}", cache_dir.display())]
    RefreshFailed {
        cache_dir: PathBuf,
        #[source]
        source: TransportError,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> MirrorError {
    MirrorError::Io {
        path: path.into(),
        source,
    }
}

fn describe_attempts(attempts: &[(String, TransportError)]) -> String {
    if attempts.is_empty() {
        return "no clients configured".to_string();
    }
    attempts
        .iter()
        .map(|(client, err)| format!("[{client}] {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}
