//! Upstream mirror cache lifecycle: clone, refresh, purge.

use std::io::ErrorKind;
use std::path::PathBuf;

use resync_core::UpstreamConfig;

use crate::error::{io_err, MirrorError};
use crate::vcs::{GhCli, GitCli, VcsClient};

/// What [`Mirror::ensure_fresh`] had to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorAction {
    /// The cache did not exist and was cloned by the named client.
    Cloned { via: String },
    /// The cache existed and was fetched + hard-reset.
    Refreshed,
}

/// Owner of the mirror cache directory.
///
/// Clients are tried in order for a fresh clone; the first one also
/// performs refreshes.
pub struct Mirror {
    cache_dir: PathBuf,
    primary: Box<dyn VcsClient>,
    fallbacks: Vec<Box<dyn VcsClient>>,
}

impl Mirror {
    pub fn new(cache_dir: impl Into<PathBuf>, primary: Box<dyn VcsClient>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            primary,
            fallbacks: Vec::new(),
        }
    }

    /// Add a client to try when every earlier one failed to clone.
    pub fn with_fallback(mut self, client: Box<dyn VcsClient>) -> Self {
        self.fallbacks.push(client);
        self
    }

    /// `git` as primary, plus `gh` when `upstream.repo` is set.
    pub fn from_config(upstream: &UpstreamConfig, cache_dir: impl Into<PathBuf>) -> Self {
        let git = GitCli::new(&upstream.url, &upstream.remote, &upstream.branch);
        let mirror = Self::new(cache_dir, Box::new(git));
        match &upstream.repo {
            Some(repo) => mirror.with_fallback(Box::new(GhCli::new(
                repo,
                &upstream.remote,
                &upstream.branch,
            ))),
            None => mirror,
        }
    }

    /// Make the cache an exact copy of upstream's current branch head.
    ///
    /// Clones when the cache is absent, otherwise fetches and hard-resets
    /// (local edits inside the cache are discarded). Never touches anything
    /// outside the cache directory.
    pub fn ensure_fresh(&self) -> Result<MirrorAction, MirrorError> {
        if self.cache_dir.exists() {
            tracing::info!("fetching latest upstream into {}", self.cache_dir.display());
            self.primary
                .fetch_and_reset(&self.cache_dir)
                .map_err(|source| MirrorError::RefreshFailed {
                    cache_dir: self.cache_dir.clone(),
                    source,
                })?;
            return Ok(MirrorAction::Refreshed);
        }

        let mut attempts = Vec::new();
        for client in std::iter::once(&self.primary).chain(self.fallbacks.iter()) {
            tracing::info!(
                "cloning upstream into {} via {}",
                self.cache_dir.display(),
                client.name()
            );
            match client.clone_repo(&self.cache_dir) {
                Ok(()) => {
                    return Ok(MirrorAction::Cloned {
                        via: client.name().to_string(),
                    })
                }
                Err(err) => {
                    tracing::warn!("{} clone failed: {err}", client.name());
                    attempts.push((client.name().to_string(), err));
                    self.remove_partial_clone()?;
                }
            }
        }

        Err(MirrorError::CloneFailed {
            cache_dir: self.cache_dir.clone(),
            attempts,
        })
    }

    /// Delete the cache directory. Returns `false` if there was nothing to delete.
    pub fn purge(&self) -> Result<bool, MirrorError> {
        match std::fs::remove_dir_all(&self.cache_dir) {
            Ok(()) => {
                tracing::info!("removed upstream cache {}", self.cache_dir.display());
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(io_err(&self.cache_dir, err)),
        }
    }

    // A failed clone may leave a half-written directory that would make the
    // next client (or the next run) take the refresh path.
    fn remove_partial_clone(&self) -> Result<(), MirrorError> {
        self.purge().map(|_| ())
    }
}
