//! # resync-mirror
//!
//! Keeps a local cache directory holding a full, current checkout of the
//! upstream repository.
//!
//! [`Mirror::ensure_fresh`] clones on first use (falling back to a second
//! client if the first fails) and otherwise fetches and hard-resets the
//! cache. [`Mirror::purge`] deletes the cache so the next run re-clones.
//! Version control is reached only through the [`VcsClient`] trait.

mod error;
pub mod mirror;
pub mod vcs;

pub use error::{MirrorError, TransportError};
pub use mirror::{Mirror, MirrorAction};
pub use vcs::{GhCli, GitCli, VcsClient};
