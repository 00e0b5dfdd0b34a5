//! # resync-sync
//!
//! Upstream/local reconciliation: scan, select, apply.
//!
//! [`scan`] compares every tracked upstream file (after transformation)
//! with its local counterpart and returns an immutable [`ChangeSet`].
//! [`apply_batch`] writes selected records into the local tree, and
//! [`pipeline::run`] ties mirror refresh, scan and apply together for the
//! CLI verbs.

pub mod applier;
pub mod diff;
pub mod error;
pub mod pipeline;
pub mod scanner;
pub mod snapshot;

pub use applier::{apply, apply_batch, ApplyReport};
pub use diff::{diff_records, FileDiff};
pub use error::SyncError;
pub use scanner::{classify, scan};
pub use snapshot::{ChangeSet, Selection};
