//! # resync-release
//!
//! Release version bump driven by a CI tag reference.
//!
//! Given `refs/tags/v<version>`, [`bump`] rewrites the first
//! `version = "..."` line of the crate manifest and writes a companion
//! `__version__` file. Any other reference is a successful no-op.

mod error;
pub mod version;

pub use error::ReleaseError;
pub use version::{
    bump, extract_version, update_manifest_version, write_version_file, BumpOutcome, BumpTargets,
};
