//! Domain types for upstream/local reconciliation.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::PathBuf;

/// Classification of one upstream file against its local counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    /// No local counterpart exists.
    New,
    /// Local counterpart exists and differs from the transformed upstream content.
    Modified,
    /// Local counterpart matches the transformed upstream content byte-for-byte.
    Identical,
}

impl ChangeStatus {
    /// Upper-case label used in operator-facing reports.
    pub fn label(self) -> &'static str {
        match self {
            ChangeStatus::New => "NEW",
            ChangeStatus::Modified => "MODIFIED",
            ChangeStatus::Identical => "IDENTICAL",
        }
    }

    /// Lower-case key used in machine-readable output.
    pub fn key(self) -> &'static str {
        match self {
            ChangeStatus::New => "new",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Identical => "identical",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One non-identical file found by a scan.
///
/// `index` and `relative_path` identify the record; the two resolved
/// locations exist only so the applier can act on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Position in the scan snapshot; the operator-facing address.
    pub index: usize,
    /// Path within the tracked subtree, shared by both trees.
    pub relative_path: PathBuf,
    pub status: ChangeStatus,
    pub upstream_path: PathBuf,
    pub local_path: PathBuf,
}
