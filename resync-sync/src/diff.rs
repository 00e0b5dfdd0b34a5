//! Dry-run unified diff support for `resync diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use resync_core::{ChangeStatus, RuleSet};

use crate::{
    error::io_err,
    scanner::transformed_upstream,
    snapshot::{ChangeSet, Selection},
    SyncError,
};

/// What applying one record would change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub index: usize,
    pub relative_path: PathBuf,
    pub status: ChangeStatus,
    pub unified_diff: String,
}

/// Render local → transformed-upstream diffs for the selected records.
///
/// No files are written.
pub fn diff_records(
    change_set: &ChangeSet,
    selection: &Selection,
    rules: &RuleSet,
) -> Result<Vec<FileDiff>, SyncError> {
    let records = change_set.select(selection)?;
    let mut diffs = Vec::with_capacity(records.len());
    for record in records {
        let incoming = transformed_upstream(&record.upstream_path, rules)?;
        let existing = read_existing_or_empty(&record.local_path)?;

        let relative = record.relative_path.to_string_lossy().replace('\\', "/");
        let old_header = match record.status {
            ChangeStatus::New => "/dev/null".to_string(),
            _ => format!("a/{relative}"),
        };
        let new_header = format!("b/{relative}");
        let unified = TextDiff::from_lines(&existing, &incoming)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            index: record.index,
            relative_path: record.relative_path.clone(),
            status: record.status,
            unified_diff: unified,
        });
    }
    Ok(diffs)
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}
