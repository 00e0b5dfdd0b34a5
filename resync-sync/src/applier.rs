//! Change applier: materialise transformed upstream content locally.
//!
//! ## `apply`: per-record protocol
//!
//! 1. Re-read the upstream file (scan-time content is never reused).
//! 2. Run it through the rule set.
//! 3. Create the destination's parent directories.
//! 4. Resolve a symlinked local path to the file it points at.
//! 5. Write to `<target>.resync.tmp`.
//! 6. Rename over the target; remove the tmp file if that fails.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use resync_core::{ChangeRecord, RuleSet};

use crate::error::{io_err, SyncError};
use crate::scanner::transformed_upstream;
use crate::snapshot::{ChangeSet, Selection};

/// Outcome of a successful batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Local paths written, in the order they were applied.
    pub written: Vec<PathBuf>,
}

/// Overwrite one local file with the transformed upstream content.
///
/// Returns the local path that was written.
pub fn apply(record: &ChangeRecord, rules: &RuleSet) -> Result<PathBuf, SyncError> {
    let content = transformed_upstream(&record.upstream_path, rules)?;
    let target = resolve_symlinks(&record.local_path)?;
    let tmp = tmp_path(&target);
    write_replacing(&target, &content, &tmp)?;
    tracing::info!("applied: {}", record.relative_path.display());
    Ok(record.local_path.clone())
}

/// Apply the records named by `selection`, stopping at the first failure.
///
/// Every index is validated before anything is written. On failure the
/// records already applied stay applied and the rest are not attempted.
pub fn apply_batch(
    change_set: &ChangeSet,
    selection: &Selection,
    rules: &RuleSet,
) -> Result<ApplyReport, SyncError> {
    let records = change_set.select(selection)?;
    let mut written = Vec::with_capacity(records.len());
    for record in records {
        match apply(record, rules) {
            Ok(path) => written.push(path),
            Err(source) => {
                return Err(SyncError::ApplyFailed {
                    position: record.index,
                    relative_path: record.relative_path.clone(),
                    applied: written.len(),
                    source: Box::new(source),
                })
            }
        }
    }
    Ok(ApplyReport { written })
}

// Links stay links; the rename lands on the file they point at.
fn resolve_symlinks(path: &Path) -> Result<PathBuf, SyncError> {
    const MAX_HOPS: usize = 40;

    let mut current = path.to_path_buf();
    for _ in 0..MAX_HOPS {
        match std::fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let link = std::fs::read_link(&current).map_err(|e| io_err(&current, e))?;
                current = match current.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                };
            }
            Ok(_) => return Ok(current),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(current),
            Err(err) => return Err(io_err(&current, err)),
        }
    }
    Err(io_err(
        path,
        std::io::Error::other("too many levels of symbolic links"),
    ))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".resync.tmp");
    PathBuf::from(tmp)
}

fn write_replacing(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}
