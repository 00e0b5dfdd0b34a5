//! Tree scanner: classify every tracked upstream file against the local tree.
//!
//! Walk order (and therefore report/apply addressing order):
//! depth-first from the upstream root; inside each directory, files come
//! before subdirectories and both are sorted by file name.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use resync_core::{ChangeRecord, ChangeStatus, RuleSet};

use crate::error::{io_err, SyncError};
use crate::snapshot::ChangeSet;

/// Scan `upstream_root` for files ending in `.<extension>` and compare each,
/// after transformation, with the same relative path under `local_root`.
///
/// Identical files are dropped. A missing `upstream_root` is reported via
/// [`ChangeSet::is_upstream_missing`] rather than as an error.
pub fn scan(
    upstream_root: &Path,
    local_root: &Path,
    extension: &str,
    rules: &RuleSet,
) -> Result<ChangeSet, SyncError> {
    if !upstream_root.is_dir() {
        tracing::info!(
            "upstream directory not found at {}",
            upstream_root.display()
        );
        return Ok(ChangeSet::upstream_missing());
    }

    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let mut files = Vec::new();
    walk(upstream_root, &suffix, &mut files)?;

    let mut records = Vec::new();
    for upstream_path in files {
        let relative_path = upstream_path
            .strip_prefix(upstream_root)
            .unwrap_or(upstream_path.as_path())
            .to_path_buf();
        let local_path = local_root.join(&relative_path);

        let status = classify(&upstream_path, &local_path, rules)?;
        tracing::debug!("{status}: {}", relative_path.display());
        if status == ChangeStatus::Identical {
            continue;
        }

        records.push(ChangeRecord {
            index: records.len(),
            relative_path,
            status,
            upstream_path,
            local_path,
        });
    }

    Ok(ChangeSet::from_records(records))
}

/// Classify one file pair: `New` if the local file is absent, otherwise
/// `Identical` or `Modified` by byte comparison with the transformed
/// upstream content.
pub fn classify(
    upstream_path: &Path,
    local_path: &Path,
    rules: &RuleSet,
) -> Result<ChangeStatus, SyncError> {
    let local = match std::fs::read(local_path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ChangeStatus::New),
        Err(err) => return Err(io_err(local_path, err)),
    };

    let expected = transformed_upstream(upstream_path, rules)?;
    if expected.as_bytes() == local.as_slice() {
        Ok(ChangeStatus::Identical)
    } else {
        Ok(ChangeStatus::Modified)
    }
}

/// Read an upstream file and run it through `rules`.
pub(crate) fn transformed_upstream(upstream_path: &Path, rules: &RuleSet) -> Result<String, SyncError> {
    let content =
        std::fs::read_to_string(upstream_path).map_err(|e| io_err(upstream_path, e))?;
    Ok(rules.transform(&content))
}

fn walk(dir: &Path, suffix: &str, out: &mut Vec<PathBuf>) -> Result<(), SyncError> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_dir() {
            subdirs.push(path);
            continue;
        }
        // Symlinked files are tracked; symlinked directories are not followed.
        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if is_file && entry.file_name().to_string_lossy().ends_with(suffix) {
            out.push(path);
        }
    }

    for subdir in subdirs {
        walk(&subdir, suffix, out)?;
    }
    Ok(())
}
