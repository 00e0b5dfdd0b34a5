//! Tag parsing and version file rewriting.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{io_err, ReleaseError};

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^refs/tags/v(?P<version>.+)$").expect("Invalid tag regex")
});

static VERSION_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(?P<prefix>\s*version\s*=\s*)"[^"]*""#).expect("Invalid version line regex")
});

/// Files touched by a bump, already resolved against the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpTargets {
    pub manifest: PathBuf,
    pub version_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpOutcome {
    /// The reference was not a `v*` tag; nothing was written.
    NoTag,
    Bumped { version: String },
}

/// `refs/tags/v1.2.3` → `1.2.3`. Anything else yields `None`.
pub fn extract_version(git_ref: &str) -> Option<String> {
    TAG_PATTERN
        .captures(git_ref)
        .map(|caps| caps["version"].to_string())
}

/// Replace the quoted value of the first `version = "..."` line.
///
/// Returns `None` when no such line exists.
pub fn update_manifest_version(manifest: &str, version: &str) -> Option<String> {
    if !VERSION_LINE_PATTERN.is_match(manifest) {
        return None;
    }
    let updated = VERSION_LINE_PATTERN.replacen(manifest, 1, |caps: &Captures| {
        format!("{}\"{}\"", &caps["prefix"], version)
    });
    Some(updated.into_owned())
}

/// Write `__version__ = "<version>"` to `path`, creating parent directories.
pub fn write_version_file(path: &Path, version: &str) -> Result<(), ReleaseError> {
    write_atomic(path, &format!("__version__ = \"{version}\"\n"))
}

/// Apply the version carried by `git_ref` to `targets`.
///
/// The manifest is validated before anything is written, so a missing
/// manifest or version line leaves both files untouched.
pub fn bump(git_ref: Option<&str>, targets: &BumpTargets) -> Result<BumpOutcome, ReleaseError> {
    let Some(version) = git_ref.and_then(extract_version) else {
        tracing::info!("no version tag in {git_ref:?}");
        return Ok(BumpOutcome::NoTag);
    };

    let manifest = match std::fs::read_to_string(&targets.manifest) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ReleaseError::ManifestMissing {
                path: targets.manifest.clone(),
            })
        }
        Err(err) => return Err(io_err(&targets.manifest, err)),
    };
    let updated = update_manifest_version(&manifest, &version).ok_or_else(|| {
        ReleaseError::VersionLineMissing {
            path: targets.manifest.clone(),
        }
    })?;

    write_atomic(&targets.manifest, &updated)?;
    tracing::info!("set {} version to {version}", targets.manifest.display());
    write_version_file(&targets.version_file, &version)?;
    tracing::info!("wrote {}", targets.version_file.display());

    Ok(BumpOutcome::Bumped { version })
}

fn write_atomic(path: &Path, content: &str) -> Result<(), ReleaseError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
