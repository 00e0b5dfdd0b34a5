//! `resync.yaml` configuration.
//!
//! Every field has a default, so a missing file (or a file that only sets a
//! few keys) yields a usable configuration:
//!
//! ```text
//! upstream:
//!   url: https://github.com/cocoindex-io/cocoindex.git
//!   repo: cocoindex-io/cocoindex
//!   remote: origin
//!   branch: main
//! cache_dir: .upstream_cache
//! upstream_subpath: rust/cocoindex/src/ops
//! local_root: crates/recoco/src/ops
//! extension: rs
//! rules:
//!   - { pattern: cocoindex_utils, replacement: recoco_utils }
//! ```
//!
//! Relative paths are resolved against a root directory chosen by the
//! caller, normally the directory holding the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transform::RuleSet;

/// File name looked up when no explicit config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "resync.yaml";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Where the upstream repository lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Clone URL for the primary (`git`) transport.
    pub url: String,
    /// `owner/name` identifier for the fallback (`gh`) transport.
    /// `None` disables the fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    pub remote: String,
    pub branch: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://github.com/cocoindex-io/cocoindex.git".to_string(),
            repo: Some("cocoindex-io/cocoindex".to_string()),
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }
}

/// A transform rule as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub replacement: String,
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Inputs for the version-bump command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Environment variable holding the git ref.
    pub ref_var: String,
    pub manifest: PathBuf,
    pub version_file: PathBuf,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            ref_var: "GITHUB_REF".to_string(),
            manifest: PathBuf::from("Cargo.toml"),
            version_file: PathBuf::from("python").join("cocoindex").join("_version.py"),
        }
    }
}

/// Root of `resync.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub upstream: UpstreamConfig,
    /// Mirror cache directory (full upstream checkout).
    pub cache_dir: PathBuf,
    /// Tracked subtree inside the upstream checkout.
    pub upstream_subpath: PathBuf,
    /// Destination subtree in the local repository.
    pub local_root: PathBuf,
    /// Tracked file extension, without the leading dot.
    pub extension: String,
    pub rules: Vec<RuleSpec>,
    pub release: ReleaseConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            cache_dir: PathBuf::from(".upstream_cache"),
            upstream_subpath: PathBuf::from("rust").join("cocoindex").join("src").join("ops"),
            local_root: PathBuf::from("crates").join("recoco").join("src").join("ops"),
            extension: "rs".to_string(),
            rules: vec![
                RuleSpec::new("cocoindex_utils", "recoco_utils"),
                RuleSpec::new("cocoindex_extra_text", "recoco_splitters"),
            ],
            release: ReleaseConfig::default(),
        }
    }
}

/// Fully resolved locations for one sync session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPaths {
    pub cache_dir: PathBuf,
    /// `cache_dir / upstream_subpath`
    pub upstream_root: PathBuf,
    pub local_root: PathBuf,
}

impl SyncConfig {
    /// Resolve every configured path against `root`. Absolute paths are kept.
    pub fn paths(&self, root: &Path) -> SyncPaths {
        let cache_dir = root.join(&self.cache_dir);
        SyncPaths {
            upstream_root: cache_dir.join(&self.upstream_subpath),
            local_root: root.join(&self.local_root),
            cache_dir,
        }
    }

    /// Tracked extension with any leading dot removed.
    pub fn tracked_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Compile the configured rules, in order.
    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        RuleSet::from_specs(&self.rules)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracked_extension().is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        self.rule_set().map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load and validate the config at `path`.
///
/// Returns `ConfigError::Io` if the file cannot be read and
/// `ConfigError::Parse` (with path + line context) if it is malformed.
pub fn load_at(path: &Path) -> Result<SyncConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty file is a valid "all defaults" config.
    if contents.trim().is_empty() {
        return Ok(SyncConfig::default());
    }
    let config: SyncConfig =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Like [`load_at`], but a missing file yields [`SyncConfig::default`].
pub fn load_or_default_at(path: &Path) -> Result<SyncConfig, ConfigError> {
    if !path.exists() {
        return Ok(SyncConfig::default());
    }
    load_at(path)
}

/// Save `config` to `path` atomically (`<path>.tmp` then rename).
pub fn save_at(path: &Path, config: &SyncConfig) -> Result<(), ConfigError> {
    let io = |path: &Path, source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io(dir, e))?;
    }
    let yaml = serde_yaml::to_string(config)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, yaml).map_err(|e| io(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io(path, e));
    }
    Ok(())
}
