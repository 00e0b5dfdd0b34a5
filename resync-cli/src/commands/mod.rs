pub mod apply;
pub mod bump_version;
pub mod clean;
pub mod diff;
pub mod init;
pub mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use resync_core::{
    config::{self, DEFAULT_CONFIG_FILE},
    RuleSet, SyncConfig, SyncPaths,
};
use resync_mirror::Mirror;
use resync_sync::{
    pipeline::{self, Outcome, RunOptions, Verb},
    ChangeSet,
};

/// Flags shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub fetch: bool,
}

impl GlobalOpts {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

/// Loaded config plus everything resolved from it.
pub struct Workspace {
    pub root: PathBuf,
    pub config: SyncConfig,
    pub paths: SyncPaths,
    pub rules: RuleSet,
}

impl Workspace {
    /// Load the config named by `--config`, or `./resync.yaml` (defaults
    /// when absent). Relative paths resolve against the config's directory.
    pub fn load(global: &GlobalOpts) -> Result<Self> {
        let path = global.config_path();
        let config = match &global.config {
            Some(explicit) => config::load_at(explicit),
            None => config::load_or_default_at(&path),
        }
        .with_context(|| format!("failed to load config {}", path.display()))?;

        let root = config_root(&path);
        let rules = config.rule_set().context("invalid transform rules")?;
        tracing::debug!("loaded {} transform rule(s) from {}", rules.len(), path.display());
        for (index, rule) in rules.iter().enumerate() {
            tracing::debug!("rule {index}: {} -> {}", rule.pattern(), rule.replacement());
        }
        let paths = config.paths(&root);
        Ok(Self {
            root,
            config,
            paths,
            rules,
        })
    }

    pub fn mirror(&self) -> Mirror {
        Mirror::from_config(&self.config.upstream, &self.paths.cache_dir)
    }

    /// Run one pipeline verb with the shared options.
    pub fn run(&self, verb: Verb, options: &RunOptions) -> Result<Outcome> {
        let outcome = pipeline::run(
            &self.paths,
            self.config.tracked_extension(),
            &self.rules,
            &self.mirror(),
            verb,
            options,
        )?;
        Ok(outcome)
    }
}

fn config_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Tell the operator when the tracked subtree is absent from the mirror.
pub fn note_upstream_missing(change_set: &ChangeSet, workspace: &Workspace) {
    if change_set.is_upstream_missing() {
        eprintln!(
            "Upstream directory not found at {}",
            workspace.paths.upstream_root.display()
        );
    }
}

/// `relative_path` rendered with forward slashes.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
