//! `resync apply [<i>...]`: write transformed upstream files locally.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use resync_sync::{
    pipeline::{Outcome, RunOptions, Verb},
    Selection,
};

use super::{display_path, note_upstream_missing, GlobalOpts, Workspace};

/// Arguments for `resync apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Report positions to apply, in order. Omit to apply everything.
    #[arg(value_name = "INDEX")]
    pub indices: Vec<usize>,

    /// Refuse to apply unless the fresh scan matches this report snapshot.
    #[arg(long, value_name = "ID")]
    pub snapshot: Option<String>,
}

impl ApplyArgs {
    pub fn run(self, global: &GlobalOpts) -> Result<()> {
        let workspace = Workspace::load(global)?;
        let options = RunOptions {
            fetch: global.fetch,
            expected_snapshot: self.snapshot,
        };
        let verb = Verb::Apply(Selection::from_indices(self.indices));
        let (change_set, report) = match workspace
            .run(verb, &options)
            .context("apply failed")?
        {
            Outcome::Applied {
                change_set, report, ..
            } => (change_set, report),
            other => anyhow::bail!("unexpected outcome for apply: {other:?}"),
        };

        note_upstream_missing(&change_set, &workspace);
        if report.written.is_empty() {
            println!("No changes detected from upstream.");
            return Ok(());
        }

        for path in &report.written {
            let shown = path
                .strip_prefix(&workspace.paths.local_root)
                .unwrap_or(path.as_path());
            println!("{} {}", "Applied".green(), display_path(shown));
        }
        println!("Done. {} file(s) written.", report.written.len());
        Ok(())
    }
}
