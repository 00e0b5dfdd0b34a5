//! `resync diff [<i>...]`: unified diffs of what `apply` would write.

use anyhow::{Context, Result};
use clap::Args;

use resync_sync::{
    pipeline::{Outcome, RunOptions, Verb},
    Selection,
};

use super::{note_upstream_missing, GlobalOpts, Workspace};

/// Arguments for `resync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Report positions to diff. Omit to diff everything.
    #[arg(value_name = "INDEX")]
    pub indices: Vec<usize>,
}

impl DiffArgs {
    pub fn run(self, global: &GlobalOpts) -> Result<()> {
        let workspace = Workspace::load(global)?;
        let options = RunOptions {
            fetch: global.fetch,
            expected_snapshot: None,
        };
        let verb = Verb::Diff(Selection::from_indices(self.indices));
        let (change_set, diffs) = match workspace.run(verb, &options).context("diff failed")? {
            Outcome::Diffed {
                change_set, diffs, ..
            } => (change_set, diffs),
            other => anyhow::bail!("unexpected outcome for diff: {other:?}"),
        };

        note_upstream_missing(&change_set, &workspace);
        if diffs.is_empty() {
            println!("No changes detected from upstream.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }
}
