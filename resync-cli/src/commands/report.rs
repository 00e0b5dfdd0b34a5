//! `resync` (no subcommand): numbered list of pending upstream changes.

use anyhow::{Context, Result};
use clap::Args;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use resync_core::ChangeStatus;
use resync_sync::{
    pipeline::{Outcome, RunOptions, Verb},
    ChangeSet,
};

use super::{display_path, note_upstream_missing, GlobalOpts, Workspace};

/// Arguments for the default report.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub fn run(self, global: &GlobalOpts) -> Result<()> {
        let workspace = Workspace::load(global)?;
        let options = RunOptions {
            fetch: global.fetch,
            expected_snapshot: None,
        };
        let change_set = match workspace
            .run(Verb::Report, &options)
            .context("failed to scan upstream changes")?
        {
            Outcome::Reported { change_set, .. } => change_set,
            other => anyhow::bail!("unexpected outcome for report: {other:?}"),
        };

        note_upstream_missing(&change_set, &workspace);
        if self.json {
            let report = ReportJson::from(&change_set);
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to encode report")?
            );
            return Ok(());
        }

        print_report(&change_set);
        Ok(())
    }
}

#[derive(Serialize)]
struct ReportJson {
    snapshot: String,
    upstream_missing: bool,
    changes: Vec<ChangeJson>,
}

#[derive(Serialize)]
struct ChangeJson {
    index: usize,
    status: &'static str,
    path: String,
}

impl From<&ChangeSet> for ReportJson {
    fn from(set: &ChangeSet) -> Self {
        Self {
            snapshot: set.short_id().to_string(),
            upstream_missing: set.is_upstream_missing(),
            changes: set
                .iter()
                .map(|r| ChangeJson {
                    index: r.index,
                    status: r.status.key(),
                    path: display_path(&r.relative_path),
                })
                .collect(),
        }
    }
}

fn print_report(change_set: &ChangeSet) {
    if change_set.is_empty() {
        println!("No changes detected from upstream.");
        return;
    }

    println!(
        "Found {} changes from upstream (snapshot {}):",
        change_set.len(),
        change_set.short_id()
    );
    for record in change_set.iter() {
        println!(
            "[{}] {} {}",
            record.index,
            status_label(record.status),
            display_path(&record.relative_path)
        );
    }
    println!();
    println!("To apply changes, run:");
    println!("  resync apply [indices...]");
}

/// Status label padded to a fixed column, then coloured.
pub fn status_label(status: ChangeStatus) -> ColoredString {
    let padded = format!("{:<8}", status.label());
    match status {
        ChangeStatus::New => padded.green(),
        ChangeStatus::Modified => padded.yellow(),
        ChangeStatus::Identical => padded.dimmed(),
    }
}
