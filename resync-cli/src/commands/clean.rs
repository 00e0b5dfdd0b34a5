//! `resync clean`: delete the mirror cache.

use anyhow::{Context, Result};
use clap::Args;

use resync_sync::pipeline::{Outcome, RunOptions, Verb};

use super::{GlobalOpts, Workspace};

/// Arguments for `resync clean`.
#[derive(Args, Debug)]
pub struct CleanArgs {}

impl CleanArgs {
    pub fn run(self, global: &GlobalOpts) -> Result<()> {
        let workspace = Workspace::load(global)?;
        let removed = match workspace
            .run(Verb::Clean, &RunOptions::default())
            .context("failed to clean upstream cache")?
        {
            Outcome::Cleaned { removed } => removed,
            other => anyhow::bail!("unexpected outcome for clean: {other:?}"),
        };

        if removed {
            println!("Cache cleaned.");
        } else {
            println!(
                "No cache at {}; nothing to clean.",
                workspace.paths.cache_dir.display()
            );
        }
        Ok(())
    }
}
