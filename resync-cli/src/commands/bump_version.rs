//! `resync bump-version`: apply a CI tag's version to the release files.

use anyhow::{Context, Result};
use clap::Args;

use resync_release::{bump, extract_version, BumpOutcome, BumpTargets};

use super::{GlobalOpts, Workspace};

/// Arguments for `resync bump-version`.
#[derive(Args, Debug)]
pub struct BumpVersionArgs {
    /// Git reference to read instead of the configured environment variable.
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,
}

impl BumpVersionArgs {
    pub fn run(self, global: &GlobalOpts) -> Result<()> {
        let workspace = Workspace::load(global)?;
        let release = &workspace.config.release;
        let git_ref = self
            .git_ref
            .or_else(|| std::env::var(&release.ref_var).ok());

        match git_ref.as_deref().and_then(extract_version) {
            Some(version) => println!("Building release version: {version}"),
            None => {
                println!("No version tag found");
                return Ok(());
            }
        }

        let targets = BumpTargets {
            manifest: workspace.root.join(&release.manifest),
            version_file: workspace.root.join(&release.version_file),
        };
        match bump(git_ref.as_deref(), &targets).context("version bump failed")? {
            BumpOutcome::Bumped { version } => {
                println!(
                    "Updated {} and {} to {version}",
                    release.manifest.display(),
                    release.version_file.display()
                );
            }
            BumpOutcome::NoTag => println!("No version tag found"),
        }
        Ok(())
    }
}
