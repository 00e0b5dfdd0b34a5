//! `resync init [--force]`: write a default config file.

use anyhow::{bail, Context, Result};
use clap::Args;

use resync_core::{config, SyncConfig};

use super::GlobalOpts;

/// Arguments for `resync init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self, global: &GlobalOpts) -> Result<()> {
        let path = global.config_path();
        if path.exists() && !self.force {
            bail!(
                "{} already exists; pass --force to overwrite",
                path.display()
            );
        }

        config::save_at(&path, &SyncConfig::default())
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✓ Wrote default config to {}", path.display());
        Ok(())
    }
}
