//! resync: keep a vendored subtree in step with its upstream repository.
//!
//! # Usage
//!
//! ```text
//! resync [--json]                      refresh mirror, list changes
//! resync apply [<i>...] [--snapshot <id>]
//! resync diff [<i>...]
//! resync clean
//! resync bump-version
//! resync init [--force]
//!
//! global: --config <path>  --no-fetch  -v/--verbose
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    apply::ApplyArgs, bump_version::BumpVersionArgs, clean::CleanArgs, diff::DiffArgs,
    init::InitArgs, report::ReportArgs, GlobalOpts,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "resync",
    version,
    about = "Pull upstream changes into a locally transformed source tree",
    long_about = None,
)]
struct Cli {
    /// Path to the config file (default: ./resync.yaml; missing means defaults).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scan the existing mirror cache without contacting upstream.
    #[arg(long, global = true)]
    no_fetch: bool,

    /// Log debug detail to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    report: ReportArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write transformed upstream files into the local tree.
    Apply(ApplyArgs),

    /// Show unified diffs of what `apply` would write.
    Diff(DiffArgs),

    /// Delete the mirror cache so the next run re-clones.
    Clean(CleanArgs),

    /// Bump release versions from the CI tag reference.
    BumpVersion(BumpVersionArgs),

    /// Write a default config file.
    Init(InitArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let global = GlobalOpts {
        config: cli.config,
        fetch: !cli.no_fetch,
    };
    match cli.command {
        None => cli.report.run(&global),
        Some(Commands::Apply(args)) => args.run(&global),
        Some(Commands::Diff(args)) => args.run(&global),
        Some(Commands::Clean(args)) => args.run(&global),
        Some(Commands::BumpVersion(args)) => args.run(&global),
        Some(Commands::Init(args)) => args.run(&global),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
