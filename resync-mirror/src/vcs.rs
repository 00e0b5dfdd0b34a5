//! Version-control clients used by [`crate::Mirror`].
//!
//! Both clients shell out and treat any non-zero exit as failure, keeping
//! the captured stderr for the operator.

use std::path::Path;
use std::process::Command;

use crate::error::TransportError;

/// Narrow capability interface over a version-control client.
pub trait VcsClient {
    /// Short name used in logs and diagnostics (e.g. `"git"`).
    fn name(&self) -> &str;

    /// Clone the upstream repository into `dest`, which must not exist.
    fn clone_repo(&self, dest: &Path) -> Result<(), TransportError>;

    /// Bring an existing checkout in line with the remote branch head,
    /// discarding any local edits.
    fn fetch_and_reset(&self, checkout: &Path) -> Result<(), TransportError>;
}

/// Plain `git` over whatever transport the URL implies.
#[derive(Debug, Clone)]
pub struct GitCli {
    pub url: String,
    pub remote: String,
    pub branch: String,
}

impl GitCli {
    pub fn new(url: impl Into<String>, remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            remote: remote.into(),
            branch: branch.into(),
        }
    }
}

impl GitCli {
    // The remote is named explicitly so refreshes can address it.
    fn clone_args(&self, dest: &Path) -> Vec<String> {
        vec![
            "clone".to_string(),
            "--origin".to_string(),
            self.remote.clone(),
            "--branch".to_string(),
            self.branch.clone(),
            self.url.clone(),
            dest.display().to_string(),
        ]
    }
}

impl VcsClient for GitCli {
    fn name(&self) -> &str {
        "git"
    }

    fn clone_repo(&self, dest: &Path) -> Result<(), TransportError> {
        let args = self.clone_args(dest);
        run_command("git", &as_strs(&args), None)
    }

    fn fetch_and_reset(&self, checkout: &Path) -> Result<(), TransportError> {
        git_fetch_and_reset(checkout, &self.remote, &self.branch)
    }
}

/// GitHub CLI (`gh`), which brings its own authentication.
#[derive(Debug, Clone)]
pub struct GhCli {
    /// `owner/name`
    pub repo: String,
    pub remote: String,
    pub branch: String,
}

impl GhCli {
    pub fn new(repo: impl Into<String>, remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            remote: remote.into(),
            branch: branch.into(),
        }
    }
}

impl GhCli {
    // Flags after `--` are passed through to `git clone`.
    fn clone_args(&self, dest: &Path) -> Vec<String> {
        vec![
            "repo".to_string(),
            "clone".to_string(),
            self.repo.clone(),
            dest.display().to_string(),
            "--".to_string(),
            "--origin".to_string(),
            self.remote.clone(),
            "--branch".to_string(),
            self.branch.clone(),
        ]
    }
}

impl VcsClient for GhCli {
    fn name(&self) -> &str {
        "gh"
    }

    fn clone_repo(&self, dest: &Path) -> Result<(), TransportError> {
        let args = self.clone_args(dest);
        run_command("gh", &as_strs(&args), None)
    }

    // A `gh` clone is an ordinary git checkout with `origin` configured.
    fn fetch_and_reset(&self, checkout: &Path) -> Result<(), TransportError> {
        git_fetch_and_reset(checkout, &self.remote, &self.branch)
    }
}

fn git_fetch_and_reset(checkout: &Path, remote: &str, branch: &str) -> Result<(), TransportError> {
    run_command("git", &["fetch", remote], Some(checkout))?;
    let target = format!("{remote}/{branch}");
    run_command("git", &["reset", "--hard", &target], Some(checkout))
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

fn run_command(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<(), TransportError> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    tracing::debug!("running: {command}");

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let output = cmd.output().map_err(|source| TransportError::Spawn {
        command: command.clone(),
        source,
    })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(TransportError::Failed {
        command,
        status: output.status.to_string(),
        stderr,
    })
}
