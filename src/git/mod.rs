//! Git operations wrapper
//!
//! Git's CLI output (porcelain where available) is the wire protocol for
//! almost everything here. libgit2 is only used to open repositories and
//! read HEAD.

pub mod branch;
pub mod remote;
pub mod status;
pub mod worktree;

pub use branch::*;
pub use remote::*;
pub use status::*;
pub use worktree::*;

use crate::util::{display_cmd, log_cmd};
use git2::Repository;
use std::path::Path;
use std::process::{Command, Output};
use thiserror::Error;

/// Errors that can occur during git operations
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {0}")]
    NotARepo(String),

    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Reference error: {0}")]
    Reference(String),
}

/// Build a `git` command rooted at `dir`.
///
/// Prompts are disabled so an unreachable remote fails instead of waiting on
/// credentials, and the locale is pinned because some output is matched on.
pub fn git_command<P: AsRef<Path>>(dir: P) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir.as_ref())
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("LC_ALL", "C");
    cmd
}

/// Run `git <args>` in `dir` and return the raw output, whatever the exit status.
pub fn git_output<P: AsRef<Path>>(dir: P, args: &[&str]) -> Result<Output, GitError> {
    let mut cmd = git_command(dir);
    cmd.args(args);
    log_cmd(&cmd);
    cmd.output()
        .map_err(|e| GitError::OperationFailed(format!("failed to run {}: {}", display_cmd(&cmd), e)))
}

/// Run `git <args>` in `dir`, returning trimmed stdout on success and the
/// trimmed stderr as an error otherwise.
pub fn git_stdout<P: AsRef<Path>>(dir: P, args: &[&str]) -> Result<String, GitError> {
    let output = git_output(dir, args)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::OperationFailed(stderr.trim().to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Parse the output of a `rev-list --count` style command.
pub(crate) fn parse_count(stdout: &str) -> Result<usize, GitError> {
    stdout
        .trim()
        .parse()
        .map_err(|_| GitError::OperationFailed(format!("unexpected count output: {:?}", stdout)))
}

/// Open a git repository at the given path
pub fn open_repo<P: AsRef<Path>>(path: P) -> Result<Repository, GitError> {
    Repository::open(path.as_ref())
        .map_err(|e| GitError::NotARepo(format!("{}: {}", path.as_ref().display(), e)))
}

/// Get the current branch name, or `None` when HEAD is detached.
pub fn get_current_branch(repo: &Repository) -> Result<Option<String>, GitError> {
    let head = repo
        .head()
        .map_err(|e| GitError::Reference(e.to_string()))?;

    if head.is_branch() {
        Ok(head.shorthand().map(|s| s.to_string()))
    } else {
        Ok(None)
    }
}
