//! Git remote operations

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

use super::{git_output, git_stdout, GitError};

/// Remote every cleanup stage works against.
pub const ORIGIN: &str = "origin";

static WOULD_PRUNE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[would prune\]\s+(\S+)").expect("hardcoded regex must be valid"));

/// Get the URL of a remote
pub fn get_remote_url(repo_path: &Path, remote: &str) -> Result<Option<String>, GitError> {
    let output = git_output(repo_path, &["remote", "get-url", remote])?;

    if output.status.success() {
        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(url))
    } else {
        Ok(None)
    }
}

/// `git fetch --prune origin`
pub fn fetch_prune(repo_path: &Path) -> Result<(), GitError> {
    let output = git_output(repo_path, &["fetch", "--prune", ORIGIN])?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::OperationFailed(stderr.trim().to_string()));
    }
    Ok(())
}

/// Resolve the default branch from `refs/remotes/origin/HEAD`.
///
/// Returns `None` when the symbolic ref is missing; callers decide the
/// fallback.
pub fn resolve_default_branch(repo_path: &Path) -> Option<String> {
    let symref = format!("refs/remotes/{}/HEAD", ORIGIN);
    let stdout = git_stdout(repo_path, &["symbolic-ref", "--quiet", "--short", &symref]).ok()?;
    let prefix = format!("{}/", ORIGIN);
    let branch = stdout.trim().strip_prefix(&prefix)?.to_string();
    debug!(repo = %repo_path.display(), %branch, "resolved default branch");
    if branch.is_empty() {
        None
    } else {
        Some(branch)
    }
}

/// Check whether `refs/heads/<branch>` exists on origin right now
/// (`git ls-remote --heads`).
pub fn remote_branch_exists(repo_path: &Path, branch_name: &str) -> Result<bool, GitError> {
    let full_ref = format!("refs/heads/{}", branch_name);
    let stdout = git_stdout(repo_path, &["ls-remote", "--heads", ORIGIN, &full_ref])?;
    Ok(ls_remote_has_ref(&stdout, &full_ref))
}

fn ls_remote_has_ref(stdout: &str, full_ref: &str) -> bool {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .any(|r| r == full_ref)
}

/// Remote-tracking refs `git remote prune origin` would delete.
pub fn prunable_remote_refs(repo_path: &Path) -> Result<Vec<String>, GitError> {
    let stdout = git_stdout(repo_path, &["remote", "prune", ORIGIN, "--dry-run"])?;
    Ok(parse_would_prune(&stdout))
}

fn parse_would_prune(stdout: &str) -> Vec<String> {
    WOULD_PRUNE
        .captures_iter(stdout)
        .map(|c| c[1].to_string())
        .collect()
}

/// `git remote prune origin`
pub fn prune_remote(repo_path: &Path) -> Result<(), GitError> {
    git_stdout(repo_path, &["remote", "prune", ORIGIN]).map(|_| ())
}

/// Outcome of a `git pull`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullResult {
    /// False when git reported the branch was already up to date
    pub updated: bool,
}

/// Pull latest changes into the checked-out branch
pub fn pull_latest(repo_path: &Path) -> Result<PullResult, GitError> {
    let output = git_output(repo_path, &["pull"])?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("CONFLICT") {
            return Err(GitError::OperationFailed(
                "Merge conflict occurred. Resolve conflicts manually.".to_string(),
            ));
        }
        if stderr.contains("no tracking information") {
            return Err(GitError::OperationFailed(
                "Current branch has no upstream to pull from".to_string(),
            ));
        }
        return Err(GitError::OperationFailed(stderr.trim().to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(PullResult {
        updated: !stdout.contains("Already up to date") && !stdout.contains("Already up-to-date"),
    })
}
