//! Git status, stash and checkout operations

use std::path::Path;

use super::{git_stdout, GitError};

/// Working tree changes reported by `git status --porcelain`.
pub fn porcelain_status(repo_path: &Path) -> Result<Vec<String>, GitError> {
    let stdout = git_stdout(repo_path, &["status", "--porcelain"])?;
    Ok(stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.to_string())
        .collect())
}

/// Whether the working tree has staged, modified or untracked files
pub fn has_uncommitted_changes(repo_path: &Path) -> Result<bool, GitError> {
    Ok(!porcelain_status(repo_path)?.is_empty())
}

/// Number of entries in `git stash list`
pub fn stash_count(repo_path: &Path) -> Result<usize, GitError> {
    let stdout = git_stdout(repo_path, &["stash", "list"])?;
    Ok(stdout.lines().filter(|l| !l.trim().is_empty()).count())
}

/// Drop every stash entry at once (`git stash clear`)
pub fn clear_stashes(repo_path: &Path) -> Result<(), GitError> {
    git_stdout(repo_path, &["stash", "clear"]).map(|_| ())
}

/// Checkout an existing branch
pub fn checkout_branch(repo_path: &Path, branch_name: &str) -> Result<(), GitError> {
    git_stdout(repo_path, &["checkout", branch_name])
        .map(|_| ())
        .map_err(|e| match e {
            GitError::OperationFailed(msg) if msg.contains("is already used by worktree") => {
                GitError::OperationFailed(format!(
                    "Branch '{}' is checked out in another worktree",
                    branch_name
                ))
            }
            other => other,
        })
}
