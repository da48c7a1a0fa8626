//! Git branch operations

use std::path::Path;

use super::{git_output, git_stdout, parse_count, GitError};

/// Config key recording that a branch's worktree was removed and the branch
/// itself still has to be deleted.
pub const CLEANUP_PENDING_KEY: &str = "cleanupPending";

/// Strip the two-column marker `git branch` prints before each name
/// (`* ` for the current branch, `+ ` for a branch checked out in another
/// worktree).
pub fn parse_branch_list_line(line: &str) -> &str {
    let line = line.trim_end();
    let name = line
        .strip_prefix("* ")
        .or_else(|| line.strip_prefix("+ "))
        .unwrap_or(line);
    name.trim()
}

/// Whether `branch_name` appears as an exact entry in `git branch` output.
pub fn branch_listed(stdout: &str, branch_name: &str) -> bool {
    stdout
        .lines()
        .any(|line| parse_branch_list_line(line) == branch_name)
}

/// Get list of local branches
pub fn list_local_branches(repo_path: &Path) -> Result<Vec<String>, GitError> {
    let stdout = git_stdout(repo_path, &["branch", "--format=%(refname:short)"])?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|s| s.to_string())
        .collect())
}

/// Branches already merged into `target` (e.g. `origin/main`).
pub fn merged_branches(repo_path: &Path, target: &str) -> Result<Vec<String>, GitError> {
    let stdout = git_stdout(repo_path, &["branch", "--merged", target])?;
    Ok(stdout
        .lines()
        .map(parse_branch_list_line)
        .filter(|name| !name.is_empty() && !name.starts_with('('))
        .map(|s| s.to_string())
        .collect())
}

/// Check if a branch has been merged into another branch
pub fn is_branch_merged(
    repo_path: &Path,
    branch_name: &str,
    target: &str,
) -> Result<bool, GitError> {
    let stdout = git_stdout(repo_path, &["branch", "--merged", target])?;
    Ok(branch_listed(&stdout, branch_name))
}

/// Check if a local branch exists
pub fn branch_exists(repo_path: &Path, branch_name: &str) -> bool {
    git_output(
        repo_path,
        &[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/heads/{}", branch_name),
        ],
    )
    .map(|o| o.status.success())
    .unwrap_or(false)
}

/// Delete a local branch. `force` uses `-D`, otherwise `-d` (which refuses
/// to delete unmerged work).
pub fn delete_local_branch(
    repo_path: &Path,
    branch_name: &str,
    force: bool,
) -> Result<(), GitError> {
    let flag = if force { "-D" } else { "-d" };
    let output = git_output(repo_path, &["branch", flag, branch_name])?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("not fully merged") {
            return Err(GitError::OperationFailed(format!(
                "Branch '{}' is not fully merged",
                branch_name
            )));
        }
        if stderr.contains("not found") {
            return Err(GitError::BranchNotFound(branch_name.to_string()));
        }
        return Err(GitError::OperationFailed(stderr.trim().to_string()));
    }

    Ok(())
}

/// Whether `branch.<name>.remote` is configured.
pub fn has_upstream(repo_path: &Path, branch_name: &str) -> bool {
    upstream_of(repo_path, branch_name).is_some()
}

/// Configured upstream of a local branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    /// `branch.<name>.remote`
    pub remote: String,
    /// `branch.<name>.merge` without the `refs/heads/` prefix
    pub branch: String,
}

/// Read `branch.<name>.remote` and `branch.<name>.merge`.
///
/// A branch created from `origin/main` tracks `main`, so the upstream
/// branch name is not necessarily the local one.
pub fn upstream_of(repo_path: &Path, branch_name: &str) -> Option<Upstream> {
    let get = |key: &str| {
        git_stdout(
            repo_path,
            &["config", "--get", &format!("branch.{}.{}", branch_name, key)],
        )
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    };

    let remote = get("remote")?;
    let merge = get("merge").unwrap_or_else(|| branch_name.to_string());
    let branch = merge
        .strip_prefix("refs/heads/")
        .unwrap_or(&merge)
        .to_string();
    Some(Upstream { remote, branch })
}

/// Whether `<rev>@{upstream}` still resolves to a remote-tracking ref.
pub fn upstream_resolves(repo_path: &Path, rev: &str) -> bool {
    git_output(
        repo_path,
        &["rev-parse", "--verify", "--quiet", &format!("{}@{{upstream}}", rev)],
    )
    .map(|o| o.status.success())
    .unwrap_or(false)
}

/// `git rev-list --count <args...>`
pub fn count_commits(repo_path: &Path, args: &[&str]) -> Result<usize, GitError> {
    let mut full = vec!["rev-list", "--count"];
    full.extend_from_slice(args);
    parse_count(&git_stdout(repo_path, &full)?)
}

/// Commits on `rev` that its upstream does not have.
pub fn commits_ahead_of_upstream(repo_path: &Path, rev: &str) -> Result<usize, GitError> {
    count_commits(repo_path, &[&format!("{}@{{upstream}}..{}", rev, rev)])
}

/// Commits on `rev` that no `origin/*` ref contains.
pub fn commits_not_on_remote(repo_path: &Path, rev: &str) -> Result<usize, GitError> {
    count_commits(repo_path, &[rev, "--not", "--remotes=origin"])
}

/// Record that `branch_name` is due for deletion once its worktree is gone.
pub fn mark_cleanup_pending(
    repo_path: &Path,
    branch_name: &str,
    reason: &str,
) -> Result<(), GitError> {
    git_stdout(
        repo_path,
        &[
            "config",
            &format!("branch.{}.{}", branch_name, CLEANUP_PENDING_KEY),
            reason,
        ],
    )
    .map(|_| ())
}

/// Branches carrying a cleanup-pending marker, with the recorded reason.
pub fn cleanup_pending_branches(repo_path: &Path) -> Result<Vec<(String, String)>, GitError> {
    let pattern = format!(r"^branch\..*\.{}$", CLEANUP_PENDING_KEY.to_lowercase());
    let output = git_output(repo_path, &["config", "--get-regexp", &pattern])?;

    // Exit status 1 means no matching keys
    if !output.status.success() {
        return Ok(Vec::new());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_pending_markers(&stdout))
}

fn parse_pending_markers(stdout: &str) -> Vec<(String, String)> {
    let suffix = format!(".{}", CLEANUP_PENDING_KEY.to_lowercase());
    stdout
        .lines()
        .filter_map(|line| {
            let (key, reason) = line.split_once(' ').unwrap_or((line, ""));
            let branch = key.strip_prefix("branch.")?.strip_suffix(&suffix)?;
            Some((branch.to_string(), reason.to_string()))
        })
        .collect()
}

/// Remove the cleanup-pending marker for a branch (no-op if absent).
pub fn clear_cleanup_pending(repo_path: &Path, branch_name: &str) -> Result<(), GitError> {
    let key = format!("branch.{}.{}", branch_name, CLEANUP_PENDING_KEY);
    let output = git_output(repo_path, &["config", "--unset", &key])?;
    // Exit status 5 means the key was not set
    match output.status.code() {
        Some(0) | Some(5) => Ok(()),
        _ => Err(GitError::OperationFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )),
    }
}
