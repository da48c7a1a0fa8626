//! Git worktree listing and removal

use std::path::{Path, PathBuf};

use super::{git_output, git_stdout, GitError};

/// One record of `git worktree list --porcelain`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeEntry {
    /// Checkout directory
    pub path: PathBuf,
    /// Commit checked out, if reported
    pub head: Option<String>,
    /// Short branch name; `None` for detached HEAD or a bare entry
    pub branch: Option<String>,
    /// The bare repository entry
    pub bare: bool,
    /// HEAD is detached
    pub detached: bool,
    /// `git worktree lock` was applied
    pub locked: bool,
    /// Git reports the checkout directory as missing
    pub prunable: bool,
}

/// Parse `git worktree list --porcelain` output.
///
/// Records are separated by blank lines; order is preserved, so the main
/// worktree is always the first entry.
pub fn parse_worktree_porcelain(stdout: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut current: Option<WorktreeEntry> = None;

    for line in stdout.lines() {
        if line.is_empty() {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            continue;
        }

        let (key, value) = line.split_once(' ').unwrap_or((line, ""));
        if key == "worktree" {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(WorktreeEntry {
                path: PathBuf::from(value),
                ..Default::default()
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };
        match key {
            "HEAD" => entry.head = Some(value.to_string()),
            "branch" => {
                let short = value.strip_prefix("refs/heads/").unwrap_or(value);
                entry.branch = Some(short.to_string());
            }
            "bare" => entry.bare = true,
            "detached" => entry.detached = true,
            "locked" => entry.locked = true,
            "prunable" => entry.prunable = true,
            _ => {}
        }
    }

    if let Some(entry) = current {
        entries.push(entry);
    }
    entries
}

/// All worktrees, main worktree first
pub fn list_worktrees(repo_path: &Path) -> Result<Vec<WorktreeEntry>, GitError> {
    let stdout = git_stdout(repo_path, &["worktree", "list", "--porcelain"])?;
    Ok(parse_worktree_porcelain(&stdout))
}

/// Linked worktrees only. The first entry git reports is the main worktree
/// and is never returned.
pub fn linked_worktrees(repo_path: &Path) -> Result<Vec<WorktreeEntry>, GitError> {
    Ok(list_worktrees(repo_path)?
        .into_iter()
        .skip(1)
        .filter(|wt| !wt.bare)
        .collect())
}

/// `git worktree remove [--force] <path>`
pub fn remove_worktree(repo_path: &Path, worktree_path: &Path, force: bool) -> Result<(), GitError> {
    let path = worktree_path.to_string_lossy();
    let mut args = vec!["worktree", "remove"];
    if force {
        args.push("--force");
    }
    args.push(&path);

    let output = git_output(repo_path, &args)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::OperationFailed(stderr.trim().to_string()));
    }
    Ok(())
}

/// `git worktree prune`: drop registry entries whose directory is gone
pub fn prune_worktrees(repo_path: &Path) -> Result<(), GitError> {
    git_stdout(repo_path, &["worktree", "prune"]).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORCELAIN: &str = "worktree /home/me/git/app\n\
HEAD 1111111111111111111111111111111111111111\n\
branch refs/heads/main\n\
\n\
worktree /home/me/git/app-feature\n\
HEAD 2222222222222222222222222222222222222222\n\
branch refs/heads/feature/login\n\
\n\
worktree /home/me/git/app-detached\n\
HEAD 3333333333333333333333333333333333333333\n\
detached\n\
\n\
worktree /home/me/git/app-gone\n\
HEAD 4444444444444444444444444444444444444444\n\
branch refs/heads/gone\n\
locked moving disks\n\
prunable gitdir file points to non-existent location\n\
\n";

    #[test]
    fn test_parse_porcelain() {
        let entries = parse_worktree_porcelain(PORCELAIN);
        assert_eq!(entries.len(), 4);

        assert_eq!(entries[0].path, PathBuf::from("/home/me/git/app"));
        assert_eq!(entries[0].branch.as_deref(), Some("main"));

        assert_eq!(entries[1].branch.as_deref(), Some("feature/login"));
        assert!(!entries[1].detached);

        assert!(entries[2].detached);
        assert_eq!(entries[2].branch, None);

        assert!(entries[3].locked);
        assert!(entries[3].prunable);
    }

    #[test]
    fn test_parse_without_trailing_blank_line() {
        let entries = parse_worktree_porcelain("worktree /a\nHEAD 1\nbranch refs/heads/main");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_parse_bare_entry() {
        let entries = parse_worktree_porcelain("worktree /srv/repo.git\nbare\n\n");
        assert!(entries[0].bare);
    }
}
