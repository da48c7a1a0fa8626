//! Custom assertion helpers for git-cleanup integration tests.

use std::path::Path;

use super::git_helpers;

/// Assert that a repo is on the expected branch.
pub fn assert_on_branch(repo_path: &Path, expected: &str) {
    let actual = git_helpers::current_branch(repo_path);
    assert_eq!(
        actual,
        expected,
        "Expected repo at {} to be on branch '{}', but was on '{}'",
        repo_path.display(),
        expected,
        actual
    );
}

/// Assert that a local branch exists in the repo.
pub fn assert_branch_exists(repo_path: &Path, branch_name: &str) {
    assert!(
        git_helpers::branch_exists(repo_path, branch_name),
        "Expected branch '{}' to exist in {}",
        branch_name,
        repo_path.display()
    );
}

/// Assert that a local branch does NOT exist in the repo.
pub fn assert_branch_not_exists(repo_path: &Path, branch_name: &str) {
    assert!(
        !git_helpers::branch_exists(repo_path, branch_name),
        "Expected branch '{}' to NOT exist in {}",
        branch_name,
        repo_path.display()
    );
}

/// Assert that `worktree` is registered with the repo and present on disk.
pub fn assert_worktree_kept(repo_path: &Path, worktree: &Path) {
    assert!(
        worktree.exists(),
        "Expected worktree directory to exist: {}",
        worktree.display()
    );
    assert!(
        is_registered(repo_path, worktree),
        "Expected worktree {} to be registered in {}",
        worktree.display(),
        repo_path.display()
    );
}

/// Assert that `worktree` is gone from disk and from git's registry.
pub fn assert_worktree_removed(repo_path: &Path, worktree: &Path) {
    assert!(
        !worktree.exists(),
        "Expected worktree directory to be gone: {}",
        worktree.display()
    );
    assert!(
        !is_registered(repo_path, worktree),
        "Expected worktree {} to be unregistered from {}",
        worktree.display(),
        repo_path.display()
    );
}

fn is_registered(repo_path: &Path, worktree: &Path) -> bool {
    let wanted = canonical(worktree);
    git_helpers::worktree_paths(repo_path)
        .iter()
        .any(|p| canonical(Path::new(p)) == wanted)
}

fn canonical(path: &Path) -> std::path::PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Assert the repo working tree is clean (no staged, modified, or untracked files).
pub fn assert_repo_clean(repo_path: &Path) {
    let status = git_helpers::git_output(repo_path, &["status", "--porcelain"]);
    assert!(
        status.is_empty(),
        "Expected repo at {} to be clean, but had:\n{}",
        repo_path.display(),
        status
    );
}
