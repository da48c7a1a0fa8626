//! Git helper utilities for integration tests.
//!
//! Everything runs through the `git` CLI against `file://` remotes, so the
//! tests work offline.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Initialize a bare git repository at the given path.
pub fn init_bare_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    let status = Command::new("git")
        .args(["init", "--bare", "-b", "main"])
        .current_dir(path)
        .output()
        .expect("failed to init bare repo");
    assert!(
        status.status.success(),
        "git init --bare failed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
}

/// Initialize a non-bare git repository with user config.
pub fn init_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init", "-b", "main"]);
    configure_identity(path);
}

/// Create a file, stage, and commit it. Returns the commit hash.
pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) -> String {
    fs::write(repo_path.join(filename), content).unwrap();
    git(repo_path, &["add", filename]);
    git(repo_path, &["commit", "-m", message]);
    get_head_sha(repo_path)
}

/// Create and checkout a new branch.
pub fn create_branch(repo_path: &Path, branch_name: &str) {
    git(repo_path, &["checkout", "-b", branch_name]);
}

/// Create a local branch without checking it out.
pub fn create_branch_at(repo_path: &Path, branch_name: &str, start: &str) {
    git(repo_path, &["branch", branch_name, start]);
}

/// Checkout an existing branch.
pub fn checkout(repo_path: &Path, branch_name: &str) {
    git(repo_path, &["checkout", branch_name]);
}

/// Push with set-upstream.
pub fn push_upstream(repo_path: &Path, remote: &str, branch: &str) {
    git(repo_path, &["push", "-u", remote, branch]);
}

/// Push a branch without touching its upstream config.
pub fn push_branch(repo_path: &Path, remote: &str, branch: &str) {
    git(repo_path, &["push", remote, branch]);
}

/// Delete a branch on the remote (as a merged PR with auto-delete would).
pub fn delete_remote_branch(repo_path: &Path, remote: &str, branch: &str) {
    git(repo_path, &["push", remote, "--delete", branch]);
}

/// Merge `branch` into `main` with a merge commit and push main.
pub fn merge_into_main_and_push(repo_path: &Path, branch: &str) {
    checkout(repo_path, "main");
    git(
        repo_path,
        &["merge", "--no-ff", branch, "-m", &format!("Merge {}", branch)],
    );
    git(repo_path, &["push", "origin", "main"]);
}

/// Add a remote to a repository.
pub fn add_remote(repo_path: &Path, name: &str, url: &str) {
    git(repo_path, &["remote", "add", name, url]);
}

/// Add a linked worktree at `path` on a new branch started from `start`.
/// The branch gets no upstream until it is pushed with `-u`.
pub fn add_worktree(repo_path: &Path, worktree_path: &Path, branch: &str, start: &str) {
    git(
        repo_path,
        &[
            "worktree",
            "add",
            "--no-track",
            "-b",
            branch,
            worktree_path.to_str().unwrap(),
            start,
        ],
    );
    configure_identity(worktree_path);
}

/// Lock a linked worktree.
pub fn lock_worktree(repo_path: &Path, worktree_path: &Path) {
    git(
        repo_path,
        &["worktree", "lock", worktree_path.to_str().unwrap()],
    );
}

/// Paths listed by `git worktree list --porcelain`, main worktree first.
pub fn worktree_paths(repo_path: &Path) -> Vec<String> {
    git_output(repo_path, &["worktree", "list", "--porcelain"])
        .lines()
        .filter_map(|l| l.strip_prefix("worktree "))
        .map(|s| s.to_string())
        .collect()
}

/// Get the current branch name.
pub fn current_branch(repo_path: &Path) -> String {
    git_output(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Get HEAD sha.
pub fn get_head_sha(repo_path: &Path) -> String {
    git_output(repo_path, &["rev-parse", "HEAD"])
}

/// Check if a local branch exists.
pub fn branch_exists(repo_path: &Path, branch_name: &str) -> bool {
    Command::new("git")
        .args([
            "rev-parse",
            "--verify",
            &format!("refs/heads/{}", branch_name),
        ])
        .current_dir(repo_path)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check if a remote-tracking ref exists locally.
pub fn remote_ref_exists(repo_path: &Path, remote: &str, branch_name: &str) -> bool {
    Command::new("git")
        .args([
            "rev-parse",
            "--verify",
            &format!("refs/remotes/{}/{}", remote, branch_name),
        ])
        .current_dir(repo_path)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Number of stash entries.
pub fn stash_count(repo_path: &Path) -> usize {
    git_output(repo_path, &["stash", "list"])
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count()
}

/// Create a stash entry by modifying a tracked file and stashing it.
pub fn make_stash(repo_path: &Path, filename: &str) {
    fs::write(repo_path.join(filename), "stashed change\n").unwrap();
    git(repo_path, &["stash", "push", "-m", "wip"]);
}

/// Everything a cleanup run could change: refs, worktrees, config markers
/// and stashes.
pub fn snapshot(repo_path: &Path) -> String {
    let refs = git_output(repo_path, &["for-each-ref", "--format=%(refname) %(objectname)"]);
    let worktrees = git_output(repo_path, &["worktree", "list", "--porcelain"]);
    let stashes = git_output(repo_path, &["stash", "list"]);
    let head = git_output(repo_path, &["symbolic-ref", "-q", "HEAD"]);
    format!("{}\n--\n{}\n--\n{}\n--\n{}", refs, worktrees, stashes, head)
}

/// Clone a repository from a URL (typically file://).
pub fn clone_repo(url: &str, dest: &Path) {
    let status = Command::new("git")
        .args(["clone", url, dest.to_str().unwrap()])
        .output()
        .expect("failed to clone repo");
    assert!(
        status.status.success(),
        "git clone failed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
    // Configure git identity (CI runners may not have global config)
    configure_identity(dest);
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test User"]);
}

/// Run a git command, panic on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Run a git command and return trimmed stdout.
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
