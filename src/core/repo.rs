//! Repository discovery and information

use std::fs;
use std::path::{Path, PathBuf};

use crate::git::{get_remote_url, resolve_default_branch, GitError, ORIGIN};

/// Branch assumed when origin/HEAD cannot be resolved
pub const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// How the default branch was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultBranchSource {
    /// `--default-branch` / `DEFAULT_BRANCH`
    Override,
    /// `refs/remotes/origin/HEAD`
    RemoteHead,
    /// Nothing resolved; assumed [`FALLBACK_DEFAULT_BRANCH`]
    Fallback,
}

/// A repository selected for cleanup
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Directory name
    pub name: String,
    /// Main worktree path
    pub path: PathBuf,
    /// Default branch (e.g., "main", "master")
    pub default_branch: String,
    /// Where `default_branch` came from
    pub default_branch_source: DefaultBranchSource,
    /// URL of `origin`, if configured
    pub remote_url: Option<String>,
}

impl RepoInfo {
    /// Resolve remote facts for the repository at `path`.
    pub fn discover(path: &Path, default_branch_override: Option<&str>) -> Result<Self, GitError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let remote_url = get_remote_url(path, ORIGIN)?;

        let (default_branch, default_branch_source) = match default_branch_override {
            Some(branch) => (branch.to_string(), DefaultBranchSource::Override),
            None => match resolve_default_branch(path) {
                Some(branch) => (branch, DefaultBranchSource::RemoteHead),
                None => (
                    FALLBACK_DEFAULT_BRANCH.to_string(),
                    DefaultBranchSource::Fallback,
                ),
            },
        };

        Ok(Self {
            name,
            path: path.to_path_buf(),
            default_branch,
            default_branch_source,
            remote_url,
        })
    }

    /// `origin/<default>`, the ref every merge and ahead check runs against
    pub fn remote_default_ref(&self) -> String {
        format!("{}/{}", ORIGIN, self.default_branch)
    }
}

/// Whether `dir` holds a real `.git` directory.
///
/// Linked worktree checkouts have a `.git` *file* pointing back at their
/// main repository and are skipped so no repository is processed twice.
pub fn is_repository_root(dir: &Path) -> bool {
    dir.join(".git").is_dir()
}

/// Immediate child directories of `root` that are repository roots, sorted
/// by name.
pub fn scan_repositories(root: &Path) -> Result<Vec<PathBuf>, GitError> {
    let mut repos: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && is_repository_root(path))
        .collect();
    repos.sort();
    Ok(repos)
}
