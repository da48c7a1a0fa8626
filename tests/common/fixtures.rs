//! Test fixtures for a root directory of repositories.
//!
//! `RootBuilder` creates a temp directory holding bare remotes and, under
//! `root/`, one clone per repository. Linked worktrees are created as
//! siblings of their repository inside `root/`, the layout the scanner has
//! to skip.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use git_cleanup::core::{CleanupConfig, RepoInfo};

use super::git_helpers;

/// A root directory with temporary repositories, cleaned up on drop.
pub struct RootFixture {
    /// Kept alive for the lifetime of the fixture.
    pub _temp: TempDir,
    /// Directory passed to the cleanup run.
    pub root: PathBuf,
    /// Bare remotes, outside `root`.
    pub remotes_dir: PathBuf,
    /// Scratch clones standing in for other people's checkouts.
    pub scratch_dir: PathBuf,
    pub repo_names: Vec<String>,
}

impl RootFixture {
    /// Get the path to a repo within the root.
    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Get the path to a bare remote.
    pub fn remote_path(&self, name: &str) -> PathBuf {
        self.remotes_dir.join(format!("{}.git", name))
    }

    /// Get the file:// URL for a bare remote.
    pub fn remote_url(&self, name: &str) -> String {
        format!("file://{}", self.remote_path(name).display())
    }

    /// Sibling directory used for a linked worktree of `repo`.
    pub fn worktree_path(&self, repo: &str, suffix: &str) -> PathBuf {
        self.root.join(format!("{}-{}", repo, suffix))
    }

    /// Add a worktree on a new branch started from `origin/main`.
    pub fn add_worktree(&self, repo: &str, suffix: &str, branch: &str) -> PathBuf {
        let path = self.worktree_path(repo, suffix);
        git_helpers::add_worktree(&self.repo_path(repo), &path, branch, "origin/main");
        path
    }

    /// A second clone of `repo`'s remote, for pushing changes "from elsewhere".
    pub fn other_clone(&self, repo: &str) -> PathBuf {
        let dest = self.scratch_dir.join(format!("{}-other", repo));
        if !dest.exists() {
            git_helpers::clone_repo(&self.remote_url(repo), &dest);
        } else {
            git_helpers::git(&dest, &["pull", "--ff-only"]);
        }
        dest
    }

    /// `RepoInfo` for a repo, resolved the same way a run does.
    pub fn repo_info(&self, name: &str) -> RepoInfo {
        RepoInfo::discover(&self.repo_path(name), None).expect("repo info should resolve")
    }
}

/// Config for tests: PR checks off and no trash utility, so nothing depends
/// on what is installed on the machine.
pub fn test_config() -> CleanupConfig {
    CleanupConfig {
        check_prs: false,
        trash_command: None,
        ..CleanupConfig::default()
    }
}

/// Builder for creating test roots.
pub struct RootBuilder {
    repos: Vec<RepoSpec>,
}

struct RepoSpec {
    name: String,
    /// Extra files to commit during setup.
    files: Vec<(String, String)>,
}

impl RootBuilder {
    pub fn new() -> Self {
        Self { repos: Vec::new() }
    }

    /// Add a repo with a README.
    pub fn add_repo(mut self, name: &str) -> Self {
        self.repos.push(RepoSpec {
            name: name.to_string(),
            files: vec![("README.md".to_string(), format!("# {}\n", name))],
        });
        self
    }

    /// Add a repo with specific initial files.
    pub fn add_repo_with_files(mut self, name: &str, files: Vec<(&str, &str)>) -> Self {
        self.repos.push(RepoSpec {
            name: name.to_string(),
            files: files
                .into_iter()
                .map(|(n, c)| (n.to_string(), c.to_string()))
                .collect(),
        });
        self
    }

    /// Build the fixture.
    pub fn build(self) -> RootFixture {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = temp.path().join("root");
        let remotes_dir = temp.path().join("remotes");
        let scratch_dir = temp.path().join("scratch");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&remotes_dir).unwrap();
        fs::create_dir_all(&scratch_dir).unwrap();

        let mut repo_names = Vec::new();

        for spec in &self.repos {
            let bare_path = remotes_dir.join(format!("{}.git", spec.name));
            git_helpers::init_bare_repo(&bare_path);

            // Seed the remote from a staging repo
            let staging = scratch_dir.join(format!("staging-{}", spec.name));
            git_helpers::init_repo(&staging);
            for (filename, content) in &spec.files {
                git_helpers::commit_file(&staging, filename, content, &format!("Add {}", filename));
            }
            let remote_url = format!("file://{}", bare_path.display());
            git_helpers::add_remote(&staging, "origin", &remote_url);
            git_helpers::push_upstream(&staging, "origin", "main");

            git_helpers::clone_repo(&remote_url, &root.join(&spec.name));
            repo_names.push(spec.name.clone());
        }

        RootFixture {
            _temp: temp,
            root,
            remotes_dir,
            scratch_dir,
            repo_names,
        }
    }
}

impl Default for RootBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
