//! Worktree and branch inspection
//!
//! Collects the facts the deletion policy needs. Every check that cannot be
//! completed resolves to the answer that keeps work on disk: not clean,
//! unpushed, remote still present.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::repo::RepoInfo;
use crate::git::{
    self, commits_ahead_of_upstream, commits_not_on_remote, count_commits, WorktreeEntry,
};
use crate::platform::{PrIndex, PrStatus};

/// Where a checkout's commits stand relative to the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpushedState {
    /// No upstream configured and HEAD has no commits at all
    NoUpstreamNoCommits,
    /// No upstream configured; every commit on HEAD counts as unpushed
    NoUpstreamHasCommits { commits: usize },
    /// Upstream resolves; `ahead` is `@{u}..HEAD`
    HasUpstream { ahead: usize },
    /// Upstream configured but its tracking ref is gone; counts commits no
    /// `origin/*` ref contains
    UpstreamGone { not_on_remote: usize },
    /// Could not be determined
    Unknown,
}

impl UnpushedState {
    pub fn is_unpushed(&self) -> bool {
        match *self {
            UnpushedState::NoUpstreamNoCommits => false,
            UnpushedState::NoUpstreamHasCommits { .. } => true,
            UnpushedState::HasUpstream { ahead } => ahead > 0,
            UnpushedState::UpstreamGone { not_on_remote } => not_on_remote > 0,
            UnpushedState::Unknown => true,
        }
    }
}

/// Everything the policy needs to know about one linked worktree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeFacts {
    pub path: PathBuf,
    /// `None` for detached HEAD
    pub branch: Option<String>,
    pub locked: bool,
    /// `branch.<name>.remote` is configured
    pub has_upstream: bool,
    /// Branch is on origin (`ls-remote`); only queried with an upstream
    pub remote_exists: bool,
    pub merged_into_default: bool,
    pub pr_status: PrStatus,
    /// No uncommitted changes and nothing ahead of `origin/<default>`
    pub is_clean: bool,
    pub unpushed: UnpushedState,
}

impl WorktreeFacts {
    pub fn has_unpushed_commits(&self) -> bool {
        self.unpushed.is_unpushed()
    }

    /// Facts for a checkout the policy keeps without looking further
    fn minimal(entry: &WorktreeEntry) -> Self {
        Self {
            path: entry.path.clone(),
            branch: entry.branch.clone(),
            locked: entry.locked,
            has_upstream: false,
            remote_exists: true,
            merged_into_default: false,
            pr_status: PrStatus::None,
            is_clean: false,
            unpushed: UnpushedState::Unknown,
        }
    }
}

/// What the PR sweep needs to know about a local branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFacts {
    pub name: String,
    pub pr_status: PrStatus,
    /// Ahead of its upstream, or holding commits no `origin/*` ref contains
    /// when the upstream is gone or was never set
    pub has_unpushed_commits: bool,
}

/// Inspect a linked worktree.
pub fn inspect_worktree(repo: &RepoInfo, entry: &WorktreeEntry, prs: &PrIndex) -> WorktreeFacts {
    let Some(branch) = entry.branch.as_deref() else {
        return WorktreeFacts::minimal(entry);
    };
    if entry.locked {
        return WorktreeFacts::minimal(entry);
    }

    let upstream = git::upstream_of(&repo.path, branch);
    let has_upstream = upstream.is_some();
    let remote_exists = match &upstream {
        None => false,
        // Only origin is checked; any other remote reads as present
        Some(u) if u.remote != git::ORIGIN => true,
        Some(u) => match git::remote_branch_exists(&repo.path, &u.branch) {
            Ok(exists) => exists,
            Err(e) => {
                warn!(repo = %repo.name, branch, error = %e, "ls-remote failed, assuming branch still exists");
                true
            }
        },
    };

    let default_ref = repo.remote_default_ref();
    let merged_into_default = match git::is_branch_merged(&repo.path, branch, &default_ref) {
        Ok(merged) => merged,
        Err(e) => {
            debug!(repo = %repo.name, branch, error = %e, "merge check failed");
            false
        }
    };

    let facts = WorktreeFacts {
        path: entry.path.clone(),
        branch: Some(branch.to_string()),
        locked: entry.locked,
        has_upstream,
        remote_exists,
        merged_into_default,
        pr_status: prs.status(branch),
        is_clean: is_worktree_clean(&entry.path, &default_ref),
        unpushed: unpushed_state(&entry.path, has_upstream),
    };
    debug!(repo = %repo.name, ?facts, "inspected worktree");
    facts
}

/// No uncommitted changes and zero commits ahead of `default_ref`.
/// A checkout that cannot be examined is not clean.
pub fn is_worktree_clean(worktree_path: &Path, default_ref: &str) -> bool {
    if !worktree_path.is_dir() {
        return false;
    }
    let no_changes = matches!(git::has_uncommitted_changes(worktree_path), Ok(false));
    no_changes
        && matches!(
            count_commits(worktree_path, &[&format!("{}..HEAD", default_ref)]),
            Ok(0)
        )
}

/// Classify the commits checked out at `worktree_path`.
pub fn unpushed_state(worktree_path: &Path, has_upstream: bool) -> UnpushedState {
    if !worktree_path.is_dir() {
        return UnpushedState::Unknown;
    }

    if !has_upstream {
        return match count_commits(worktree_path, &["HEAD"]) {
            Ok(0) => UnpushedState::NoUpstreamNoCommits,
            Ok(commits) => UnpushedState::NoUpstreamHasCommits { commits },
            Err(_) => UnpushedState::Unknown,
        };
    }

    if git::upstream_resolves(worktree_path, "HEAD") {
        match commits_ahead_of_upstream(worktree_path, "HEAD") {
            Ok(ahead) => UnpushedState::HasUpstream { ahead },
            Err(_) => UnpushedState::Unknown,
        }
    } else {
        match commits_not_on_remote(worktree_path, "HEAD") {
            Ok(not_on_remote) => UnpushedState::UpstreamGone { not_on_remote },
            Err(_) => UnpushedState::Unknown,
        }
    }
}

/// Inspect a local branch that has no worktree of its own.
pub fn inspect_branch(repo: &RepoInfo, branch: &str, prs: &PrIndex) -> BranchFacts {
    let counted = if git::upstream_resolves(&repo.path, branch) {
        commits_ahead_of_upstream(&repo.path, branch)
    } else {
        commits_not_on_remote(&repo.path, branch)
    };
    let has_unpushed_commits = match counted {
        Ok(commits) => commits > 0,
        Err(e) => {
            debug!(repo = %repo.name, branch, error = %e, "unpushed check failed");
            true
        }
    };

    BranchFacts {
        name: branch.to_string(),
        pr_status: prs.status(branch),
        has_unpushed_commits,
    }
}
