//! Per-repository outcomes and the run-wide summary

/// A pull request inactive beyond the configured threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalePr {
    pub repo: String,
    pub branch: String,
    pub days_inactive: i64,
    /// `#<number> <title>`
    pub pr_info: String,
}

impl StalePr {
    /// `<repo>: <branch> (<days> days) - <pr-info>`
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} ({} days) - {}",
            self.repo, self.branch, self.days_inactive, self.pr_info
        )
    }
}

/// What happened (or would have happened, in dry-run) in one repository
#[derive(Debug, Clone, Default)]
pub struct RepoOutcome {
    pub name: String,
    pub worktrees_removed: usize,
    pub worktrees_kept: usize,
    pub branches_deleted: usize,
    pub refs_pruned: usize,
    pub checked_out_default: bool,
    pub pulled_updates: bool,
    pub stashes_cleared: usize,
    pub stale_prs: Vec<StalePr>,
    /// Failed operations, already reported to the user
    pub errors: Vec<String>,
}

impl RepoOutcome {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Whether anything in the repository changed
    pub fn changed(&self) -> bool {
        self.worktrees_removed > 0
            || self.branches_deleted > 0
            || self.refs_pruned > 0
            || self.checked_out_default
            || self.pulled_updates
            || self.stashes_cleared > 0
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Accumulated outcomes across every repository of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    changed: Vec<String>,
    unchanged: Vec<String>,
    stale_prs: Vec<StalePr>,
    failed: Vec<(String, String)>,
    worktrees_removed: usize,
    branches_deleted: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: RepoOutcome) {
        if outcome.changed() {
            self.changed.push(outcome.name.clone());
        } else {
            self.unchanged.push(outcome.name.clone());
        }
        self.worktrees_removed += outcome.worktrees_removed;
        self.branches_deleted += outcome.branches_deleted;
        self.stale_prs.extend(outcome.stale_prs);
        for error in outcome.errors {
            self.failed.push((outcome.name.clone(), error));
        }
    }

    /// Repositories with at least one change
    pub fn changed(&self) -> &[String] {
        &self.changed
    }

    /// Repositories left untouched
    pub fn unchanged(&self) -> &[String] {
        &self.unchanged
    }

    pub fn stale_prs(&self) -> &[StalePr] {
        &self.stale_prs
    }

    /// `(repo, message)` for every failed operation
    pub fn failures(&self) -> &[(String, String)] {
        &self.failed
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn worktrees_removed(&self) -> usize {
        self.worktrees_removed
    }

    pub fn branches_deleted(&self) -> usize {
        self.branches_deleted
    }

    pub fn repo_count(&self) -> usize {
        self.changed.len() + self.unchanged.len()
    }
}
