//! In-memory pull request lookup for tests.
//!
//! Stands in for `gh` so PR-driven behavior can be exercised offline.

use std::cell::Cell;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use git_cleanup::platform::{PlatformError, PrIndex, PrLookup, PrStatus, PullRequestInfo};

/// Serves a fixed set of pull requests for every repository.
pub struct FakePrLookup {
    prs: Vec<PullRequestInfo>,
    fail: bool,
    calls: Cell<usize>,
}

impl FakePrLookup {
    pub fn new() -> Self {
        Self {
            prs: Vec::new(),
            fail: false,
            calls: Cell::new(0),
        }
    }

    /// A lookup whose every call errors.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Add a PR for `branch`, last updated `days_ago` days ago.
    pub fn with_pr(mut self, number: u64, branch: &str, status: PrStatus, days_ago: i64) -> Self {
        self.prs.push(pr(number, branch, status, Utc::now() - Duration::days(days_ago)));
        self
    }

    /// Number of `pull_requests` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Default for FakePrLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl PrLookup for FakePrLookup {
    fn name(&self) -> &str {
        "fake"
    }

    fn supports_remote(&self, _url: &str) -> bool {
        true
    }

    fn pull_requests(&self, _repo_path: &Path) -> Result<PrIndex, PlatformError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(PlatformError::CommandFailed("gh: HTTP 502".to_string()));
        }
        Ok(PrIndex::from_pull_requests(self.prs.clone()))
    }
}

pub fn pr(number: u64, branch: &str, status: PrStatus, updated_at: DateTime<Utc>) -> PullRequestInfo {
    PullRequestInfo {
        number,
        title: format!("Change {}", number),
        url: format!("https://github.com/acme/app/pull/{}", number),
        status,
        head_branch: branch.to_string(),
        updated_at,
    }
}
