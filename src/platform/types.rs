//! Pull request types shared by lookups and decision logic

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use super::traits::PlatformError;

/// Pull request state of a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrStatus {
    /// No PR, or the lookup was unavailable
    #[default]
    None,
    Open,
    Merged,
    /// Closed without merge
    Closed,
}

impl std::fmt::Display for PrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrStatus::None => write!(f, "none"),
            PrStatus::Open => write!(f, "open"),
            PrStatus::Merged => write!(f, "merged"),
            PrStatus::Closed => write!(f, "closed"),
        }
    }
}

/// State as `gh` reports it
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum GhPrState {
    Open,
    Closed,
    Merged,
}

impl From<GhPrState> for PrStatus {
    fn from(state: GhPrState) -> Self {
        match state {
            GhPrState::Open => PrStatus::Open,
            GhPrState::Closed => PrStatus::Closed,
            GhPrState::Merged => PrStatus::Merged,
        }
    }
}

/// One element of `gh pr list --json number,title,url,state,headRefName,updatedAt`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhPullRequest {
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    state: GhPrState,
    head_ref_name: String,
    updated_at: DateTime<Utc>,
}

/// Normalized pull request data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR URL
    pub url: String,
    /// PR state
    pub status: PrStatus,
    /// Head branch name
    pub head_branch: String,
    /// Last activity
    pub updated_at: DateTime<Utc>,
}

impl PullRequestInfo {
    /// Short human label: `#42 Add login page`
    pub fn label(&self) -> String {
        if self.title.is_empty() {
            format!("#{}", self.number)
        } else {
            format!("#{} {}", self.number, self.title)
        }
    }
}

impl From<GhPullRequest> for PullRequestInfo {
    fn from(pr: GhPullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            url: pr.url,
            status: pr.state.into(),
            head_branch: pr.head_ref_name,
            updated_at: pr.updated_at,
        }
    }
}

/// Parse the JSON array printed by `gh pr list --json ...`
pub fn parse_gh_pr_list(json: &str) -> Result<Vec<PullRequestInfo>, PlatformError> {
    let prs: Vec<GhPullRequest> = serde_json::from_str(json)
        .map_err(|e| PlatformError::ParseError(format!("gh pr list output: {}", e)))?;
    Ok(prs.into_iter().map(PullRequestInfo::from).collect())
}

/// Branch → pull request map for one repository.
///
/// When several PRs share a head branch the most recently updated one wins.
#[derive(Debug, Clone, Default)]
pub struct PrIndex {
    by_branch: HashMap<String, PullRequestInfo>,
}

impl PrIndex {
    /// Index with no pull requests; every branch reads as `PrStatus::None`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pull_requests<I>(prs: I) -> Self
    where
        I: IntoIterator<Item = PullRequestInfo>,
    {
        let mut by_branch: HashMap<String, PullRequestInfo> = HashMap::new();
        for pr in prs {
            match by_branch.get(&pr.head_branch) {
                Some(existing) if existing.updated_at >= pr.updated_at => {}
                _ => {
                    by_branch.insert(pr.head_branch.clone(), pr);
                }
            }
        }
        Self { by_branch }
    }

    pub fn get(&self, branch: &str) -> Option<&PullRequestInfo> {
        self.by_branch.get(branch)
    }

    pub fn status(&self, branch: &str) -> PrStatus {
        self.get(branch).map(|pr| pr.status).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_branch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_branch.is_empty()
    }
}
