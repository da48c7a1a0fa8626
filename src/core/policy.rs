//! Deletion policy
//!
//! Pure decision functions over inspected facts. Rules are evaluated in
//! priority order and the first match wins; the unpushed-commits override is
//! applied last and beats every removal reason.

use super::config::CleanupConfig;
use super::inspect::{BranchFacts, WorktreeFacts};
use crate::platform::PrStatus;

/// Why something is removed or kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionReason {
    RemoteBranchDeleted,
    MergedInto(String),
    PrMerged,
    PrClosed,
    CleanWorktree,
    UnpushedCommits,
    Locked,
    DetachedHead,
    Active,
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionReason::RemoteBranchDeleted => write!(f, "remote branch deleted"),
            DecisionReason::MergedInto(branch) => write!(f, "merged into {}", branch),
            DecisionReason::PrMerged => write!(f, "PR merged"),
            DecisionReason::PrClosed => write!(f, "PR closed without merge"),
            DecisionReason::CleanWorktree => {
                write!(f, "clean worktree (no changes, no commits ahead)")
            }
            DecisionReason::UnpushedCommits => {
                write!(f, "HAS UNPUSHED COMMITS — keeping for safety")
            }
            DecisionReason::Locked => write!(f, "worktree is locked"),
            DecisionReason::DetachedHead => write!(f, "detached HEAD"),
            DecisionReason::Active => write!(f, "not merged, no merged or closed PR"),
        }
    }
}

/// Outcome of the policy for one worktree or branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionDecision {
    pub should_remove: bool,
    pub reason: DecisionReason,
    /// Removal reason the safety override reversed, if any
    pub overridden: Option<DecisionReason>,
}

impl DeletionDecision {
    fn remove(reason: DecisionReason) -> Self {
        Self {
            should_remove: true,
            reason,
            overridden: None,
        }
    }

    fn keep(reason: DecisionReason) -> Self {
        Self {
            should_remove: false,
            reason,
            overridden: None,
        }
    }
}

/// PR rules shared by worktrees and bare branches (rules 3 and 4).
fn pr_rule(status: PrStatus, config: &CleanupConfig) -> Option<DecisionReason> {
    match status {
        PrStatus::Merged => Some(DecisionReason::PrMerged),
        PrStatus::Closed if config.cleanup_closed_prs => Some(DecisionReason::PrClosed),
        _ => None,
    }
}

/// Reverse a removal when unpushed commits would be lost.
fn apply_safety_override(
    candidate: Option<DecisionReason>,
    has_unpushed_commits: bool,
    config: &CleanupConfig,
) -> DeletionDecision {
    match candidate {
        None => DeletionDecision::keep(DecisionReason::Active),
        Some(reason) if has_unpushed_commits && !config.force_delete_unpushed => DeletionDecision {
            should_remove: false,
            reason: DecisionReason::UnpushedCommits,
            overridden: Some(reason),
        },
        Some(reason) => DeletionDecision::remove(reason),
    }
}

/// Decide whether a linked worktree (and its branch) should be removed.
pub fn decide_worktree(
    facts: &WorktreeFacts,
    config: &CleanupConfig,
    default_branch: &str,
) -> DeletionDecision {
    if facts.locked {
        return DeletionDecision::keep(DecisionReason::Locked);
    }
    if facts.branch.is_none() {
        return DeletionDecision::keep(DecisionReason::DetachedHead);
    }

    let candidate = if facts.has_upstream && !facts.remote_exists {
        Some(DecisionReason::RemoteBranchDeleted)
    } else if facts.merged_into_default {
        Some(DecisionReason::MergedInto(default_branch.to_string()))
    } else if let Some(reason) = pr_rule(facts.pr_status, config) {
        Some(reason)
    } else if config.cleanup_clean_worktrees && facts.is_clean {
        Some(DecisionReason::CleanWorktree)
    } else {
        None
    };

    apply_safety_override(candidate, facts.has_unpushed_commits(), config)
}

/// Decide whether a local branch without a worktree should be force-deleted
/// on PR grounds. Merged-into-default branches are handled by the separate
/// safe-delete sweep.
pub fn decide_branch(facts: &BranchFacts, config: &CleanupConfig) -> DeletionDecision {
    apply_safety_override(
        pr_rule(facts.pr_status, config),
        facts.has_unpushed_commits,
        config,
    )
}
