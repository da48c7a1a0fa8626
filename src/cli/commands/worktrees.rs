//! Worktree sweep
//!
//! Inspects every linked worktree, asks the deletion policy, and removes the
//! worktree and its branch when told to. Removal is two-phase: the branch is
//! marked `cleanupPending` before the worktree goes, so a run interrupted
//! between the two steps is finished by the branch sweep next time.

use tracing::{debug, warn};

use crate::cli::context::RepoContext;
use crate::cli::output::Output;
use crate::core::inspect::{inspect_worktree, WorktreeFacts};
use crate::core::policy::{decide_worktree, DecisionReason, DeletionDecision};
use crate::core::RepoOutcome;
use crate::git::{
    clear_cleanup_pending, delete_local_branch, linked_worktrees, mark_cleanup_pending,
    prune_worktrees, remove_worktree, WorktreeEntry,
};
use crate::util::{remove_dir_preferring_trash, RemovalMethod};

/// Terminal state of one visited worktree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapResult {
    Kept,
    Removed,
    /// Dry-run: would have been removed
    WouldRemove,
    RemoveFailed,
}

/// Run the worktree sweep for one repository
pub fn run_worktree_sweep(ctx: &RepoContext, outcome: &mut RepoOutcome) {
    let repo = ctx.repo;

    let mut worktrees = match linked_worktrees(&repo.path) {
        Ok(w) => w,
        Err(e) => {
            Output::error(&format!("{}: could not list worktrees: {}", repo.name, e));
            outcome.record_error(format!("list worktrees: {}", e));
            return;
        }
    };

    let stale_records = worktrees.iter().filter(|w| w.prunable && !w.locked).count();
    if stale_records > 0 {
        worktrees = prune_stale_records(ctx, worktrees, stale_records);
    }

    if worktrees.is_empty() {
        if ctx.verbose() {
            Output::info("No linked worktrees");
        }
        return;
    }

    for entry in &worktrees {
        if sweep_worktree(ctx, entry, outcome) == ReapResult::Kept {
            outcome.worktrees_kept += 1;
        }
    }
}

/// Drop registry entries whose directory vanished, then list again.
fn prune_stale_records(
    ctx: &RepoContext,
    worktrees: Vec<WorktreeEntry>,
    count: usize,
) -> Vec<WorktreeEntry> {
    let repo = ctx.repo;

    if ctx.dry_run() {
        Output::dry_run(&format!(
            "Would prune {} worktree record(s) whose directory is missing",
            count
        ));
        return worktrees.into_iter().filter(|w| !w.prunable || w.locked).collect();
    }

    if let Err(e) = prune_worktrees(&repo.path) {
        Output::warning(&format!("git worktree prune failed: {}", e));
        return worktrees;
    }
    Output::success(&format!(
        "Pruned {} worktree record(s) whose directory is missing",
        count
    ));

    match linked_worktrees(&repo.path) {
        Ok(w) => w,
        Err(e) => {
            warn!(repo = %repo.name, error = %e, "re-listing worktrees failed");
            worktrees.into_iter().filter(|w| !w.prunable).collect()
        }
    }
}

/// Inspect, decide and act on a single worktree.
fn sweep_worktree(ctx: &RepoContext, entry: &WorktreeEntry, outcome: &mut RepoOutcome) -> ReapResult {
    let facts = inspect_worktree(ctx.repo, entry, ctx.prs);
    let decision = decide_worktree(&facts, ctx.config, &ctx.repo.default_branch);
    debug!(path = %facts.path.display(), ?decision, "worktree decision");

    if decision.should_remove {
        reap_worktree(ctx, &facts, &decision, outcome)
    } else {
        report_kept(ctx, &facts, &decision);
        ReapResult::Kept
    }
}

fn describe(facts: &WorktreeFacts) -> String {
    match facts.branch.as_deref() {
        Some(branch) => format!("{} ({})", facts.path.display(), Output::branch_name(branch)),
        None => facts.path.display().to_string(),
    }
}

fn report_kept(ctx: &RepoContext, facts: &WorktreeFacts, decision: &DeletionDecision) {
    match (&decision.reason, &decision.overridden) {
        (DecisionReason::UnpushedCommits, Some(would_be)) => {
            Output::warning(&format!(
                "Keeping worktree {}: {} (otherwise removable: {})",
                describe(facts),
                decision.reason,
                would_be
            ));
        }
        _ if ctx.verbose() => {
            Output::info(&format!(
                "Keeping worktree {}: {} (PR: {})",
                describe(facts),
                decision.reason,
                Output::pr_status(facts.pr_status)
            ));
        }
        _ => {}
    }
}

/// Remove a worktree and then its branch, or report what would happen.
pub fn reap_worktree(
    ctx: &RepoContext,
    facts: &WorktreeFacts,
    decision: &DeletionDecision,
    outcome: &mut RepoOutcome,
) -> ReapResult {
    let repo = ctx.repo;
    let Some(branch) = facts.branch.as_deref() else {
        return ReapResult::Kept;
    };
    let reason = decision.reason.to_string();

    if ctx.dry_run() {
        Output::dry_run(&format!("Would remove worktree {} [{}]", describe(facts), reason));
        Output::dry_run(&format!("Would delete branch {}", Output::branch_name(branch)));
        outcome.worktrees_removed += 1;
        outcome.branches_deleted += 1;
        return ReapResult::WouldRemove;
    }

    if let Err(e) = mark_cleanup_pending(&repo.path, branch, &reason) {
        warn!(repo = %repo.name, branch, error = %e, "could not record pending branch deletion");
    }

    if let Err(e) = remove_worktree(&repo.path, &facts.path, true) {
        debug!(error = %e, "git worktree remove failed, falling back to directory removal");
        let trash = ctx.config.trash_command.as_deref();
        match remove_dir_preferring_trash(&facts.path, trash) {
            Ok(method) => {
                if method == RemovalMethod::Trashed {
                    debug!(path = %facts.path.display(), "moved worktree to trash");
                }
                if let Err(e) = prune_worktrees(&repo.path) {
                    Output::warning(&format!("git worktree prune failed: {}", e));
                }
            }
            Err(io_err) => {
                Output::error(&format!(
                    "Failed to remove worktree {}: {} ({})",
                    describe(facts),
                    e,
                    io_err
                ));
                outcome.record_error(format!(
                    "remove worktree {}: {}",
                    facts.path.display(),
                    io_err
                ));
                if let Err(e) = clear_cleanup_pending(&repo.path, branch) {
                    debug!(error = %e, "could not clear pending marker");
                }
                return ReapResult::RemoveFailed;
            }
        }
    }

    outcome.worktrees_removed += 1;
    Output::success(&format!("Removed worktree {} [{}]", describe(facts), reason));

    match delete_local_branch(&repo.path, branch, true) {
        Ok(()) => {
            outcome.branches_deleted += 1;
            Output::success(&format!("Deleted branch {}", Output::branch_name(branch)));
        }
        Err(e) => {
            Output::error(&format!(
                "Failed to delete branch {}: {} (will retry next run)",
                branch, e
            ));
            outcome.record_error(format!("delete branch {}: {}", branch, e));
        }
    }

    ReapResult::Removed
}
