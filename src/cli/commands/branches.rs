//! Local branch sweep
//!
//! Runs after the worktree sweep. Finishes branch deletions an earlier run
//! left half done, then deletes branches merged into the default branch, then
//! force-deletes branches whose pull request was merged or closed.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::cli::context::RepoContext;
use crate::cli::output::Output;
use crate::core::inspect::inspect_branch;
use crate::core::policy::{decide_branch, DecisionReason};
use crate::core::RepoOutcome;
use crate::git::{
    self, branch_exists, cleanup_pending_branches, clear_cleanup_pending, delete_local_branch,
    list_local_branches, list_worktrees, merged_branches, GitError,
};

/// Branches the sweep must never touch: the default branch, the branch the
/// main checkout is on, and anything checked out in a worktree.
fn protected_branches(ctx: &RepoContext) -> HashSet<String> {
    let repo = ctx.repo;
    let mut protected = HashSet::new();
    protected.insert(repo.default_branch.clone());

    match git::open_repo(&repo.path).and_then(|r| git::get_current_branch(&r)) {
        Ok(Some(current)) => {
            protected.insert(current);
        }
        Ok(None) => {}
        Err(e) => debug!(repo = %repo.name, error = %e, "could not read current branch"),
    }

    match list_worktrees(&repo.path) {
        Ok(worktrees) => {
            protected.extend(worktrees.into_iter().filter_map(|w| w.branch));
        }
        Err(e) => warn!(repo = %repo.name, error = %e, "could not list worktrees"),
    }

    protected
}

/// Run the branch sweep for one repository
pub fn run_branch_sweep(ctx: &RepoContext, outcome: &mut RepoOutcome) {
    let protected = protected_branches(ctx);

    complete_pending_deletions(ctx, &protected, outcome);

    let mut handled = HashSet::new();
    sweep_merged_branches(ctx, &protected, &mut handled, outcome);

    if ctx.prs.is_empty() {
        return;
    }
    sweep_pr_branches(ctx, &protected, &handled, outcome);
}

/// Delete branches whose worktree removal finished but whose own deletion
/// did not.
fn complete_pending_deletions(
    ctx: &RepoContext,
    protected: &HashSet<String>,
    outcome: &mut RepoOutcome,
) {
    let repo = ctx.repo;
    let pending = match cleanup_pending_branches(&repo.path) {
        Ok(p) => p,
        Err(e) => {
            warn!(repo = %repo.name, error = %e, "could not read pending branch deletions");
            return;
        }
    };

    for (branch, reason) in pending {
        if protected.contains(&branch) || !branch_exists(&repo.path, &branch) {
            // The worktree is still alive or the branch is already gone
            if !ctx.dry_run() {
                if let Err(e) = clear_cleanup_pending(&repo.path, &branch) {
                    debug!(branch = %branch, error = %e, "could not clear stale pending marker");
                }
            }
            continue;
        }

        if ctx.dry_run() {
            Output::dry_run(&format!(
                "Would finish deleting branch {} [{}]",
                Output::branch_name(&branch),
                reason
            ));
            outcome.branches_deleted += 1;
            continue;
        }

        match delete_local_branch(&repo.path, &branch, true) {
            Ok(()) => {
                outcome.branches_deleted += 1;
                Output::success(&format!(
                    "Finished deleting branch {} [{}]",
                    Output::branch_name(&branch),
                    reason
                ));
            }
            Err(e) => {
                Output::error(&format!("Failed to delete branch {}: {}", branch, e));
                outcome.record_error(format!("delete branch {}: {}", branch, e));
            }
        }
    }
}

/// Safe-delete (`-d`) every branch merged into `origin/<default>`.
fn sweep_merged_branches(
    ctx: &RepoContext,
    protected: &HashSet<String>,
    handled: &mut HashSet<String>,
    outcome: &mut RepoOutcome,
) {
    let repo = ctx.repo;
    let target = repo.remote_default_ref();
    let merged = match merged_branches(&repo.path, &target) {
        Ok(m) => m,
        Err(e) => {
            Output::warning(&format!("Could not list branches merged into {}: {}", target, e));
            return;
        }
    };

    let reason = DecisionReason::MergedInto(repo.default_branch.clone());
    for branch in merged.into_iter().filter(|b| !protected.contains(b)) {
        if ctx.dry_run() {
            Output::dry_run(&format!(
                "Would delete branch {} [{}]",
                Output::branch_name(&branch),
                reason
            ));
            outcome.branches_deleted += 1;
            handled.insert(branch);
            continue;
        }

        match delete_local_branch(&repo.path, &branch, false) {
            Ok(()) => {
                outcome.branches_deleted += 1;
                Output::success(&format!(
                    "Deleted branch {} [{}]",
                    Output::branch_name(&branch),
                    reason
                ));
            }
            // `-d` refusing is the safety net doing its job
            Err(GitError::OperationFailed(msg)) if msg.contains("not fully merged") => {
                Output::warning(&format!("Skipping branch {}: {}", branch, msg));
            }
            Err(e) => {
                Output::error(&format!("Failed to delete branch {}: {}", branch, e));
                outcome.record_error(format!("delete branch {}: {}", branch, e));
            }
        }
        handled.insert(branch);
    }
}

/// Force-delete (`-D`) branches whose pull request says they are done.
fn sweep_pr_branches(
    ctx: &RepoContext,
    protected: &HashSet<String>,
    handled: &HashSet<String>,
    outcome: &mut RepoOutcome,
) {
    let repo = ctx.repo;
    let branches = match list_local_branches(&repo.path) {
        Ok(b) => b,
        Err(e) => {
            Output::warning(&format!("Could not list local branches: {}", e));
            return;
        }
    };

    for branch in branches
        .iter()
        .filter(|b| !protected.contains(*b) && !handled.contains(*b))
    {
        let facts = inspect_branch(repo, branch, ctx.prs);
        let decision = decide_branch(&facts, ctx.config);
        debug!(repo = %repo.name, branch = %branch, ?decision, "branch decision");

        if !decision.should_remove {
            if let Some(would_be) = &decision.overridden {
                Output::warning(&format!(
                    "Keeping branch {}: {} (otherwise removable: {})",
                    Output::branch_name(branch),
                    decision.reason,
                    would_be
                ));
            }
            continue;
        }

        if ctx.dry_run() {
            Output::dry_run(&format!(
                "Would force-delete branch {} [{}]",
                Output::branch_name(branch),
                decision.reason
            ));
            outcome.branches_deleted += 1;
            continue;
        }

        match delete_local_branch(&repo.path, branch, true) {
            Ok(()) => {
                outcome.branches_deleted += 1;
                Output::success(&format!(
                    "Deleted branch {} [{}]",
                    Output::branch_name(branch),
                    decision.reason
                ));
            }
            Err(e) => {
                Output::error(&format!("Failed to delete branch {}: {}", branch, e));
                outcome.record_error(format!("delete branch {}: {}", branch, e));
            }
        }
    }
}
