//! Repository synchronization
//!
//! Puts the main checkout back on the default branch, pulls, and clears the
//! stash list. Skipped entirely when the main checkout has local changes.

use crate::cli::context::RepoContext;
use crate::cli::output::Output;
use crate::core::RepoOutcome;
use crate::git::{
    checkout_branch, clear_stashes, get_current_branch, has_uncommitted_changes, open_repo,
    pull_latest, stash_count,
};

/// Sync the main checkout of one repository
pub fn run_sync(ctx: &RepoContext, outcome: &mut RepoOutcome) {
    let repo = ctx.repo;

    match has_uncommitted_changes(&repo.path) {
        Ok(false) => {}
        Ok(true) => {
            Output::warning("Uncommitted changes present, skipping checkout, pull and stash clear");
            return;
        }
        Err(e) => {
            Output::warning(&format!("Could not read working tree status, skipping sync: {}", e));
            return;
        }
    }

    let on_default = ensure_default_branch(ctx, outcome);
    if on_default {
        pull(ctx, outcome);
    }
    clear_stash_list(ctx, outcome);
}

/// Returns whether the main checkout is (or in dry-run, would be) on the
/// default branch.
fn ensure_default_branch(ctx: &RepoContext, outcome: &mut RepoOutcome) -> bool {
    let repo = ctx.repo;
    let current = open_repo(&repo.path).and_then(|r| get_current_branch(&r));

    match current {
        Ok(Some(branch)) if branch == repo.default_branch => return true,
        Ok(_) => {}
        Err(e) => {
            Output::warning(&format!("Could not read current branch: {}", e));
        }
    }

    if ctx.dry_run() {
        Output::dry_run(&format!(
            "Would check out {}",
            Output::branch_name(&repo.default_branch)
        ));
        outcome.checked_out_default = true;
        return true;
    }

    match checkout_branch(&repo.path, &repo.default_branch) {
        Ok(()) => {
            outcome.checked_out_default = true;
            Output::success(&format!(
                "Checked out {}",
                Output::branch_name(&repo.default_branch)
            ));
            true
        }
        Err(e) => {
            Output::error(&format!(
                "Failed to check out {}: {}",
                repo.default_branch, e
            ));
            outcome.record_error(format!("checkout {}: {}", repo.default_branch, e));
            false
        }
    }
}

fn pull(ctx: &RepoContext, outcome: &mut RepoOutcome) {
    let repo = ctx.repo;

    if ctx.dry_run() {
        Output::dry_run(&format!(
            "Would pull {}",
            Output::branch_name(&repo.default_branch)
        ));
        return;
    }

    match pull_latest(&repo.path) {
        Ok(result) if result.updated => {
            outcome.pulled_updates = true;
            Output::success(&format!(
                "Pulled latest {}",
                Output::branch_name(&repo.default_branch)
            ));
        }
        Ok(_) => {
            if ctx.verbose() {
                Output::info("Already up to date");
            }
        }
        Err(e) => {
            Output::error(&format!("Pull failed: {}", e));
            outcome.record_error(format!("pull: {}", e));
        }
    }
}

fn clear_stash_list(ctx: &RepoContext, outcome: &mut RepoOutcome) {
    let repo = ctx.repo;

    let count = match stash_count(&repo.path) {
        Ok(0) => return,
        Ok(n) => n,
        Err(e) => {
            Output::warning(&format!("Could not list stashes: {}", e));
            return;
        }
    };

    if ctx.dry_run() {
        Output::dry_run(&format!("Would clear {} stash entr(ies)", count));
        outcome.stashes_cleared += count;
        return;
    }

    match clear_stashes(&repo.path) {
        Ok(()) => {
            outcome.stashes_cleared += count;
            Output::success(&format!("Cleared {} stash entr(ies)", count));
        }
        Err(e) => {
            Output::error(&format!("Failed to clear stashes: {}", e));
            outcome.record_error(format!("stash clear: {}", e));
        }
    }
}
