//! Remote-tracking ref pruning
//!
//! Asks `git remote prune origin --dry-run` what is stale and prunes only
//! when there is something to prune. Failures here never fail the run.

use crate::cli::context::RepoContext;
use crate::cli::output::Output;
use crate::core::RepoOutcome;
use crate::git::{prunable_remote_refs, prune_remote, ORIGIN};

/// Prune stale `origin/*` refs for one repository
pub fn run_remote_prune(ctx: &RepoContext, outcome: &mut RepoOutcome) {
    let repo = ctx.repo;

    let stale = match prunable_remote_refs(&repo.path) {
        Ok(refs) => refs,
        Err(e) => {
            Output::warning(&format!("Could not list prunable refs on {}: {}", ORIGIN, e));
            return;
        }
    };

    if stale.is_empty() {
        if ctx.verbose() {
            Output::info("No stale remote-tracking refs");
        }
        return;
    }

    if ctx.dry_run() {
        Output::dry_run(&format!("Would prune {} remote-tracking ref(s):", stale.len()));
        for r in &stale {
            Output::list_item(r);
        }
        outcome.refs_pruned += stale.len();
        return;
    }

    match prune_remote(&repo.path) {
        Ok(()) => {
            outcome.refs_pruned += stale.len();
            Output::success(&format!("Pruned {} remote-tracking ref(s)", stale.len()));
        }
        Err(e) => Output::warning(&format!("git remote prune {} failed: {}", ORIGIN, e)),
    }
}
