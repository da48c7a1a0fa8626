//! Cleanup driver
//!
//! Walks every repository under the root directory and runs the stages in a
//! fixed order: worktrees, branches, remote refs, stale PRs, sync. A failure
//! inside one repository is recorded and the run moves on.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::cli::context::RepoContext;
use crate::cli::output::{Output, Table};
use crate::core::{
    scan_repositories, CleanupConfig, DefaultBranchSource, RepoInfo, RepoOutcome, RunSummary,
};
use crate::git::{fetch_prune, linked_worktrees, list_local_branches, ORIGIN};
use crate::platform::{PrIndex, PrLookup};

use super::branches::run_branch_sweep;
use super::prune::run_remote_prune;
use super::stale::run_stale_report;
use super::sync::run_sync;
use super::worktrees::run_worktree_sweep;

/// Clean every repository directly under `root`.
///
/// Only a missing or unreadable root is an error; everything that goes wrong
/// inside a repository ends up in the returned summary.
pub fn run_cleanup(
    root: &Path,
    config: &CleanupConfig,
    lookup: &dyn PrLookup,
) -> anyhow::Result<RunSummary> {
    if !root.is_dir() {
        anyhow::bail!("Directory not found: {}", root.display());
    }

    let repos = scan_repositories(root)?;
    info!(root = %root.display(), count = repos.len(), "scanned repositories");

    if config.dry_run {
        Output::header("Dry run: nothing will be changed");
    }

    let mut summary = RunSummary::new();
    for path in &repos {
        summary.record(run_repository(path, config, lookup));
    }

    Ok(summary)
}

/// Run every stage against one repository.
pub fn run_repository(path: &Path, config: &CleanupConfig, lookup: &dyn PrLookup) -> RepoOutcome {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Output::header(&format!("Processing {}", Output::repo_name(&name)));

    let mut outcome = RepoOutcome::new(&name);

    refresh_remote(path, config);

    let repo = match RepoInfo::discover(path, config.default_branch_override.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            Output::error(&format!("{}: {}", name, e));
            outcome.record_error(e.to_string());
            return outcome;
        }
    };

    match repo.default_branch_source {
        DefaultBranchSource::Fallback => Output::warning(&format!(
            "Could not resolve {}/HEAD, assuming default branch {} (set DEFAULT_BRANCH or --default-branch to override)",
            ORIGIN,
            Output::branch_name(&repo.default_branch)
        )),
        _ if config.verbose => Output::kv("default branch", &repo.default_branch),
        _ => {}
    }

    let prs = load_pull_requests(&repo, config, lookup);
    let ctx = RepoContext {
        repo: &repo,
        config,
        prs: &prs,
    };

    if config.show_summary {
        print_repo_listing(&ctx, "Before cleanup");
    }

    run_worktree_sweep(&ctx, &mut outcome);
    run_branch_sweep(&ctx, &mut outcome);
    run_remote_prune(&ctx, &mut outcome);
    run_stale_report(&ctx, &mut outcome);
    run_sync(&ctx, &mut outcome);

    if config.show_summary {
        print_repo_listing(&ctx, "After cleanup");
    }

    if !outcome.changed() && config.verbose {
        Output::info("Nothing to do");
    }
    debug!(repo = %repo.name, ?outcome, "repository done");
    outcome
}

/// `git fetch --prune origin`, best-effort. Dry-run leaves refs alone.
fn refresh_remote(path: &Path, config: &CleanupConfig) {
    if config.dry_run {
        debug!(repo = %path.display(), "dry-run, skipping fetch");
        return;
    }

    let spinner = Output::spinner(&format!("Fetching {}...", ORIGIN));
    let result = fetch_prune(path);
    spinner.finish_and_clear();

    if let Err(e) = result {
        Output::warning(&format!("Fetch failed, continuing with local state: {}", e));
    }
}

/// One batched lookup per repository. Any failure degrades to "no PRs".
fn load_pull_requests(repo: &RepoInfo, config: &CleanupConfig, lookup: &dyn PrLookup) -> PrIndex {
    if !config.check_prs {
        return PrIndex::empty();
    }

    let Some(url) = repo.remote_url.as_deref() else {
        debug!(repo = %repo.name, "no origin remote, skipping PR lookup");
        return PrIndex::empty();
    };
    if !lookup.supports_remote(url) {
        debug!(repo = %repo.name, url, lookup = lookup.name(), "remote not supported, skipping PR lookup");
        return PrIndex::empty();
    }

    match lookup.pull_requests(&repo.path) {
        Ok(index) => {
            debug!(repo = %repo.name, count = index.len(), "loaded pull requests");
            index
        }
        Err(e) => {
            warn!(repo = %repo.name, error = %e, "PR lookup failed");
            Output::warning(&format!("PR lookup via {} failed: {}", lookup.name(), e));
            PrIndex::empty()
        }
    }
}

/// Branch and worktree listing printed around the stages (`SHOW_SUMMARY`)
fn print_repo_listing(ctx: &RepoContext, title: &str) {
    let repo = ctx.repo;
    Output::subheader(title);

    let worktrees = linked_worktrees(&repo.path).unwrap_or_default();
    let branches = match list_local_branches(&repo.path) {
        Ok(b) => b,
        Err(e) => {
            Output::warning(&format!("Could not list local branches: {}", e));
            return;
        }
    };

    let mut table = Table::new(vec!["Branch", "PR", "Worktree"]);
    for branch in &branches {
        // Plain text so column widths line up
        let pr = match ctx.prs.get(branch) {
            Some(info) => format!("{} {}", info.status, info.label()),
            None => ctx.prs.status(branch).to_string(),
        };
        let worktree = worktrees
            .iter()
            .find(|w| w.branch.as_deref() == Some(branch.as_str()))
            .map(|w| w.path.display().to_string())
            .unwrap_or_default();
        table.add_row(vec![branch.clone(), pr, worktree]);
    }

    if table.is_empty() {
        Output::info("No local branches");
    } else {
        table.print();
    }
}

/// Final report across all repositories
pub fn print_summary(summary: &RunSummary, config: &CleanupConfig) {
    Output::header("Summary");

    let verb = if config.dry_run { "would be" } else { "were" };
    Output::kv("repositories", &summary.repo_count().to_string());
    Output::kv(
        &format!("worktrees that {} removed", verb),
        &summary.worktrees_removed().to_string(),
    );
    Output::kv(
        &format!("branches that {} deleted", verb),
        &summary.branches_deleted().to_string(),
    );

    if !summary.changed().is_empty() {
        Output::subheader("Changed");
        for name in summary.changed() {
            Output::list_item(name);
        }
    }
    if !summary.unchanged().is_empty() {
        Output::subheader("Unchanged");
        for name in summary.unchanged() {
            Output::list_item(name);
        }
    }

    if !summary.stale_prs().is_empty() {
        Output::subheader(&format!(
            "Stale PRs (no activity for {}+ days)",
            config.stale_pr_days
        ));
        for pr in summary.stale_prs() {
            Output::list_item(&pr.summary_line());
        }
    }

    if summary.has_failures() {
        Output::subheader("Failures");
        for (repo, message) in summary.failures() {
            Output::error(&format!("{}: {}", repo, message));
        }
    } else if config.dry_run {
        Output::info("Dry run complete, re-run without DRY_RUN to apply");
    } else {
        Output::success("Cleanup complete");
    }
}
