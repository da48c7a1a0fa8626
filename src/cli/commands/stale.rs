//! Stale pull request report
//!
//! Purely informational: flags open pull requests with no activity for at
//! least the configured number of days.

use chrono::{DateTime, Utc};

use crate::cli::context::RepoContext;
use crate::cli::output::Output;
use crate::core::{RepoOutcome, StalePr};
use crate::git::list_local_branches;
use crate::platform::{PrIndex, PrStatus};

/// Whole days between `updated` and `now`, never negative.
pub fn days_inactive(updated: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - updated).num_days().max(0)
}

/// Open pull requests on `branches` inactive for `threshold_days` or more.
pub fn collect_stale_prs(
    repo_name: &str,
    branches: &[String],
    prs: &PrIndex,
    threshold_days: u64,
    now: DateTime<Utc>,
) -> Vec<StalePr> {
    let threshold = i64::try_from(threshold_days).unwrap_or(i64::MAX);

    branches
        .iter()
        .filter_map(|branch| {
            let pr = prs.get(branch)?;
            if pr.status != PrStatus::Open {
                return None;
            }
            let days = days_inactive(pr.updated_at, now);
            (days >= threshold).then(|| StalePr {
                repo: repo_name.to_string(),
                branch: branch.clone(),
                days_inactive: days,
                pr_info: pr.label(),
            })
        })
        .collect()
}

/// Report stale pull requests for one repository
pub fn run_stale_report(ctx: &RepoContext, outcome: &mut RepoOutcome) {
    if ctx.prs.is_empty() {
        return;
    }

    let branches = match list_local_branches(&ctx.repo.path) {
        Ok(b) => b,
        Err(e) => {
            Output::warning(&format!("Could not list local branches: {}", e));
            return;
        }
    };

    let stale = collect_stale_prs(
        &ctx.repo.name,
        &branches,
        ctx.prs,
        ctx.config.stale_pr_days,
        Utc::now(),
    );

    for pr in &stale {
        Output::warning(&format!(
            "Stale PR on {}: {} ({} days without activity)",
            Output::branch_name(&pr.branch),
            pr.pr_info,
            pr.days_inactive
        ));
    }
    outcome.stale_prs.extend(stale);
}
