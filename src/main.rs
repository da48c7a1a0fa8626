//! git-cleanup CLI entry point

use std::path::PathBuf;

use clap::Parser;

use git_cleanup::cli::commands::{print_summary, run_cleanup};
use git_cleanup::cli::Output;
use git_cleanup::core::config::{self, detect_trash_command, parse_bool, CleanupConfig};
use git_cleanup::platform::{GhCli, NoPrLookup, PrLookup};
use git_cleanup::telemetry::{init_telemetry, TelemetryConfig};

const LONG_ABOUT: &str = "\
Remove finished worktrees and branches from every git repository directly
under DIRECTORY (default: $HOME/git).

For each repository: fetch with --prune, remove linked worktrees whose branch
is gone from origin, merged into the default branch, or has a merged or closed
pull request, delete merged local branches, prune stale remote-tracking refs,
report stale pull requests, then check out the default branch, pull, and clear
stashes when the main checkout has no local changes.

Worktrees and branches with unpushed commits are always kept unless
FORCE_DELETE_UNPUSHED is set.";

/// Shown for both `-h` and `--help`
const ENV_HELP: &str = "\
Environment:
  DRY_RUN=true                  Print intended actions, change nothing
  CHECK_PRS=false               Skip pull request lookups (needs gh; default true)
  CLEANUP_CLOSED_PRS=false      Keep branches whose PR was closed unmerged (default true)
  CLEANUP_CLEAN_WORKTREES=true  Remove worktrees with no changes and no commits ahead
  FORCE_DELETE_UNPUSHED=true    Remove even when commits were never pushed
  STALE_PR_DAYS=N               Days without activity before a PR is stale (default 21)
  SHOW_SUMMARY=true             List branches and PRs before and after each repository
  VERBOSE=true                  Report kept worktrees and no-op steps
  NO_COLOR=1                    Disable colored output
  DEFAULT_BRANCH=NAME           Use NAME instead of resolving origin/HEAD
  RUST_LOG=git_cleanup=debug    Diagnostic logging on stderr";

#[derive(Parser)]
#[command(name = "git-cleanup")]
#[command(version, about = "Clean up merged worktrees and branches across repositories")]
#[command(long_about = LONG_ABOUT, after_help = ENV_HELP)]
struct Cli {
    /// Directory containing the repositories [default: $HOME/git]
    directory: Option<PathBuf>,

    /// Print intended actions without changing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Report kept worktrees and no-op steps
    #[arg(short, long)]
    verbose: bool,

    /// Default branch to use instead of resolving origin/HEAD
    #[arg(long, value_name = "NAME")]
    default_branch: Option<String>,
}

fn default_root() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
    home.join("git")
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(false)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = cli.verbose || env_flag(config::VERBOSE);
    let no_color = std::env::var_os(config::NO_COLOR).is_some_and(|v| !v.is_empty());

    let mut telemetry = if verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if no_color {
        telemetry = telemetry.without_colors();
        Output::disable_colors();
    }
    let _guard = init_telemetry(&telemetry)?;

    let mut config = CleanupConfig::from_env();
    config.dry_run |= cli.dry_run;
    config.verbose |= cli.verbose;
    if let Some(branch) = cli.default_branch {
        config.default_branch_override = Some(branch);
    }
    config.trash_command = detect_trash_command();

    let gh = if config.check_prs { GhCli::detect() } else { None };
    if config.check_prs && gh.is_none() {
        Output::info("gh not found on PATH, skipping pull request checks");
        config.check_prs = false;
    }
    let lookup: Box<dyn PrLookup> = match gh {
        Some(gh) => Box::new(gh),
        None => Box::new(NoPrLookup),
    };

    let root = cli.directory.unwrap_or_else(default_root);
    let summary = match run_cleanup(&root, &config, lookup.as_ref()) {
        Ok(summary) => summary,
        Err(e) => {
            Output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    print_summary(&summary, &config);

    if summary.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
