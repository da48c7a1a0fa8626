//! Run configuration
//!
//! Every option is read once at startup from environment variables and is
//! immutable afterwards. CLI flags can only switch options on.

use std::path::PathBuf;
use tracing::warn;

pub const DRY_RUN: &str = "DRY_RUN";
pub const CHECK_PRS: &str = "CHECK_PRS";
pub const CLEANUP_CLOSED_PRS: &str = "CLEANUP_CLOSED_PRS";
pub const CLEANUP_CLEAN_WORKTREES: &str = "CLEANUP_CLEAN_WORKTREES";
pub const FORCE_DELETE_UNPUSHED: &str = "FORCE_DELETE_UNPUSHED";
pub const STALE_PR_DAYS: &str = "STALE_PR_DAYS";
pub const SHOW_SUMMARY: &str = "SHOW_SUMMARY";
pub const VERBOSE: &str = "VERBOSE";
pub const NO_COLOR: &str = "NO_COLOR";
pub const DEFAULT_BRANCH: &str = "DEFAULT_BRANCH";

/// Default inactivity threshold for stale PR warnings
pub const DEFAULT_STALE_PR_DAYS: u64 = 21;

/// Options for one cleanup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupConfig {
    /// Report intended actions without mutating anything
    pub dry_run: bool,
    /// Look up pull request state
    pub check_prs: bool,
    /// Closed-without-merge PRs make a branch removable
    pub cleanup_closed_prs: bool,
    /// Clean but unmerged worktrees are removable
    pub cleanup_clean_worktrees: bool,
    /// Disable the unpushed-commits safety override
    pub force_delete_unpushed: bool,
    /// Inactivity threshold for stale PR warnings
    pub stale_pr_days: u64,
    /// Print branch/PR listings before and after each repository
    pub show_summary: bool,
    /// Print detail for kept worktrees and no-op stages
    pub verbose: bool,
    /// Disable ANSI colors
    pub no_color: bool,
    /// Use this default branch instead of resolving origin/HEAD
    pub default_branch_override: Option<String>,
    /// Trash utility preferred over recursive delete
    pub trash_command: Option<PathBuf>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            check_prs: true,
            cleanup_closed_prs: true,
            cleanup_clean_worktrees: false,
            force_delete_unpushed: false,
            stale_pr_days: DEFAULT_STALE_PR_DAYS,
            show_summary: false,
            verbose: false,
            no_color: false,
            default_branch_override: None,
            trash_command: None,
        }
    }
}

impl CleanupConfig {
    /// Build a config from a variable lookup, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |name: &str, default: bool| -> bool {
            match lookup(name) {
                None => default,
                Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                    warn!(variable = name, value = %raw, "unrecognized boolean, using default");
                    default
                }),
            }
        };

        let stale_pr_days = match lookup(STALE_PR_DAYS) {
            None => defaults.stale_pr_days,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(variable = STALE_PR_DAYS, value = %raw, "not a number, using default");
                defaults.stale_pr_days
            }),
        };

        Self {
            dry_run: flag(DRY_RUN, defaults.dry_run),
            check_prs: flag(CHECK_PRS, defaults.check_prs),
            cleanup_closed_prs: flag(CLEANUP_CLOSED_PRS, defaults.cleanup_closed_prs),
            cleanup_clean_worktrees: flag(CLEANUP_CLEAN_WORKTREES, defaults.cleanup_clean_worktrees),
            force_delete_unpushed: flag(FORCE_DELETE_UNPUSHED, defaults.force_delete_unpushed),
            stale_pr_days,
            show_summary: flag(SHOW_SUMMARY, defaults.show_summary),
            verbose: flag(VERBOSE, defaults.verbose),
            no_color: lookup(NO_COLOR).is_some_and(|v| !v.is_empty()),
            default_branch_override: lookup(DEFAULT_BRANCH)
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
            trash_command: None,
        }
    }

    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Parse `true/false/1/0/yes/no/on/off`, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Locate a trash utility on `PATH`.
pub fn detect_trash_command() -> Option<PathBuf> {
    which::which("trash").ok()
}
