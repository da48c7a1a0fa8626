//! git-cleanup - remove finished worktrees and branches across many repositories
//!
//! Walks a directory of git repositories and, for each one, removes linked
//! worktrees and local branches whose work is merged, closed or gone from the
//! remote, without ever discarding unpushed commits.

pub mod cli;
pub mod core;
pub mod git;
pub mod platform;
pub mod telemetry;
pub mod util;

pub use core::config::CleanupConfig;
pub use core::repo::RepoInfo;
pub use core::summary::RunSummary;
