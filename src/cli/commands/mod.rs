//! Cleanup stages and the driver that runs them

pub mod branches;
pub mod cleanup;
pub mod prune;
pub mod stale;
pub mod sync;
pub mod worktrees;

pub use cleanup::{print_summary, run_cleanup, run_repository};
