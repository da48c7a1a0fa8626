//! Core types: configuration, repository discovery, inspection, policy and
//! run summary

pub mod config;
pub mod inspect;
pub mod policy;
pub mod repo;
pub mod summary;

pub use config::CleanupConfig;
pub use inspect::{BranchFacts, UnpushedState, WorktreeFacts};
pub use policy::{decide_branch, decide_worktree, DecisionReason, DeletionDecision};
pub use repo::{scan_repositories, DefaultBranchSource, RepoInfo};
pub use summary::{RepoOutcome, RunSummary, StalePr};
