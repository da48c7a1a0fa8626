//! Pull request status from the hosting platform
//!
//! Only GitHub is supported, through the `gh` CLI. Everything downstream
//! works on the typed [`PrStatus`] and never sees gh's raw strings.

pub mod github;
pub mod traits;
pub mod types;

pub use github::{is_github_remote, GhCli};
pub use traits::{NoPrLookup, PlatformError, PrLookup};
pub use types::{parse_gh_pr_list, PrIndex, PrStatus, PullRequestInfo};
