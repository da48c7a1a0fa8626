//! Pull request lookup trait definition

use std::path::Path;
use thiserror::Error;

use super::types::PrIndex;

/// Errors that can occur during platform operations
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("CLI not available: {0}")]
    Unavailable(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Source of pull request state for the branches of one repository.
///
/// Called once per repository; implementations return every PR they can see
/// so callers never issue per-branch lookups.
pub trait PrLookup {
    /// Short name used in log and warning lines
    fn name(&self) -> &str;

    /// Whether this lookup can answer for a repository whose origin is `url`
    fn supports_remote(&self, url: &str) -> bool;

    /// Pull requests for the repository checked out at `repo_path`
    fn pull_requests(&self, repo_path: &Path) -> Result<PrIndex, PlatformError>;
}

/// Lookup used when PR checks are disabled: every branch reads as having no PR.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrLookup;

impl PrLookup for NoPrLookup {
    fn name(&self) -> &str {
        "disabled"
    }

    fn supports_remote(&self, _url: &str) -> bool {
        false
    }

    fn pull_requests(&self, _repo_path: &Path) -> Result<PrIndex, PlatformError> {
        Ok(PrIndex::empty())
    }
}
