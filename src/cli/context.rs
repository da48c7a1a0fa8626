//! Per-repository context passed to every cleanup stage

use crate::core::{CleanupConfig, RepoInfo};
use crate::platform::PrIndex;

/// State shared by the stages run against one repository.
///
/// Built once per repository after the remote state is refreshed, then
/// passed by reference to each stage in turn.
pub struct RepoContext<'a> {
    pub repo: &'a RepoInfo,
    pub config: &'a CleanupConfig,
    /// Pull requests for this repository, fetched once
    pub prs: &'a PrIndex,
}

impl RepoContext<'_> {
    pub fn dry_run(&self) -> bool {
        self.config.dry_run
    }

    pub fn verbose(&self) -> bool {
        self.config.verbose
    }
}
