//! GitHub pull request lookups through the `gh` CLI

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use super::traits::{PlatformError, PrLookup};
use super::types::{parse_gh_pr_list, PrIndex};
use crate::util::log_cmd;

/// Upper bound on PRs fetched per repository
const PR_LIST_LIMIT: &str = "1000";

/// Fields requested from `gh pr list`
const PR_LIST_FIELDS: &str = "number,title,url,state,headRefName,updatedAt";

/// Whether a remote URL points at github.com (HTTPS, SSH or scp-style).
pub fn is_github_remote(url: &str) -> bool {
    let url = url.trim().to_lowercase();
    url.starts_with("git@github.com:")
        || url.starts_with("ssh://git@github.com/")
        || url.starts_with("https://github.com/")
        || url.starts_with("http://github.com/")
        || url.contains("@github.com/")
}

/// `gh` CLI adapter
#[derive(Debug, Clone)]
pub struct GhCli {
    program: PathBuf,
}

impl GhCli {
    /// Locate `gh` on `PATH`.
    pub fn detect() -> Option<Self> {
        which::which("gh").ok().map(|program| Self { program })
    }

    /// Use a specific `gh` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PrLookup for GhCli {
    fn name(&self) -> &str {
        "gh"
    }

    fn supports_remote(&self, url: &str) -> bool {
        is_github_remote(url)
    }

    fn pull_requests(&self, repo_path: &Path) -> Result<PrIndex, PlatformError> {
        let mut cmd = Command::new(&self.program);
        cmd.args([
            "pr",
            "list",
            "--state",
            "all",
            "--limit",
            PR_LIST_LIMIT,
            "--json",
            PR_LIST_FIELDS,
        ])
        .current_dir(repo_path)
        .env("GH_PROMPT_DISABLED", "1");
        log_cmd(&cmd);

        let output = cmd
            .output()
            .map_err(|e| PlatformError::Unavailable(format!("failed to run gh: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlatformError::CommandFailed(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let prs = parse_gh_pr_list(&stdout)?;
        debug!(repo = %repo_path.display(), count = prs.len(), "fetched pull requests");
        Ok(PrIndex::from_pull_requests(prs))
    }
}
