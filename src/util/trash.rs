//! Directory removal that prefers the OS trash

use std::io;
use std::path::Path;
use std::process::Command;
use tracing::warn;

use super::log_cmd;

/// How a directory was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMethod {
    /// Moved to the trash by the trash utility
    Trashed,
    /// Recursively deleted
    Deleted,
    /// Nothing was there to remove
    AlreadyGone,
}

/// Remove `path`, handing it to `trash` when given and falling back to a
/// recursive delete when there is no trash utility or it fails.
pub fn remove_dir_preferring_trash(path: &Path, trash: Option<&Path>) -> io::Result<RemovalMethod> {
    if !path.exists() {
        return Ok(RemovalMethod::AlreadyGone);
    }

    if let Some(program) = trash {
        let mut cmd = Command::new(program);
        cmd.arg(path);
        log_cmd(&cmd);
        match cmd.output() {
            Ok(output) if output.status.success() && !path.exists() => {
                return Ok(RemovalMethod::Trashed);
            }
            Ok(output) => {
                warn!(
                    path = %path.display(),
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "trash failed, deleting instead"
                );
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not run trash, deleting instead");
            }
        }
    }

    std::fs::remove_dir_all(path)?;
    Ok(RemovalMethod::Deleted)
}
