//! Local path validation

use crate::error::{ExplorerError, Result};
use crate::fetch::RepoContext;
use std::path::{Path, PathBuf};

/// Walk up from `start` looking for a `.git` directory.
///
/// Returns the first ancestor (or `start` itself) containing `.git`, or
/// `start` unchanged when none is found.
pub fn find_repo_root(start: &Path) -> PathBuf {
    let mut current = start.to_path_buf();
    loop {
        if current.join(".git").exists() {
            if current != start {
                tracing::info!(
                    root = %current.display(),
                    from = %start.display(),
                    "Using enclosing repository root"
                );
            }
            return current;
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }
    tracing::debug!(path = %start.display(), "No .git found; using path as repository root");
    start.to_path_buf()
}

/// Wrap an existing local directory as a non-temporary [`RepoContext`].
pub fn validate_local_path(path: &Path) -> Result<RepoContext> {
    let canonical = path.canonicalize().map_err(|e| ExplorerError::from_io(path, e))?;

    if !canonical.is_dir() {
        return Err(ExplorerError::invalid_input(format!(
            "Path is not a directory: {}",
            path.display()
        )));
    }

    Ok(RepoContext::new(find_repo_root(&canonical), false))
}
