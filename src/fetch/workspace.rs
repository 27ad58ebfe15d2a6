//! The scratch root that owns every checkout.

use crate::error::{ExplorerError, Result};
use std::path::{Component, Path, PathBuf};

/// Validates caller-supplied checkout paths against the scratch root.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a `repoPath` handed back by a client to a checkout directory.
    ///
    /// Relative paths are taken relative to the scratch root. The result must
    /// be an existing directory strictly below the root.
    pub fn resolve_checkout(&self, repo_path: &str) -> Result<PathBuf> {
        let trimmed = repo_path.trim();
        if trimmed.is_empty() {
            return Err(ExplorerError::invalid_input("Missing repoPath parameter"));
        }

        let candidate = Path::new(trimmed);
        if candidate.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(ExplorerError::invalid_path(format!(
                "repoPath must not contain '..': {trimmed}"
            )));
        }
        let candidate =
            if candidate.is_absolute() { candidate.to_path_buf() } else { self.root.join(candidate) };

        let root = self.root.canonicalize().map_err(|e| ExplorerError::from_io(&self.root, e))?;
        let resolved = candidate.canonicalize().map_err(|e| ExplorerError::from_io(trimmed, e))?;

        if resolved == root || !resolved.starts_with(&root) {
            return Err(ExplorerError::invalid_path(format!(
                "repoPath is outside the scratch directory: {trimmed}"
            )));
        }
        if !resolved.is_dir() {
            return Err(ExplorerError::invalid_path(format!("repoPath is not a directory: {trimmed}")));
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Workspace) {
        let tmp = TempDir::new().expect("tmp");
        let ws = Workspace::new(tmp.path().to_path_buf());
        (tmp, ws)
    }

    #[test]
    fn test_resolves_absolute_and_relative_checkouts() {
        let (tmp, ws) = workspace();
        fs::create_dir(tmp.path().join("acme-widgets-1")).unwrap();

        let abs = tmp.path().join("acme-widgets-1");
        let resolved = ws.resolve_checkout(abs.to_str().unwrap()).unwrap();
        assert_eq!(resolved, abs.canonicalize().unwrap());

        let rel = ws.resolve_checkout("acme-widgets-1").unwrap();
        assert_eq!(rel, resolved);
    }

    #[test]
    fn test_rejects_paths_outside_root() {
        let (tmp, ws) = workspace();
        let outside = TempDir::new().unwrap();

        assert!(matches!(
            ws.resolve_checkout(outside.path().to_str().unwrap()),
            Err(ExplorerError::InvalidPath(_))
        ));
        assert!(matches!(
            ws.resolve_checkout(tmp.path().to_str().unwrap()),
            Err(ExplorerError::InvalidPath(_))
        ));
        assert!(matches!(ws.resolve_checkout("../etc"), Err(ExplorerError::InvalidPath(_))));
    }

    #[test]
    fn test_missing_and_empty_paths() {
        let (_tmp, ws) = workspace();
        assert!(matches!(ws.resolve_checkout(""), Err(ExplorerError::InvalidInput(_))));
        assert!(matches!(ws.resolve_checkout("gone-123"), Err(ExplorerError::NotFound(_))));
    }

    #[test]
    fn test_rejects_files() {
        let (tmp, ws) = workspace();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        assert!(matches!(ws.resolve_checkout("notes.txt"), Err(ExplorerError::InvalidPath(_))));
    }
}
