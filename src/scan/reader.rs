//! Reading files out of a checkout without escaping it.

use crate::error::{ExplorerError, Result};
use crate::utils::{decode_text, normalize_path};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Join `rel` onto `root`, rejecting anything that could leave the root.
///
/// The check is purely lexical and never touches the filesystem: empty
/// paths, absolute paths, drive prefixes and `..` segments are all
/// `InvalidPath`. Both `/` and `\` are treated as separators.
pub fn resolve_in_repo(root: &Path, rel: &str) -> Result<PathBuf> {
    let normalized = normalize_path(rel);
    if normalized.trim().is_empty() {
        return Err(ExplorerError::invalid_path("file path is empty"));
    }
    if normalized.starts_with('/') {
        return Err(ExplorerError::invalid_path(format!("absolute paths are not allowed: {rel}")));
    }

    let mut resolved = root.to_path_buf();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(ExplorerError::invalid_path(format!(
                    "parent directory segments are not allowed: {rel}"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ExplorerError::invalid_path(format!(
                    "absolute paths are not allowed: {rel}"
                )));
            }
        }
    }

    if resolved == root {
        return Err(ExplorerError::invalid_path(format!("path names the repository root: {rel}")));
    }
    Ok(resolved)
}

/// Read a file below `root` as text.
///
/// - traversal attempts → `InvalidPath` (checked before any I/O)
/// - missing target → `NotFound`
/// - directories and other I/O failures → `Read`
/// - symlinks resolving outside `root` → `InvalidPath`
pub fn read_repo_file(root: &Path, rel: &str) -> Result<String> {
    let bytes = read_repo_bytes(root, rel)?;
    Ok(decode_text(&bytes))
}

/// Raw bytes variant of [`read_repo_file`].
pub fn read_repo_bytes(root: &Path, rel: &str) -> Result<Vec<u8>> {
    let path = resolve_in_repo(root, rel)?;

    let metadata = fs::metadata(&path).map_err(|e| ExplorerError::from_io(rel, e))?;
    if metadata.is_dir() {
        return Err(ExplorerError::read(
            rel,
            std::io::Error::new(std::io::ErrorKind::Other, "Cannot read directory as file"),
        ));
    }

    let canonical_root = root.canonicalize().map_err(|e| ExplorerError::read(root, e))?;
    let canonical = path.canonicalize().map_err(|e| ExplorerError::from_io(rel, e))?;
    if !canonical.starts_with(&canonical_root) {
        return Err(ExplorerError::invalid_path(format!(
            "path resolves outside the repository: {rel}"
        )));
    }

    fs::read(&canonical).map_err(|e| ExplorerError::from_io(rel, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/index.ts"), "export const x = 1;\n").unwrap();
        tmp
    }

    #[test]
    fn test_reads_nested_file() {
        let tmp = repo();
        let content = read_repo_file(tmp.path(), "src/index.ts").unwrap();
        assert_eq!(content, "export const x = 1;\n");

        let content = read_repo_file(tmp.path(), "./src/index.ts").unwrap();
        assert_eq!(content, "export const x = 1;\n");
    }

    #[test]
    fn test_traversal_is_invalid_path_even_when_target_exists() {
        let tmp = repo();
        let root = tmp.path().join("src");
        fs::write(tmp.path().join("secret.txt"), "s3cr3t").unwrap();

        for rel in ["../secret.txt", "../../etc/passwd", "src/../../x", "..\\secret.txt", ".."] {
            let err = read_repo_file(&root, rel).unwrap_err();
            assert!(matches!(err, ExplorerError::InvalidPath(_)), "{rel}: {err:?}");
        }
    }

    #[test]
    fn test_traversal_rejected_without_touching_filesystem() {
        let missing_root = Path::new("/definitely/not/a/real/root");
        let err = read_repo_file(missing_root, "../../etc/passwd").unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidPath(_)));
    }

    #[test]
    fn test_absolute_and_empty_paths_rejected() {
        let tmp = repo();
        for rel in ["/etc/passwd", "", "   ", "."] {
            let err = read_repo_file(tmp.path(), rel).unwrap_err();
            assert!(matches!(err, ExplorerError::InvalidPath(_)), "{rel:?}: {err:?}");
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let tmp = repo();
        let err = read_repo_file(tmp.path(), "src/missing.ts").unwrap_err();
        assert!(matches!(err, ExplorerError::NotFound(_)));
    }

    #[test]
    fn test_directory_is_read_error() {
        let tmp = repo();
        let err = read_repo_file(tmp.path(), "src").unwrap_err();
        assert!(matches!(err, ExplorerError::Read { .. }), "got {err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_invalid_path() {
        let tmp = repo();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "s3cr3t").unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), tmp.path().join("link"))
            .unwrap();

        let err = read_repo_file(tmp.path(), "link").unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidPath(_)));
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_rejected() {
        let tmp = repo();
        fs::write(tmp.path().join("latin1.txt"), [b'c', b'a', b'f', 0xe9]).unwrap();
        let content = read_repo_file(tmp.path(), "latin1.txt").unwrap();
        assert!(content.starts_with("caf"));
    }
}
