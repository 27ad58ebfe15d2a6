//! Path normalization

use std::path::Path;

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes
    path.replace('\\', "/")
}

/// `path` relative to `root` with `/` separators, or `None` if it is not below `root`.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(normalize_path(&rel.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        let root = Path::new("/repo");
        assert_eq!(
            relative_path(root, Path::new("/repo/app/api/route.ts")).as_deref(),
            Some("app/api/route.ts")
        );
        assert_eq!(relative_path(root, Path::new("/elsewhere/x")), None);
    }
}
