//! Walking checkouts: the shared inclusion policy, tree building and safe reads

pub mod reader;
pub mod tree;

pub use reader::{read_repo_file, resolve_in_repo};
pub use tree::build_file_tree;

/// Directories skipped regardless of the dotfile rule.
const SKIPPED_NAMES: &[&str] = &[".git", "node_modules"];

/// Inclusion policy shared by the tree view, statistics and file counting.
///
/// Skips `.git`, `node_modules`, and every dot-prefixed file or directory.
pub fn should_skip_entry(name: &str, is_dir: bool) -> bool {
    if name.starts_with('.') {
        return true;
    }

    is_dir && SKIPPED_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::should_skip_entry;

    #[test]
    fn test_skip_policy() {
        assert!(should_skip_entry(".git", true));
        assert!(should_skip_entry(".env", false));
        assert!(should_skip_entry("node_modules", true));
        assert!(!should_skip_entry("node_modules", false));
        assert!(!should_skip_entry("src", true));
        assert!(!should_skip_entry("README.md", false));
    }
}
