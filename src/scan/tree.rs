//! Typed directory tree generation.

use crate::domain::FileNode;
use crate::error::{ExplorerError, Result};
use crate::scan::should_skip_entry;
use std::fs;
use std::path::{Path, PathBuf};

struct Entry {
    name: String,
    abs: PathBuf,
    rel: String,
    is_dir: bool,
}

/// A directory whose children are still being visited.
struct Frame {
    node: FileNode,
    pending: std::vec::IntoIter<Entry>,
}

/// Build the file tree below `root`, returning the root's children.
///
/// Directories sort before files; names compare byte-wise. Entries rejected
/// by [`should_skip_entry`] are omitted. Symlinks are reported as files and
/// never followed. The walk keeps an explicit stack of open directories, so
/// nesting depth is bounded by memory rather than the call stack.
pub fn build_file_tree(root: &Path) -> Result<Vec<FileNode>> {
    let top = read_sorted(root, "").map_err(|e| ExplorerError::read(root, e))?;

    let mut stack = vec![Frame { node: FileNode::directory("", ""), pending: top.into_iter() }];

    while let Some(frame) = stack.last_mut() {
        match frame.pending.next() {
            Some(entry) if entry.is_dir => {
                let children = match read_sorted(&entry.abs, &entry.rel) {
                    Ok(children) => children,
                    Err(e) => {
                        tracing::warn!(
                            path = %entry.abs.display(),
                            error = %e,
                            "Unreadable directory; listing it empty"
                        );
                        Vec::new()
                    }
                };
                stack.push(Frame {
                    node: FileNode::directory(entry.name, entry.rel),
                    pending: children.into_iter(),
                });
            }
            Some(entry) => push_child(frame, FileNode::file(entry.name, entry.rel)),
            None => {
                if let Some(done) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => push_child(parent, done.node),
                        None => return Ok(done.node.children.unwrap_or_default()),
                    }
                }
            }
        }
    }

    Ok(Vec::new())
}

fn push_child(frame: &mut Frame, child: FileNode) {
    frame.node.children.get_or_insert_with(Vec::new).push(child);
}

fn read_sorted(dir: &Path, rel_dir: &str) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let Ok(file_type) = entry.file_type() else { continue };
        let name = entry.file_name().to_string_lossy().to_string();
        let is_dir = file_type.is_dir();

        if should_skip_entry(&name, is_dir) {
            continue;
        }

        let rel = if rel_dir.is_empty() { name.clone() } else { format!("{rel_dir}/{name}") };
        entries.push(Entry { abs: entry.path(), name, rel, is_dir });
    }

    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{flatten_paths, NodeKind};
    use std::collections::BTreeSet;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn test_directories_first_then_byte_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "b.txt");
        touch(root, "A.txt");
        touch(root, "zeta/inner.rs");
        touch(root, "alpha/x.rs");

        let tree = build_file_tree(root).unwrap();
        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta", "A.txt", "b.txt"]);
        assert_eq!(tree[0].kind, NodeKind::Directory);
        assert_eq!(tree[0].children.as_ref().unwrap()[0].path, "alpha/x.rs");
        assert!(tree[2].children.is_none());
    }

    #[test]
    fn test_skips_vcs_dependencies_and_dotfiles() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, ".git/config");
        touch(root, "node_modules/react/index.js");
        touch(root, ".env.example");
        touch(root, ".github/workflows/ci.yml");
        touch(root, "src/index.ts");

        let paths = flatten_paths(&build_file_tree(root).unwrap());
        assert_eq!(paths, vec!["src", "src/index.ts"]);
    }

    #[test]
    fn test_flattened_tree_matches_disk() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for rel in ["a/b/c/d/e.txt", "a/b/f.rs", "a/g.md", "h.json", "empty/.keep", ".hidden/x"] {
            touch(root, rel);
        }
        fs::create_dir_all(root.join("empty_dir")).unwrap();

        let from_tree: BTreeSet<String> =
            flatten_paths(&build_file_tree(root).unwrap()).into_iter().collect();

        let from_disk: BTreeSet<String> = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !should_skip_entry(&e.file_name().to_string_lossy(), e.file_type().is_dir())
            })
            .filter_map(|e| e.ok())
            .map(|e| {
                e.path().strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/")
            })
            .collect();

        assert_eq!(from_tree, from_disk);
        assert!(from_tree.contains("empty_dir"));
        assert!(from_tree.contains("empty"));
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let mut rel = String::new();
        for i in 0..200 {
            if !rel.is_empty() {
                rel.push('/');
            }
            rel.push_str(&format!("d{i}"));
        }
        touch(root, &format!("{rel}/leaf.txt"));

        let tree = build_file_tree(root).unwrap();
        let paths = flatten_paths(&tree);
        assert_eq!(paths.len(), 201);
        assert!(paths.last().unwrap().ends_with("d199/leaf.txt"));
    }

    #[test]
    fn test_unreadable_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = build_file_tree(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, ExplorerError::Read { .. }));

        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let err = build_file_tree(&file).unwrap_err();
        assert!(matches!(err, ExplorerError::Read { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "src/lib.rs");
        std::os::unix::fs::symlink(root, root.join("loop")).unwrap();

        let tree = build_file_tree(root).unwrap();
        let link = tree.iter().find(|n| n.name == "loop").expect("symlink listed");
        assert_eq!(link.kind, NodeKind::File);
    }
}
