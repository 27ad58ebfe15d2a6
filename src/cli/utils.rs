//! Shared CLI utilities.

use crate::domain::FileNode;
use std::collections::HashSet;

/// Render a file tree as box-drawing lines, directories suffixed with `/`.
///
/// Nodes deeper than `max_depth` are omitted; paths in `highlighted` get a star.
pub fn render_tree(
    root_name: &str,
    nodes: &[FileNode],
    max_depth: usize,
    highlighted: &HashSet<String>,
) -> String {
    let mut lines = vec![format!("{root_name}/")];
    render_level(nodes, "", 1, max_depth, highlighted, &mut lines);
    lines.join("\n")
}

fn render_level(
    nodes: &[FileNode],
    prefix: &str,
    depth: usize,
    max_depth: usize,
    highlighted: &HashSet<String>,
    lines: &mut Vec<String>,
) {
    if depth > max_depth {
        return;
    }

    for (idx, node) in nodes.iter().enumerate() {
        let is_last = idx + 1 == nodes.len();
        let connector = if is_last { "└── " } else { "├── " };
        let marker = if highlighted.contains(&node.path) { " ⭐" } else { "" };

        match &node.children {
            Some(children) => {
                lines.push(format!("{prefix}{connector}{}/{marker}", node.name));
                let extension = if is_last { "    " } else { "│   " };
                render_level(
                    children,
                    &format!("{prefix}{extension}"),
                    depth + 1,
                    max_depth,
                    highlighted,
                    lines,
                );
            }
            None => lines.push(format!("{prefix}{connector}{}{marker}", node.name)),
        }
    }
}
