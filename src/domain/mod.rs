//! Core data types shared by the fetch, scan, stats and server layers.

mod config;

pub use config::{ClonePolicy, Config};

use serde::{Deserialize, Serialize};

/// Owner, repository name and branch parsed from a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoInfo {
    /// Base directory name for a checkout of this repository.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One entry of a repository file tree.
///
/// `path` is relative to the repository root and always uses `/` separators.
/// `children` is `Some` exactly when `kind` is [`NodeKind::Directory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { name: name.into(), path: path.into(), kind: NodeKind::File, children: None }
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            children: Some(Vec::new()),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Flatten a forest of nodes into their relative paths, depth-first in display order.
pub fn flatten_paths(nodes: &[FileNode]) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack: Vec<&FileNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node.path.clone());
        if let Some(children) = &node.children {
            stack.extend(children.iter().rev());
        }
    }
    out
}

/// Byte share of a single language in a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub bytes: u64,
    pub percentage: f64,
}

/// Build a language list sorted by bytes (descending, then by name) with
/// percentages relative to the sum of all listed bytes.
///
/// Returns the list together with that sum.
pub fn language_breakdown<I>(totals: I) -> (Vec<Language>, u64)
where
    I: IntoIterator<Item = (String, u64)>,
{
    let entries: Vec<(String, u64)> = totals.into_iter().collect();
    let total_bytes: u64 = entries.iter().map(|(_, bytes)| bytes).sum();
    if total_bytes == 0 {
        return (Vec::new(), 0);
    }

    let mut languages: Vec<Language> = entries
        .into_iter()
        .map(|(name, bytes)| Language {
            name,
            bytes,
            percentage: bytes as f64 / total_bytes as f64 * 100.0,
        })
        .collect();
    languages.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.name.cmp(&b.name)));
    (languages, total_bytes)
}

/// Aggregate statistics computed from a checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    pub languages: Vec<Language>,
    pub total_bytes: u64,
    pub file_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
}

/// A file selected as context for the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantFile {
    pub path: String,
    pub reason: String,
    pub content: String,
}

/// Repository facts reported by the hosting API rather than a local checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOverview {
    pub owner: String,
    pub repo: String,
    pub languages: Vec<Language>,
    pub total_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
}
