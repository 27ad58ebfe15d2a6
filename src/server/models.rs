//! Request and response bodies.

use crate::domain::{FileNode, ImportantFile, RepoStats};
use crate::llm::ChatMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneRequest {
    pub repo_url: Option<String>,
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneResponse {
    pub repo_path: String,
    pub files: Vec<FileNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoQuery {
    pub repo_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileQuery {
    pub repo_path: Option<String>,
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub content: String,
    /// Highlighter language id.
    pub language: String,
    pub is_binary: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlQuery {
    pub repo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub repo_url: Option<String>,
    pub stats: Option<RepoStats>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub summary: String,
    pub stats: RepoStats,
    pub analyzed_files: Vec<AnalyzedFile>,
}

/// An important file that went into a summary, without its content.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzedFile {
    pub path: String,
    pub reason: String,
}

impl From<&ImportantFile> for AnalyzedFile {
    fn from(file: &ImportantFile) -> Self {
        Self { path: file.path.clone(), reason: file.reason.clone() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub file_name: Option<String>,
    pub file_content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
