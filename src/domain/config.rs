//! Runtime configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How checkout directories are named and reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClonePolicy {
    /// Every clone gets a new `{owner}-{repo}-{millis}` directory.
    #[default]
    Fresh,
    /// Clones land in `{owner}-{repo}`; an existing checkout is pulled best-effort
    /// and served even if the pull fails.
    Reuse,
}

impl std::str::FromStr for ClonePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fresh" => Ok(Self::Fresh),
            "reuse" => Ok(Self::Reuse),
            other => Err(format!("Invalid clone policy '{other}' (expected 'fresh' or 'reuse')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding every checkout.
    pub scratch_root: PathBuf,
    pub clone_policy: ClonePolicy,
    /// History depth for clones; 0 clones the full history.
    pub clone_depth: u32,
    pub clone_timeout_secs: u64,
    /// Git base URL serving `{owner}/{repo}`; clones go to GitHub when unset.
    pub clone_mirror: Option<String>,
    /// Upper bound on the summed content of important files sent to the summarizer.
    pub summary_max_bytes: usize,
    pub bind: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub llm_timeout_secs: u64,
    pub github_api_url: String,
    pub github_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_root: std::env::temp_dir().join("repo-explorer"),
            clone_policy: ClonePolicy::Fresh,
            clone_depth: 1,
            clone_timeout_secs: 300,
            clone_mirror: None,
            summary_max_bytes: 100_000,
            bind: "127.0.0.1:3000".to_string(),
            llm_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            llm_api_key: None,
            llm_timeout_secs: 120,
            github_api_url: "https://api.github.com".to_string(),
            github_token: None,
        }
    }
}

impl Config {
    /// API key for the completion provider, falling back to `OPENAI_API_KEY`.
    pub fn resolved_llm_api_key(&self) -> Option<String> {
        self.llm_api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Token for the hosting API, falling back to `GITHUB_TOKEN`.
    pub fn resolved_github_token(&self) -> Option<String> {
        self.github_token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
    }
}
