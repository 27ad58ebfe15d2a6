//! Remote hosting API: repository languages, README and license without cloning.

use crate::domain::{language_breakdown, Config, Language, RemoteOverview, RepoInfo};
use crate::error::{ExplorerError, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Language breakdown and the byte total it was computed from.
    async fn languages(&self, owner: &str, repo: &str) -> Result<(Vec<Language>, u64)>;

    async fn readme(&self, owner: &str, repo: &str) -> Result<Option<String>>;

    /// License display name, e.g. `"MIT License"`.
    async fn license(&self, owner: &str, repo: &str) -> Result<Option<String>>;
}

/// Gather everything the host knows about `info` in one overview.
///
/// README and license lookups degrade to `None` on failure; the language
/// call is the one that decides success.
pub async fn remote_overview(host: &dyn RepoHost, info: &RepoInfo) -> Result<RemoteOverview> {
    let (languages, total_bytes) = host.languages(&info.owner, &info.repo).await?;

    let readme = host.readme(&info.owner, &info.repo).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Error getting README");
        None
    });
    let license = host.license(&info.owner, &info.repo).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Error getting license");
        None
    });

    Ok(RemoteOverview {
        owner: info.owner.clone(),
        repo: info.repo.clone(),
        languages,
        total_bytes,
        license,
        readme,
    })
}

/// GitHub REST API client.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReadmeResponse {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LicenseResponse {
    license: Option<LicenseInfo>,
}

#[derive(Debug, Deserialize)]
struct LicenseInfo {
    name: String,
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("repo-explorer/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to build GitHub HTTP client, using default client");
                Client::new()
            });

        Self { client, base_url: base_url.into().trim_end_matches('/').to_string(), token }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.github_api_url.clone(),
            config.resolved_github_token(),
            Duration::from_secs(config.llm_timeout_secs),
        )
    }

    /// GET `/repos/{owner}/{repo}/{endpoint}`; `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        owner: &str,
        repo: &str,
        endpoint: &str,
    ) -> Result<Option<T>> {
        let url = format!("{}/repos/{owner}/{repo}/{endpoint}", self.base_url);
        let mut request =
            self.client.get(&url).header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return Err(ExplorerError::upstream(
                Some(status.as_u16()),
                format!("GitHub API error: {reason}"),
            ));
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn languages(&self, owner: &str, repo: &str) -> Result<(Vec<Language>, u64)> {
        let data: BTreeMap<String, u64> = self
            .get_json(owner, repo, "languages")
            .await?
            .ok_or_else(|| ExplorerError::NotFound(format!("{owner}/{repo}")))?;
        Ok(language_breakdown(data))
    }

    async fn readme(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        let Some(response) = self.get_json::<ReadmeResponse>(owner, repo, "readme").await? else {
            return Ok(None);
        };
        decode_readme(&response).map(Some)
    }

    async fn license(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        let response = self.get_json::<LicenseResponse>(owner, repo, "license").await?;
        Ok(response.and_then(|r| r.license).map(|l| l.name))
    }
}

fn decode_readme(response: &ReadmeResponse) -> Result<String> {
    if response.encoding.as_deref().is_some_and(|e| e != "base64") {
        return Ok(response.content.clone());
    }

    // GitHub wraps base64 content at 60 columns.
    let compact: String = response.content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ExplorerError::upstream(None, format!("README is not valid base64: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeHost {
        fail_readme: bool,
    }

    #[async_trait]
    impl RepoHost for FakeHost {
        async fn languages(&self, _owner: &str, _repo: &str) -> Result<(Vec<Language>, u64)> {
            Ok(language_breakdown(vec![("Rust".to_string(), 75), ("Shell".to_string(), 25)]))
        }

        async fn readme(&self, _owner: &str, _repo: &str) -> Result<Option<String>> {
            if self.fail_readme {
                Err(ExplorerError::upstream(Some(500), "boom"))
            } else {
                Ok(Some("# Hello".to_string()))
            }
        }

        async fn license(&self, _owner: &str, _repo: &str) -> Result<Option<String>> {
            Ok(Some("MIT License".to_string()))
        }
    }

    fn info() -> RepoInfo {
        RepoInfo { owner: "acme".into(), repo: "widgets".into(), branch: "main".into() }
    }

    #[tokio::test]
    async fn test_remote_overview_combines_endpoints() {
        let overview = remote_overview(&FakeHost { fail_readme: false }, &info()).await.unwrap();
        assert_eq!(overview.total_bytes, 100);
        assert_eq!(overview.languages[0].name, "Rust");
        assert!((overview.languages[0].percentage - 75.0).abs() < 1e-9);
        assert_eq!(overview.readme.as_deref(), Some("# Hello"));
        assert_eq!(overview.license.as_deref(), Some("MIT License"));
    }

    #[tokio::test]
    async fn test_remote_overview_tolerates_readme_failure() {
        let overview = remote_overview(&FakeHost { fail_readme: true }, &info()).await.unwrap();
        assert!(overview.readme.is_none());
    }

    #[test]
    fn test_decode_readme_handles_wrapped_base64() {
        let response = ReadmeResponse { content: "IyBIZWxs\nbyB3b3Js\nZA==\n".into(), encoding: Some("base64".into()) };
        assert_eq!(decode_readme(&response).unwrap(), "# Hello world");
    }

    #[test]
    fn test_decode_readme_rejects_garbage() {
        let response = ReadmeResponse { content: "!!!".into(), encoding: None };
        assert!(decode_readme(&response).is_err());
    }
}
