use crate::domain::ClonePolicy;
use crate::error::{ExplorerError, Result};
use crate::fetch::{cleanup, parse_github_url};
use crate::github_api;
use crate::important::{find_important_files, fit_readme};
use crate::llm;
use crate::scan::build_file_tree;
use crate::scan::reader::read_repo_bytes;
use crate::server::error::ApiError;
use crate::server::models::*;
use crate::server::AppState;
use crate::stats::{collect_repo_stats, highlight_language};
use crate::utils::{decode_text, looks_binary};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Run filesystem or git work off the async executor.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ExplorerError::Internal(format!("blocking task failed: {e}")))?
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|e| ExplorerError::invalid_input(e.body_text()))
}

fn required(value: Option<String>, message: &str) -> Result<String> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| ExplorerError::invalid_input(message))
}

/// Clone under the configured timeout.
async fn clone_with_timeout(state: &AppState, url: String, force_refresh: bool) -> Result<PathBuf> {
    let cloner = Arc::clone(&state.cloner);
    let remove_if_abandoned = cloner.clone_policy() == ClonePolicy::Fresh;
    clone_with_deadline(state.clone_timeout, remove_if_abandoned, move || {
        cloner.clone_repo(&url, force_refresh)
    })
    .await
}

/// Run `clone` on a blocking thread and give up waiting after `limit`.
///
/// git cannot be interrupted, so a clone that outlives `limit` keeps running.
/// When it finishes nobody is waiting for the checkout; with
/// `remove_if_abandoned` it is deleted then.
pub(crate) async fn clone_with_deadline<F>(
    limit: Duration,
    remove_if_abandoned: bool,
    clone: F,
) -> Result<PathBuf>
where
    F: FnOnce() -> Result<PathBuf> + Send + 'static,
{
    let (tx, mut rx) = oneshot::channel();
    tokio::task::spawn_blocking(move || {
        if let Err(Ok(path)) = tx.send(clone()) {
            if remove_if_abandoned {
                tracing::info!(path = %path.display(), "Removing checkout of timed-out clone");
                cleanup(&path);
            }
        }
    });

    match tokio::time::timeout(limit, &mut rx).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(ExplorerError::Internal("clone task ended without a result".into())),
        Err(_) => {
            // After close a late clone sees its send fail and cleans up
            // itself; a result sent before close is drained here.
            rx.close();
            if let Ok(Ok(path)) = rx.try_recv() {
                if remove_if_abandoned {
                    cleanup(&path);
                }
            }
            Err(ExplorerError::Clone {
                message: format!("timed out after {}s", limit.as_secs()),
                source: None,
            })
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn clone_repository(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CloneRequest>, JsonRejection>,
) -> ApiResult<Json<CloneResponse>> {
    let request = json_body(payload)?;
    let url = required(request.repo_url, "Repository URL is required")?;
    parse_github_url(&url)?;

    let path = clone_with_timeout(&state, url, request.force_refresh).await?;
    tracing::info!(path = %path.display(), "Repository cloned");

    let tree_root = path.clone();
    match run_blocking(move || build_file_tree(&tree_root)).await {
        Ok(files) => Ok(Json(CloneResponse { repo_path: path.display().to_string(), files })),
        Err(e) => {
            cleanup(&path);
            Err(e.into())
        }
    }
}

pub async fn read_file(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<FileResponse>> {
    let repo_path = required(query.repo_path, "Missing repoPath parameter")?;
    let file_path = required(query.file_path, "Missing filePath parameter")?;
    let workspace = Arc::clone(&state.workspace);

    let response = run_blocking(move || {
        let root = workspace.resolve_checkout(&repo_path)?;
        let bytes = read_repo_bytes(&root, &file_path)?;
        let is_binary = looks_binary(Path::new(&file_path), &bytes);
        let content = if is_binary { String::new() } else { decode_text(&bytes) };

        Ok(FileResponse {
            content,
            language: highlight_language(&file_path).to_string(),
            is_binary,
        })
    })
    .await?;

    Ok(Json(response))
}

pub async fn repo_stats(
    State(state): State<AppState>,
    Query(query): Query<RepoQuery>,
) -> ApiResult<Json<crate::domain::RepoStats>> {
    let repo_path = required(query.repo_path, "Missing repoPath parameter")?;
    let workspace = Arc::clone(&state.workspace);

    let stats = run_blocking(move || {
        let root = workspace.resolve_checkout(&repo_path)?;
        collect_repo_stats(&root)
    })
    .await?;

    Ok(Json(stats))
}

pub async fn summarize_repository(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummaryRequest>, JsonRejection>,
) -> ApiResult<Json<SummaryResponse>> {
    let request = json_body(payload)?;

    let (stats, files) = match (request.repo_url.filter(|u| !u.trim().is_empty()), request.stats) {
        (Some(url), _) => {
            parse_github_url(&url)?;
            let path = clone_with_timeout(&state, url, false).await?;
            let remove_after = state.cloner.clone_policy() == ClonePolicy::Fresh;
            let max_bytes = state.summary_max_bytes;

            run_blocking(move || {
                let gathered = collect_repo_stats(&path)
                    .map(|stats| (stats, find_important_files(&path, max_bytes)));
                if remove_after {
                    cleanup(&path);
                }
                gathered
            })
            .await?
        }
        (None, Some(stats)) => (stats, Vec::new()),
        (None, None) => {
            return Err(ExplorerError::invalid_input("Either repoUrl or stats is required").into())
        }
    };

    let mut prompt_stats = stats.clone();
    prompt_stats.readme = stats
        .readme
        .as_deref()
        .map(|readme| fit_readme(readme, &files, state.summary_max_bytes).to_string());

    let summary = llm::summarize(state.llm.as_ref(), &prompt_stats, &files).await?;
    Ok(Json(SummaryResponse {
        summary,
        stats,
        analyzed_files: files.iter().map(AnalyzedFile::from).collect(),
    }))
}

pub async fn cleanup_repository(
    State(state): State<AppState>,
    Query(query): Query<RepoQuery>,
) -> ApiResult<StatusCode> {
    let repo_path = required(query.repo_path, "Missing repoPath parameter")?;
    let workspace = Arc::clone(&state.workspace);

    run_blocking(move || match workspace.resolve_checkout(&repo_path) {
        Ok(root) => {
            cleanup(&root);
            Ok(())
        }
        Err(ExplorerError::NotFound(_)) => Ok(()),
        Err(e) => Err(e),
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remote_overview(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<Json<crate::domain::RemoteOverview>> {
    let url = required(query.repo_url, "Missing repoUrl parameter")?;
    let info = parse_github_url(&url)?;
    let overview = github_api::remote_overview(state.host.as_ref(), &info).await?;
    Ok(Json(overview))
}

pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let request = json_body(payload)?;
    if request.messages.is_empty() {
        return Err(ExplorerError::invalid_input("Messages are required").into());
    }

    let tokens = llm::chat(
        state.llm.as_ref(),
        request.messages,
        request.file_name.as_deref(),
        request.file_content.as_deref(),
    )
    .await?;

    let events = tokens
        .map(|token| -> std::result::Result<Event, Infallible> {
            match token {
                Ok(text) => Ok(Event::default().data(text)),
                Err(e) => {
                    tracing::warn!(error = %e, "Chat stream failed");
                    Ok(Event::default().event("error").data(e.to_string()))
                }
            }
        })
        .chain(stream::once(async { Ok(Event::default().event("done").data("[DONE]")) }));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
