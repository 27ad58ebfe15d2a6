//! HTTP JSON surface over the explorer operations.

use crate::domain::Config;
use crate::fetch::{RepoCloner, Workspace};
use crate::github_api::{GitHubClient, RepoHost};
use crate::llm::{CompletionProvider, OpenAiProvider};
use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;

/// Shared, read-only handler dependencies.
#[derive(Clone)]
pub struct AppState {
    pub cloner: Arc<RepoCloner>,
    pub workspace: Arc<Workspace>,
    pub llm: Arc<dyn CompletionProvider>,
    pub host: Arc<dyn RepoHost>,
    pub clone_timeout: Duration,
    pub summary_max_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cloner: Arc::new(RepoCloner::from_config(config)),
            workspace: Arc::new(Workspace::new(config.scratch_root.clone())),
            llm: Arc::new(OpenAiProvider::from_config(config)),
            host: Arc::new(GitHubClient::from_config(config)),
            clone_timeout: Duration::from_secs(config.clone_timeout_secs),
            summary_max_bytes: config.summary_max_bytes,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/repo/clone", post(handlers::clone_repository))
        .route("/api/repo/file", get(handlers::read_file))
        .route("/api/repo/stats", get(handlers::repo_stats))
        .route("/api/repo/summary", post(handlers::summarize_repository))
        .route("/api/repo/overview", get(handlers::remote_overview))
        .route("/api/repo", delete(handlers::cleanup_repository))
        .route("/api/chat", post(handlers::chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `config.bind` and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.scratch_root).with_context(|| {
        format!("Failed to create scratch root {}", config.scratch_root.display())
    })?;

    let app = create_router(AppState::from_config(config));
    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    tracing::info!(
        addr = %listener.local_addr().map(|a| a.to_string()).unwrap_or_else(|_| config.bind.clone()),
        scratch_root = %config.scratch_root.display(),
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
