//! Error taxonomy for repository ingestion and file serving.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ExplorerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Malformed URL or missing required field.
    #[error("{0}")]
    InvalidInput(String),

    /// A caller-supplied path tries to leave its root.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to clone repository: {message}")]
    Clone {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by the model provider or the hosting API.
    #[error("Upstream error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream { status: Option<u16>, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExplorerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn clone_failed(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Clone { message: message.into(), source: Some(Box::new(source)) }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read { path: path.into(), source }
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream { status, message: message.into() }
    }

    /// Map an I/O error on `path` to `NotFound` or `Read`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.display().to_string())
        } else {
            Self::read(path, source)
        }
    }

    /// Whether the upstream service rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Upstream { status: Some(401 | 403), .. })
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        Self::upstream(err.status().map(|s| s.as_u16()), err.to_string())
    }
}
