//! The one place internal errors become HTTP responses.

use crate::error::ExplorerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error wrapping [`ExplorerError`].
#[derive(Debug)]
pub struct ApiError(pub ExplorerError);

impl From<ExplorerError> for ApiError {
    fn from(err: ExplorerError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(err: &ExplorerError) -> StatusCode {
    match err {
        ExplorerError::InvalidInput(_) | ExplorerError::InvalidPath(_) => StatusCode::BAD_REQUEST,
        ExplorerError::NotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_auth_failure() => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "Request rejected");
        }

        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
