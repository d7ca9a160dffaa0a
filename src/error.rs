// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::generation::GenerationError;
use crate::transcript::ResolveError;

/// Errors surfaced by page actions and the JSON endpoints
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Input(String),

    #[error("Your session has expired. Reload the page to start a new one.")]
    SessionExpired,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::SessionExpired => StatusCode::NOT_FOUND,
            AppError::Resolve(ResolveError::InvalidUrl) => StatusCode::BAD_REQUEST,
            AppError::Resolve(ResolveError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Generation(GenerationError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Generation(GenerationError::EmptyPrompt) => StatusCode::BAD_REQUEST,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            let error_id = Uuid::new_v4();
            tracing::error!(error_id = %error_id, error = %self, "request failed");
            format!("{} (ID: {})", self, error_id)
        } else {
            tracing::debug!(error = %self, "request rejected");
            self.to_string()
        };

        (
            status,
            Json(json!({
                "success": false,
                "message": message,
            })),
        )
            .into_response()
    }
}
