use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::llm_client::sanitize::SanitizeError;
use crate::llm_client::LlmError;
use crate::resume::identity::TitleError;
use crate::resume::validate::ValidateError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Classification follows the pipeline's result codes: client-input-rejected
/// (400), unprocessable (422), upstream-failure (502/504), conflict (409).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream failure: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "An upstream provider error occurred".to_string(),
                )
            }
            AppError::UpstreamTimeout(msg) => {
                tracing::error!("Upstream timeout: {msg}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "UPSTREAM_TIMEOUT",
                    "An upstream provider timed out".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedMediaType(_)
            | ExtractError::Decode(_)
            | ExtractError::TooShort { .. } => AppError::Validation(err.to_string()),
            ExtractError::RenderTimeout(_) => AppError::UpstreamTimeout(err.to_string()),
            ExtractError::RenderUpstream { .. } | ExtractError::RenderTransport(_) => {
                AppError::Upstream(err.to_string())
            }
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout { .. } => AppError::UpstreamTimeout(err.to_string()),
            LlmError::Upstream { status, ref body } => {
                // Body is logged for operators, never echoed to clients.
                tracing::error!("model endpoint returned {status}: {body}");
                AppError::Upstream(err.to_string())
            }
            LlmError::Transport(_) | LlmError::EmptyContent => AppError::Upstream(err.to_string()),
        }
    }
}

impl From<SanitizeError> for AppError {
    fn from(err: SanitizeError) -> Self {
        tracing::error!("unrecoverable model output: {err}; raw text: {}", err.raw());
        AppError::Upstream("model produced output that could not be parsed".to_string())
    }
}

impl From<ValidateError> for AppError {
    fn from(err: ValidateError) -> Self {
        AppError::UnprocessableEntity(err.to_string())
    }
}

impl From<TitleError> for AppError {
    fn from(err: TitleError) -> Self {
        match err {
            TitleError::Exhausted { .. } => AppError::Conflict(err.to_string()),
            TitleError::Lookup(e) => AppError::Internal(e),
        }
    }
}
