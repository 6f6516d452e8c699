use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Page routes wrap it in [`PlainTextError`] to answer with plain text instead of JSON.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Evaluation format error: {0}")]
    EvaluationFormat(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status, machine-readable code and user-facing message for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::NotReady(msg) => (StatusCode::BAD_REQUEST, "NOT_READY", msg.clone()),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR", msg.clone())
            }
            AppError::EvaluationFormat(msg) => {
                tracing::error!("Evaluation format error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EVALUATION_FORMAT_ERROR",
                    msg.clone(),
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
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Renders an [`AppError`] as a plain-text body. Used by the HTML page routes.
#[derive(Debug)]
pub struct PlainTextError(pub AppError);

impl From<AppError> for PlainTextError {
    fn from(err: AppError) -> Self {
        PlainTextError(err)
    }
}

impl IntoResponse for PlainTextError {
    fn into_response(self) -> Response {
        let (status, _, message) = self.0.parts();
        (status, message).into_response()
    }
}
