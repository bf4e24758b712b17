use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::CompletionError;
use crate::store::StoreError;

/// External dependency that a request could not use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Store,
    Completion,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0:?}")]
    ServiceUnavailable(Dependency),

    #[error("Database error: {0}")]
    Store(StoreError),

    #[error("Completion error: {0}")]
    Completion(CompletionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(reason) => {
                tracing::error!("Database unavailable: {reason}");
                AppError::ServiceUnavailable(Dependency::Store)
            }
            other => AppError::Store(other),
        }
    }
}

impl From<CompletionError> for AppError {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::NotConfigured => AppError::ServiceUnavailable(Dependency::Completion),
            other => AppError::Completion(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(Dependency::Store) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ServiceUnavailable(Dependency::Completion)
            | AppError::Store(_)
            | AppError::Completion(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => ("BAD_REQUEST", msg.clone()),
            AppError::ServiceUnavailable(Dependency::Store) => (
                "SERVICE_UNAVAILABLE",
                "Database service unavailable".to_string(),
            ),
            AppError::ServiceUnavailable(Dependency::Completion) => (
                "SERVICE_NOT_CONFIGURED",
                "Completion API key not configured. Please set OPENAI_API_KEY.".to_string(),
            ),
            AppError::Store(e) => {
                tracing::error!("Database error: {e}");
                ("DATABASE_ERROR", format!("Database error: {e}"))
            }
            AppError::Completion(e) => {
                tracing::error!("Completion error: {e}");
                ("COMPLETION_ERROR", format!("Completion service error: {e}"))
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
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
