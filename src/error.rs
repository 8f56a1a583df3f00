use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::pages;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Chart error: {0}")]
    Chart(#[from] image::ImageError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Already registered: {0}")]
    Duplicate(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Log the full error server-side and answer with an opaque identifier
fn internal_error(kind: &str, detail: &dyn std::fmt::Debug) -> Response {
    let error_id = Uuid::new_v4();
    tracing::error!(%error_id, "{}: {:?}", kind, detail);

    let body = Json(json!({
        "error": "Internal server error",
        "error_id": error_id.to_string(),
    }));

    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database(ref e) => internal_error("Database error", e),
            AppError::Chart(ref e) => internal_error("Chart error", e),
            AppError::TaskJoin(ref e) => internal_error("Task join error", e),
            AppError::Io(ref e) => internal_error("I/O error", e),
            AppError::PasswordHash(ref e) => internal_error("Password hashing error", e),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Html(pages::error_page(&msg))).into_response()
            }
            AppError::Duplicate(msg) => {
                (StatusCode::CONFLICT, Html(pages::error_page(&msg))).into_response()
            }
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, Html(pages::login_error())).into_response()
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
