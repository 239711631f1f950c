use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Not found")]
    NotFound,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            Self::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            Self::Conflict(msg) => {
                tracing::debug!(message = %msg, "Conflict");
                (StatusCode::CONFLICT, msg)
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
