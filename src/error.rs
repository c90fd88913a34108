use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Validation errors
    #[error("{0}")]
    Validation(String),
    #[error("Bad request: {0}")]
    BadRequest(String),

    // Contact errors
    #[error("Not found")]
    ContactNotFound,
    #[error("Email already exists")]
    DuplicateEmail,

    // Store errors
    #[error("DB down")]
    StoreUnavailable,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // 400 Bad Request
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            // 404 Not Found
            AppError::ContactNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            // 409 Conflict
            AppError::DuplicateEmail => (StatusCode::CONFLICT, self.to_string()),

            // 500 Internal Server Error
            AppError::StoreUnavailable => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
