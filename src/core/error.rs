use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Transient infrastructure failure (deadline expired, pool exhausted).
    /// A dashboard error must never be rendered as zero activity.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authenticated caller has no resolvable profile and one could not be
    /// created (unique-constraint race that also failed the retry).
    #[error("Profile sync failed: {0}")]
    ProfileSync(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::StoreUnavailable(ref msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Metrics temporarily unavailable".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::ProfileSync(ref msg) => {
                tracing::error!("Profile sync failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "profile-sync-failed".to_string(),
                    None,
                )
            }
            AppError::RateLimitExceeded(ref msg) => {
                (StatusCode::TOO_MANY_REQUESTS, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
