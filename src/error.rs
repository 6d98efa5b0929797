use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

/// Name of the partial unique index enforcing "at most one live interview
/// per candidate/job key" at the storage layer. A violation of this index is
/// the authoritative scheduling-conflict signal; the application-level check
/// in `SchedulingGuard` is only a friendlier pre-check.
pub const LIVE_INTERVIEW_INDEX: &str = "uq_interviews_one_live_per_key";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Permission denied: {0}")]
    Ownership(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Scheduling conflict: {0}")]
    SchedulingConflict(String),

    #[error("Progression blocked: {0}")]
    ProgressionBlocked(String),

    #[error("Store timeout: {0}")]
    Timeout(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::InvalidStatus(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Ownership(msg) => (StatusCode::FORBIDDEN, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::SchedulingConflict(msg) => (StatusCode::CONFLICT, msg),
            Error::ProgressionBlocked(msg) => (StatusCode::CONFLICT, msg),
            Error::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Anyhow(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            sqlx::Error::PoolTimedOut => {
                Error::Timeout("Timed out waiting for a store connection".to_string())
            }
            sqlx::Error::Database(db) if db.constraint() == Some(LIVE_INTERVIEW_INDEX) => {
                Error::SchedulingConflict(
                    "A live interview already exists for this candidate and job".to_string(),
                )
            }
            other => Error::Database(other),
        }
    }
}
