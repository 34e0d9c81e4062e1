//! Error types for the gateway API
//!
//! Provides unified error handling at the HTTP boundary using thiserror.
//! The cache itself never produces errors; these cover the catalog, the team
//! and request validation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::catalog::FetchError;
use crate::models::ErrorResponse;

// == App Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested record does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Team already holds the maximum number of members
    #[error("Team is full: {0}")]
    TeamFull(String),

    /// Remote API failed or answered with garbage
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Status(404) => AppError::NotFound(err.to_string()),
            FetchError::InvalidInput(msg) => AppError::InvalidRequest(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TeamFull(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, AppError>;
