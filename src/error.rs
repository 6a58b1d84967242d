//! Error types for the studio booking server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadValue,
    SlotUnavailable,
    DbFailure,
    CalendarFailure,
    EmailFailure,
    Failure,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Collaborator failure whose text is returned to the caller as-is
    #[error("{0}")]
    Exposed(String),
}

impl AppError {
    /// Turn a collaborator failure into one that surfaces its underlying text.
    /// Client-side errors are left untouched.
    pub fn expose(self) -> Self {
        match self {
            AppError::Database(_)
            | AppError::Calendar(_)
            | AppError::Email(_)
            | AppError::Internal(_) => AppError::Exposed(self.to_string()),
            other => other,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Calendar(e.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::SlotUnavailable, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Calendar(msg) => {
                tracing::error!("Calendar error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::CalendarFailure,
                    "Calendar service error".to_string(),
                )
            }
            AppError::Email(msg) => {
                tracing::error!("Email error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::EmailFailure,
                    "Email delivery error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
            AppError::Exposed(msg) => {
                tracing::error!("{}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure, msg.clone())
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
