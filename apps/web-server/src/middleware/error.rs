//! Error handling - application errors rendered as HTML pages.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use std::fmt;

use crate::pages;

/// Application-level error type. Every failure resolves at the handler
/// boundary into one of these, and from there into an HTTP response.
#[derive(Debug)]
pub enum AppError {
    /// The requested page does not exist; carries the attempted path.
    NotFound(String),
    /// An unexpected fault; the detail is logged, never shown.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(path) => write!(f, "Not found: {}", path),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound(path) => pages::not_found(path),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                pages::server_error()
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(body)
    }
}

// Conversion from repository errors
impl From<gazette_core::error::RepoError> for AppError {
    fn from(err: gazette_core::error::RepoError) -> Self {
        match err {
            gazette_core::error::RepoError::NotFound => {
                AppError::Internal("Row vanished mid-operation".to_string())
            }
            gazette_core::error::RepoError::Constraint(msg) => AppError::Internal(msg),
            gazette_core::error::RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            gazette_core::error::RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
