use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Application-level error type
#[derive(Debug)]
pub enum AppError {
    /// Database error
    Database(sqlx::Error),
    /// Validation error (bad pagination parameters, malformed input)
    Validation(String),
    /// Requested user or login absent from the database
    NotFound(String),
    /// No authenticated session; rejected before any core logic runs
    Unauthorized(String),
    /// Internal server error
    Internal(String),
}

/// JSON body rendered for failed requests.
///
/// Mirrors the status-object convention of the JSON API: the `Status` field
/// carries the application-level code, independent of the HTTP status.
#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "Status")]
    status: i32,
    action: &'static str,
    message: String,
}

impl AppError {
    fn body_status(&self) -> i32 {
        match self {
            Self::Database(_) | Self::Internal(_) => 500,
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Unauthorized(_) => 401,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(e) => write!(f, "Database error: {e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody {
            status: self.body_status(),
            action: "error",
            message: self.to_string(),
        };

        match self {
            Self::Database(_) | Self::Internal(_) => {
                HttpResponse::InternalServerError().json(body)
            }
            Self::Validation(_) => HttpResponse::BadRequest().json(body),
            Self::NotFound(_) => HttpResponse::NotFound().json(body),
            Self::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}
