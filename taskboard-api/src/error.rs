//! Error handling for the API server.
//!
//! Handlers return `Result<T, ApiError>`; `ApiError` maps each failure onto
//! an HTTP status and a JSON body of the form `{error, message}`. No error
//! here is fatal to the process — everything is request-scoped.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use taskboard_shared::auth::password::PasswordError;
use taskboard_shared::models::task::InvalidStatus;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Registration with a username that already exists (409)
    DuplicateUsername,

    /// Registration with a password shorter than the minimum (422)
    WeakPassword(String),

    /// Registration where password and repeat differ (422)
    PasswordMismatch,

    /// Request field validation failed (422)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Login with an unknown username or wrong password (401).
    /// The two cases are deliberately indistinguishable.
    InvalidCredentials,

    /// A protected operation ran without an authenticated user (401)
    Unauthenticated,

    /// Task creation with a title that already exists on the board (409)
    DuplicateTask,

    /// Update/delete of a title the caller does not own or that does not
    /// exist (404)
    TaskNotFound(String),

    /// A status value outside todo/doing/done (422)
    InvalidStatus(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "duplicate_task", "invalid_credentials")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::DuplicateUsername => write!(f, "Username already exists"),
            ApiError::WeakPassword(msg) => write!(f, "Weak password: {}", msg),
            ApiError::PasswordMismatch => write!(f, "Passwords do not match"),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InvalidCredentials => write!(f, "Invalid username or password"),
            ApiError::Unauthenticated => write!(f, "Authentication required"),
            ApiError::DuplicateTask => write!(f, "Task already exists"),
            ApiError::TaskNotFound(title) => write!(f, "No task titled {:?}", title),
            ApiError::InvalidStatus(status) => write!(f, "Invalid task status: {:?}", status),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::DuplicateUsername => (
                StatusCode::CONFLICT,
                "duplicate_username",
                "This username already exists! Please choose a new username".to_string(),
                None,
            ),
            ApiError::WeakPassword(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "weak_password", msg, None)
            }
            ApiError::PasswordMismatch => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "password_mismatch",
                "Passwords do not match. Please try again".to_string(),
                None,
            ),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "The username or password you entered is not correct".to_string(),
                None,
            ),
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "Authentication required".to_string(),
                None,
            ),
            ApiError::DuplicateTask => (
                StatusCode::CONFLICT,
                "duplicate_task",
                "This task already exists".to_string(),
                None,
            ),
            ApiError::TaskNotFound(title) => (
                StatusCode::NOT_FOUND,
                "task_not_found",
                format!("No task titled {:?}", title),
                None,
            ),
            ApiError::InvalidStatus(status) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_status",
                format!("{:?} is not a valid status (expected todo, doing or done)", status),
                None,
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors.
///
/// Unique-constraint violations are mapped back onto the domain: the
/// username constraint means a duplicate registration, the title constraint
/// a duplicate task. They backstop the handlers' explicit pre-checks under
/// concurrent writers.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                match db_err.constraint() {
                    Some("users_username_key") => ApiError::DuplicateUsername,
                    Some("tasks_title_key") => ApiError::DuplicateTask,
                    _ => ApiError::InternalError(format!("Database error: {}", db_err)),
                }
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password hashing errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert status parse errors to API errors
impl From<InvalidStatus> for ApiError {
    fn from(err: InvalidStatus) -> Self {
        ApiError::InvalidStatus(err.0)
    }
}
