use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Reasons a request is refused by the authorization gate. All map to 403.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("received invalid auth header")]
    MalformedHeader,

    #[error("identity provider unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("decode identity provider response: {0}")]
    UpstreamDecodeError(String),

    #[error("not in allowed list")]
    NotAllowed,

    #[error("identity provider returned an incomplete identity")]
    IncompleteIdentity,

    #[error("user not found in db")]
    NotRegistered,
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("forbidden: {0}")]
    Auth(#[from] AuthError),

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{entity} already exists")]
    Conflict { entity: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::FORBIDDEN,
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::LockPoisoned | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Plain-text body carrying the human readable message
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Check if a rusqlite error is a UNIQUE constraint violation
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _)
        if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}
