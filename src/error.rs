//! Errors surfaced by the problem service.

use axum::http::StatusCode;
use thiserror::Error;

use crate::db::DbLockError;
use crate::domain::DomainError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("problem not found")]
    NotFound,

    /// No owner could be resolved for the request.
    #[error("unauthorized access to problem")]
    Unauthorized,

    /// The stored record changed between load and write.
    #[error("problem was modified by another request, reload and retry")]
    Conflict,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Unavailable(#[from] DbLockError),
}

impl ServiceError {
    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::InvalidScore(_)) => "INVALID_SCORE",
            Self::Domain(DomainError::InvalidPattern(_)) => "INVALID_PATTERN",
            Self::Domain(DomainError::InvalidDifficulty(_)) => "INVALID_DIFFICULTY",
            Self::Domain(DomainError::Validation(_)) => "INVALID_PAYLOAD",
            Self::NotFound => "PROBLEM_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict => "STALE_WRITE",
            Self::Database(_) | Self::Unavailable(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Database(_) | Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients; internal details stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Unavailable(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}
