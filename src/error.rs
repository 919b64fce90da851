//! Error types for core operations and their HTTP mapping.
//!
//! Core components return typed errors ([`ValidationError`], [`LookupError`],
//! [`ConflictError`], [`StoreError`]). The transport layer converts them into
//! [`AppError`], which renders the `{ "success": false, "reason": ... }` body
//! with the matching status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Input rejected by [`crate::application::services::ShorteningService`].
///
/// Checked in declaration order; the first failing rule wins.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Original URL cannot be empty")]
    MissingInput,
    #[error("Invalid URL format")]
    InvalidFormat,
    #[error("URL exceeds maximum length of 2048 characters")]
    TooLong,
}

/// Uniqueness conflict that could not be resolved internally.
///
/// A duplicate original URL is always resolved by re-reading the winning
/// record, so only the digest-collision case is ever surfaced.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConflictError {
    #[error("Short URL already exists")]
    DuplicateShortCode,
}

/// Failure of the storage backend itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store returned inconsistent state: {0}")]
    Inconsistent(String),
}

/// Errors returned by [`crate::application::services::ShorteningService::shorten`].
#[derive(Debug, Error)]
pub enum ShortenError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors returned by [`crate::application::services::RedirectResolver::resolve`].
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid short URL format")]
    InvalidCodeFormat,
    #[error("URL not found")]
    NotFound,
    #[error("URL expired")]
    Expired,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    reason: String,
}

/// Transport-level error rendered as a JSON failure response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Conflict { message: String },
    #[error("{message}")]
    Gone { message: String },
    #[error("{message}")]
    TooManyRequests { message: String },
    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
    pub fn gone(message: impl Into<String>) -> Self {
        Self::Gone {
            message: message.into(),
        }
    }
    pub fn too_many_requests() -> Self {
        Self::TooManyRequests {
            message: "Too many requests. Try again later.".to_string(),
        }
    }
    pub fn internal() -> Self {
        Self::Internal {
            message: "Internal server error".to_string(),
        }
    }

    /// HTTP status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Gone { .. } => StatusCode::GONE,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            reason: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "Record store failure");
        AppError::internal()
    }
}

impl From<ShortenError> for AppError {
    fn from(e: ShortenError) -> Self {
        match e {
            ShortenError::Validation(v) => AppError::bad_request(v.to_string()),
            ShortenError::Conflict(c) => AppError::conflict(c.to_string()),
            ShortenError::Store(s) => s.into(),
        }
    }
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        let message = e.to_string();
        match e {
            LookupError::InvalidCodeFormat => AppError::bad_request(message),
            LookupError::NotFound => AppError::not_found(message),
            LookupError::Expired => AppError::gone(message),
            LookupError::Store(s) => s.into(),
        }
    }
}
