//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// # Response Codes
///
/// - **302 Found**: `Location` set to the original URL
/// - **400 Bad Request**: Code is not 8 alphanumeric characters
/// - **404 Not Found**: Unknown code
/// - **410 Gone**: Link expired
///
/// Expired records are never deleted here; they keep answering 410 until
/// purged with `admin purge-expired`.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.redirect_resolver.resolve(&code).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]))
}

/// Handles `GET /r` (and `/r/` after trailing-slash trimming).
///
/// An empty code always fails the format check with `400 Bad Request`.
pub async fn empty_code_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let original_url = state.redirect_resolver.resolve("").await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]).into_response())
}
