//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use tracing::debug;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_url::{build_short_url, short_url_base};

/// Creates (or returns the existing) short URL for an original URL.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// { "original_url": "https://example.com/some/long/path" }
/// ```
///
/// `originalUrl` is accepted as an alias.
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "short_url": "https://sho.rt/r/4fR9xQ2b",
///   "expiration_date": "2026-11-16T09:30:00Z"
/// }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: New record stored
/// - **200 OK**: URL was already shortened; the existing record is returned
/// - **400 Bad Request**: Missing or unparsable payload, missing parameter,
///   invalid or oversized URL
/// - **409 Conflict**: Short code taken by a different URL
/// - **500 Internal Server Error**: Store failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "Rejected shorten payload");
            return Err(AppError::bad_request("Missing JSON payload"));
        }
    };

    let Some(original_url) = request.original_url else {
        return Err(AppError::bad_request(
            "Missing required parameter: original_url",
        ));
    };

    let shortened = state.shortening_service.shorten(&original_url).await?;

    let base = short_url_base(state.base_url.as_deref(), &headers);
    let short_url = build_short_url(&base, &shortened.record.short_code);

    let status = if shortened.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ShortenResponse::new(
            short_url,
            shortened.record.expiration_date,
        )),
    ))
}
