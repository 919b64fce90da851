//! DTOs for link shortening endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Request to shorten a single URL.
///
/// The field is optional so that a missing key produces the dedicated
/// "Missing required parameter" response instead of a generic JSON rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ShortenRequest {
    #[serde(alias = "originalUrl")]
    pub original_url: Option<String>,
}

/// Successful shortening result.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub success: bool,
    pub short_url: String,
    /// RFC 3339 UTC timestamp with second precision, e.g. `2026-11-16T09:30:00Z`.
    pub expiration_date: String,
}

impl ShortenResponse {
    pub fn new(short_url: String, expiration_date: DateTime<Utc>) -> Self {
        Self {
            success: true,
            short_url,
            expiration_date: expiration_date.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
