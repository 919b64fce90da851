//! Construction of public short URLs from a bare short code.

use axum::http::{HeaderMap, header};

/// Path prefix under which short codes are served.
pub const REDIRECT_PREFIX: &str = "r/";

/// Returns the public base URL (always ending in `/`).
///
/// Uses the configured `BASE_URL` when present. Otherwise the base is built
/// from the `Host` header (port kept), with the scheme taken from
/// `X-Forwarded-Proto` or defaulting to `http`. Without a usable `Host`
/// header the base is `/`, yielding a root-relative short URL.
pub fn short_url_base(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = configured {
        return with_trailing_slash(base);
    }

    let Some(host) = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
    else {
        return "/".to_string();
    };

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .filter(|s| matches!(*s, "http" | "https"))
        .unwrap_or("http");

    format!("{scheme}://{host}/")
}

/// Joins a base URL and a short code into the public short URL.
pub fn build_short_url(base: &str, code: &str) -> String {
    format!("{}{}{}", with_trailing_slash(base), REDIRECT_PREFIX, code)
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}
