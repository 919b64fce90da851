//! Per-client rate limiting.
//!
//! Handlers never see rate limiting: the [`RateLimiter`] capability is
//! consulted by [`layer`] and [`create_layer`] before a request reaches them.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use tracing::warn;

use crate::{error::AppError, state::AppState};

/// Decides whether a client may make another request.
pub trait RateLimiter: Send + Sync {
    /// Records a request from `client_key` and returns whether it is allowed.
    fn allow(&self, client_key: &str) -> bool;

    /// Drops state for clients that have been idle long enough to be at full
    /// quota again. Called periodically by the server.
    fn housekeeping(&self) {}
}

/// Token bucket (GCRA) limiter keyed by client.
///
/// # Limits
///
/// - **Rate**: `limit` requests per minute
/// - **Burst**: `limit` requests
pub struct GovernorRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl GovernorRateLimiter {
    pub fn per_minute(limit: NonZeroU32) -> Self {
        Self {
            limiter: governor::RateLimiter::keyed(Quota::per_minute(limit)),
        }
    }
}

impl RateLimiter for GovernorRateLimiter {
    fn allow(&self, client_key: &str) -> bool {
        self.limiter.check_key(&client_key.to_string()).is_ok()
    }

    fn housekeeping(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }
}

/// Applies the default per-client limit.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    check(st.limits.default.as_ref(), &req, st.limits.behind_proxy)?;
    Ok(next.run(req).await)
}

/// Applies the stricter link-creation limit.
pub async fn create_layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    check(st.limits.create.as_ref(), &req, st.limits.behind_proxy)?;
    Ok(next.run(req).await)
}

fn check(limiter: &dyn RateLimiter, req: &Request, behind_proxy: bool) -> Result<(), AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(req.headers(), peer, behind_proxy);

    if limiter.allow(&key) {
        Ok(())
    } else {
        warn!(client = %key, path = %req.uri().path(), "Rate limit exceeded");
        Err(AppError::too_many_requests())
    }
}

/// Identifies the client for rate limiting.
///
/// Proxy headers (`X-Forwarded-For`, then `X-Real-IP`) are only trusted when
/// `behind_proxy` is set. Falls back to the socket peer IP, then `"unknown"`.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        if let Some(ip) = forwarded.or_else(real_ip) {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn limit(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_limiter_allows_burst_then_rejects() {
        let limiter = GovernorRateLimiter::per_minute(limit(3));

        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_limiter_keys_are_independent() {
        let limiter = GovernorRateLimiter::per_minute(limit(1));

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.2"));
    }

    #[test]
    fn test_client_key_uses_peer_by_default() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));
        let peer: SocketAddr = "127.0.0.1:12345".parse().unwrap();

        assert_eq!(client_key(&headers, Some(peer), false), "127.0.0.1");
    }

    #[test]
    fn test_client_key_behind_proxy() {
        let peer: SocketAddr = "127.0.0.1:12345".parse().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers, Some(peer), true), "203.0.113.7");

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_key(&headers, Some(peer), true), "198.51.100.2");

        assert_eq!(client_key(&HeaderMap::new(), Some(peer), true), "127.0.0.1");
    }

    #[test]
    fn test_client_key_unknown() {
        assert_eq!(client_key(&HeaderMap::new(), None, false), "unknown");
    }
}
