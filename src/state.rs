//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::api::middleware::rate_limit::RateLimiter;
use crate::application::services::{RedirectResolver, ShorteningService};
use crate::domain::repositories::RecordStore;

/// State shared by all handlers.
///
/// Built once at startup; the record store is constructed there and passed
/// explicitly to both services.
#[derive(Clone)]
pub struct AppState {
    pub shortening_service: Arc<ShorteningService>,
    pub redirect_resolver: Arc<RedirectResolver>,
    pub store: Arc<dyn RecordStore>,
    /// Public prefix for short URLs; `None` derives it from the `Host` header.
    pub base_url: Option<String>,
    pub limits: RateLimits,
}

/// Per-client rate limiters applied before handlers run.
#[derive(Clone)]
pub struct RateLimits {
    /// Applied to redirects.
    pub default: Arc<dyn RateLimiter>,
    /// Applied to link creation in place of `default`.
    pub create: Arc<dyn RateLimiter>,
    /// Read the client IP from proxy headers instead of the socket peer.
    pub behind_proxy: bool,
}
