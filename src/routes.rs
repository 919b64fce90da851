//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /urls`      - Shorten a URL
//! - `GET  /r/{code}`  - Short link redirect
//! - `GET  /health`    - Health check
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-client token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Rate limiters and the proxy setting travel inside `state`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = api::routes::public_routes(&state)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
