//! API route configuration.
//!
//! Every route is public. Rate limits are attached per route with
//! [`crate::api::middleware::rate_limit`].

use crate::api::handlers::{
    empty_code_handler, health_handler, redirect_handler, shorten_handler,
};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// All service routes.
///
/// # Endpoints
///
/// - `POST /urls`      - Create a short URL (create limit)
/// - `GET  /r/{code}`  - Redirect to the original URL (default limit)
/// - `GET  /r`         - Empty code, always 400 (default limit)
/// - `GET  /health`    - Store health check (not limited)
pub fn public_routes(state: &AppState) -> Router<AppState> {
    let create = Router::new()
        .route("/urls", post(shorten_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::create_layer,
        ));

    let redirect = Router::new()
        .route("/r", get(empty_code_handler))
        .route("/r/{code}", get(redirect_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::layer,
        ));

    Router::new()
        .merge(create)
        .merge(redirect)
        .route("/health", get(health_handler))
}
