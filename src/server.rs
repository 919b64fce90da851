//! HTTP server initialization and runtime setup.
//!
//! Builds the record store, services and rate limiters from [`Config`], then
//! runs the Axum server until Ctrl-C or SIGTERM.

use crate::api::middleware::rate_limit::{GovernorRateLimiter, RateLimiter};
use crate::application::services::{RedirectResolver, ShorteningService};
use crate::config::{Config, StoreBackend};
use crate::domain::expiration::ExpirationPolicy;
use crate::domain::repositories::RecordStore;
use crate::infrastructure::persistence::{MemoryRecordStore, PgRecordStore};
use crate::routes::app_router;
use crate::state::{AppState, RateLimits};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How often idle rate-limiter entries are dropped.
const LIMITER_HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Record store (PostgreSQL pool with migrations, or in-memory)
/// - Shortening service and redirect resolver sharing that store
/// - Per-client rate limiters and their housekeeping task
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config).await?;
    let state = build_state(&config, store)?;

    spawn_limiter_housekeeping(&state.limits);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Creates the configured record store.
pub async fn build_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; records are lost on restart");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to migrate")?;

            Ok(Arc::new(PgRecordStore::new(Arc::new(pool))))
        }
    }
}

/// Wires services and rate limiters around an already built store.
pub fn build_state(config: &Config, store: Arc<dyn RecordStore>) -> Result<AppState> {
    let expiration = ExpirationPolicy::from_days(config.link_ttl_days);
    info!(
        ttl_hours = expiration.ttl().num_hours(),
        policy = ?config.collision_policy,
        "Shortening services ready"
    );

    let shortening_service = Arc::new(ShorteningService::new(
        store.clone(),
        expiration,
        config.collision_policy,
    ));
    let redirect_resolver = Arc::new(RedirectResolver::new(store.clone(), expiration));

    let default_limit = NonZeroU32::new(config.rate_limit_per_minute)
        .context("RATE_LIMIT_PER_MINUTE must be at least 1")?;
    let create_limit = NonZeroU32::new(config.create_rate_limit_per_minute)
        .context("CREATE_RATE_LIMIT_PER_MINUTE must be at least 1")?;

    Ok(AppState {
        shortening_service,
        redirect_resolver,
        store,
        base_url: config.base_url.clone(),
        limits: RateLimits {
            default: Arc::new(GovernorRateLimiter::per_minute(default_limit)),
            create: Arc::new(GovernorRateLimiter::per_minute(create_limit)),
            behind_proxy: config.behind_proxy,
        },
    })
}

fn spawn_limiter_housekeeping(limits: &RateLimits) {
    let limiters: [Arc<dyn RateLimiter>; 2] = [limits.default.clone(), limits.create.clone()];

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_HOUSEKEEPING_INTERVAL);
        loop {
            interval.tick().await;
            for limiter in &limiters {
                limiter.housekeeping();
            }
        }
    });
}

/// Completes on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received, draining connections");
}
