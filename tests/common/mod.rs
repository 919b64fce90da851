#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

use snaplink::api::routes::public_routes;
use snaplink::application::services::CollisionPolicy;
use snaplink::config::{Config, StoreBackend};
use snaplink::domain::entities::{NewUrlRecord, UrlRecord};
use snaplink::domain::repositories::{ConflictKind, InsertOutcome, RecordStore};
use snaplink::error::StoreError;
use snaplink::infrastructure::persistence::MemoryRecordStore;
use snaplink::server::build_state;
use snaplink::state::AppState;

pub const TEST_BASE_URL: &str = "http://sho.rt/";

pub fn test_config() -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        database_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        base_url: Some(TEST_BASE_URL.to_string()),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        link_ttl_days: 30,
        collision_policy: CollisionPolicy::Reject,
        rate_limit_per_minute: 1000,
        create_rate_limit_per_minute: 1000,
        behind_proxy: false,
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 1,
        db_max_lifetime: 1,
    }
}

/// State over a fresh in-memory store; the store is returned for seeding.
pub fn create_test_state() -> (AppState, Arc<MemoryRecordStore>) {
    create_test_state_with_config(test_config())
}

pub fn create_test_state_with_config(config: Config) -> (AppState, Arc<MemoryRecordStore>) {
    let store = Arc::new(MemoryRecordStore::new());
    let state = build_state(&config, store.clone()).unwrap();
    (state, store)
}

pub fn create_state_over(store: Arc<dyn RecordStore>) -> AppState {
    build_state(&test_config(), store).unwrap()
}

/// Test server over the full route table, with every request coming from
/// 127.0.0.1.
pub fn test_server(state: AppState) -> TestServer {
    let app: Router = public_routes(&state)
        .layer(MockConnectInfoLayer)
        .with_state(state);

    TestServer::new(app).unwrap()
}

pub async fn seed_record(
    store: &MemoryRecordStore,
    url: &str,
    code: &str,
    created_at: DateTime<Utc>,
    expiration_date: DateTime<Utc>,
) -> UrlRecord {
    let outcome = store
        .insert_if_absent(NewUrlRecord {
            original_url: url.to_string(),
            short_code: code.to_string(),
            expiration_date,
            created_at,
        })
        .await
        .unwrap();

    match outcome {
        InsertOutcome::Inserted(record) => record,
        InsertOutcome::Conflict(kind) => panic!("seed conflicted: {kind:?}"),
    }
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Store whose behaviour is fixed per test.
pub enum BrokenStore {
    /// Every insert collides on the short code of another URL.
    CollidingCodes,
    /// Every call fails as if the database were unreachable.
    Unavailable,
}

impl BrokenStore {
    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl RecordStore for BrokenStore {
    async fn find_by_original_url(&self, _url: &str) -> Result<Option<UrlRecord>, StoreError> {
        match self {
            BrokenStore::CollidingCodes => Ok(None),
            BrokenStore::Unavailable => self.fail(),
        }
    }

    async fn find_by_short_code(&self, _code: &str) -> Result<Option<UrlRecord>, StoreError> {
        match self {
            BrokenStore::CollidingCodes => Ok(None),
            BrokenStore::Unavailable => self.fail(),
        }
    }

    async fn insert_if_absent(&self, _record: NewUrlRecord) -> Result<InsertOutcome, StoreError> {
        match self {
            BrokenStore::CollidingCodes => {
                Ok(InsertOutcome::Conflict(ConflictKind::DuplicateShortCode))
            }
            BrokenStore::Unavailable => self.fail(),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self {
            BrokenStore::CollidingCodes => Ok(()),
            BrokenStore::Unavailable => self.fail(),
        }
    }

    async fn count(&self) -> Result<i64, StoreError> {
        match self {
            BrokenStore::CollidingCodes => Ok(0),
            BrokenStore::Unavailable => self.fail(),
        }
    }

    async fn count_expired(&self, _now: DateTime<Utc>) -> Result<i64, StoreError> {
        self.fail()
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<u64, StoreError> {
        self.fail()
    }
}
