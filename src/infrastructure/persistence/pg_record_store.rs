//! PostgreSQL implementation of the record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{ConflictKind, InsertOutcome, RecordStore};
use crate::error::StoreError;
use crate::utils::db_error::unique_violation_kind;

#[derive(sqlx::FromRow)]
struct UrlRecordRow {
    id: i64,
    original_url: String,
    short_code: String,
    expiration_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<UrlRecordRow> for UrlRecord {
    fn from(r: UrlRecordRow) -> Self {
        UrlRecord::new(
            r.id,
            r.original_url,
            r.short_code,
            r.expiration_date,
            r.created_at,
        )
    }
}

/// PostgreSQL record store.
///
/// Uniqueness is enforced by the `url_records_original_url_key` and
/// `url_records_short_code_key` constraints, so concurrent inserts from any
/// number of connections converge on a single row per URL.
pub struct PgRecordStore {
    pool: Arc<PgPool>,
}

impl PgRecordStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRecordRow>(
            r#"
            SELECT id, original_url, short_code, expiration_date, created_at
            FROM url_records
            WHERE original_url = $1
            "#,
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRecordRow>(
            r#"
            SELECT id, original_url, short_code, expiration_date, created_at
            FROM url_records
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn insert_if_absent(&self, record: NewUrlRecord) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query_as::<_, UrlRecordRow>(
            r#"
            INSERT INTO url_records (original_url, short_code, expiration_date, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, original_url, short_code, expiration_date, created_at
            "#,
        )
        .bind(&record.original_url)
        .bind(&record.short_code)
        .bind(record.expiration_date)
        .bind(record.created_at)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(InsertOutcome::Inserted(row.into())),
            Err(e) => match unique_violation_kind(&e) {
                // Postgres reports whichever index it checked first; prefer the
                // resolvable conflict when the URL row exists too.
                Some(ConflictKind::DuplicateShortCode) => {
                    if self
                        .find_by_original_url(&record.original_url)
                        .await?
                        .is_some()
                    {
                        Ok(InsertOutcome::Conflict(ConflictKind::DuplicateOriginalUrl))
                    } else {
                        Ok(InsertOutcome::Conflict(ConflictKind::DuplicateShortCode))
                    }
                }
                Some(kind) => Ok(InsertOutcome::Conflict(kind)),
                None => Err(e.into()),
            },
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_records")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<i64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM url_records WHERE expiration_date <= $1")
                .bind(now)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM url_records WHERE expiration_date <= $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
