//! In-process implementation of the record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{ConflictKind, InsertOutcome, RecordStore};
use crate::error::StoreError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    by_code: HashMap<String, UrlRecord>,
    code_by_url: HashMap<String, String>,
}

/// Record store backed by two hash maps under a single lock.
///
/// Both indexes are checked and updated while holding the write lock, which
/// makes [`RecordStore::insert_if_absent`] atomic. Used by tests and by
/// `STORE_BACKEND=memory`; contents are lost on restart.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: RwLock<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        debug!("Using MemoryRecordStore (records are not persisted)");
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        let inner = self.inner.read().await;

        Ok(inner
            .code_by_url
            .get(url)
            .and_then(|code| inner.by_code.get(code))
            .cloned())
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.inner.read().await.by_code.get(code).cloned())
    }

    async fn insert_if_absent(&self, record: NewUrlRecord) -> Result<InsertOutcome, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.code_by_url.contains_key(&record.original_url) {
            return Ok(InsertOutcome::Conflict(ConflictKind::DuplicateOriginalUrl));
        }
        if inner.by_code.contains_key(&record.short_code) {
            return Ok(InsertOutcome::Conflict(ConflictKind::DuplicateShortCode));
        }

        inner.next_id += 1;
        let stored = record.into_record(inner.next_id);

        inner
            .code_by_url
            .insert(stored.original_url.clone(), stored.short_code.clone());
        inner
            .by_code
            .insert(stored.short_code.clone(), stored.clone());

        Ok(InsertOutcome::Inserted(stored))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.by_code.len() as i64)
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;

        Ok(inner
            .by_code
            .values()
            .filter(|r| r.expiration_date <= now)
            .count() as i64)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;

        let expired: Vec<UrlRecord> = inner
            .by_code
            .values()
            .filter(|r| r.expiration_date <= now)
            .cloned()
            .collect();

        for record in &expired {
            inner.by_code.remove(&record.short_code);
            inner.code_by_url.remove(&record.original_url);
        }

        Ok(expired.len() as u64)
    }
}
