//! Repository trait for short link records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::StoreError;

/// Which uniqueness constraint rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    DuplicateOriginalUrl,
    DuplicateShortCode,
}

/// Result of [`RecordStore::insert_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(UrlRecord),
    Conflict(ConflictKind),
}

/// Durable storage for [`UrlRecord`]s.
///
/// The store is the only component that mutates records and the only place
/// uniqueness of `original_url` and `short_code` is enforced.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRecordStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryRecordStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Finds the record for an exact original URL.
    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Finds the record for a short code.
    async fn find_by_short_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Inserts a record unless either unique key is already taken.
    ///
    /// Atomic with respect to both constraints: of several concurrent inserts
    /// for the same original URL exactly one returns
    /// [`InsertOutcome::Inserted`], the rest receive
    /// [`ConflictKind::DuplicateOriginalUrl`]. When both keys clash,
    /// `DuplicateOriginalUrl` is reported.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only on backend failure; constraint violations
    /// are reported through [`InsertOutcome::Conflict`].
    async fn insert_if_absent(&self, record: NewUrlRecord) -> Result<InsertOutcome, StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Counts all stored records, expired ones included.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Counts records whose expiration date is at or before `now`.
    async fn count_expired(&self, now: DateTime<Utc>) -> Result<i64, StoreError>;

    /// Deletes records whose expiration date is at or before `now`.
    ///
    /// Only used by the admin reaper; the request path never deletes.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}
