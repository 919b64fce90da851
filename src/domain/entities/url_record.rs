//! UrlRecord entity representing a short code to target URL mapping.

use chrono::{DateTime, Utc};

/// A stored short link.
///
/// Records are created once and never updated. Expiry is evaluated at read
/// time by [`crate::domain::expiration::ExpirationPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub expiration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        expiration_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            expiration_date,
            created_at,
        }
    }
}

/// Input data for inserting a new record. The store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_code: String,
    pub expiration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl NewUrlRecord {
    /// Materializes the payload into a stored record with the given id.
    pub fn into_record(self, id: i64) -> UrlRecord {
        UrlRecord::new(
            id,
            self.original_url,
            self.short_code,
            self.expiration_date,
            self.created_at,
        )
    }
}
