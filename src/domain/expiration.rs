//! Fixed time-to-live policy for short links.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::UrlRecord;

/// Default lifetime of a short link.
pub const DEFAULT_TTL_DAYS: i64 = 30;

/// Computes and evaluates link expiry.
///
/// Both operations are pure. Reading a record never renews it, and an
/// expired record stays expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    ttl: Duration,
}

impl ExpirationPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn from_days(days: i64) -> Self {
        Self::new(Duration::days(days))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Expiry timestamp for a record created at `created_at`.
    pub fn compute_expiration(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.ttl
    }

    /// Returns true once `now` reaches the record's expiration date (inclusive).
    pub fn is_expired(&self, record: &UrlRecord, now: DateTime<Utc>) -> bool {
        now >= record.expiration_date
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::from_days(DEFAULT_TTL_DAYS)
    }
}
