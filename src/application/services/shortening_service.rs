//! Short link creation service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::expiration::ExpirationPolicy;
use crate::domain::repositories::{ConflictKind, InsertOutcome, RecordStore};
use crate::error::{ConflictError, ShortenError, StoreError};
use crate::utils::code_generator::generate_code_with_salt;
use crate::utils::url_validator::validate_url;

/// What to do when a freshly derived code already belongs to another URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Fail with [`ConflictError::DuplicateShortCode`].
    #[default]
    Reject,
    /// Re-derive the code with a numeric salt, up to `max_attempts` times.
    Probe { max_attempts: u32 },
}

/// Result of a successful [`ShorteningService::shorten`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub record: UrlRecord,
    /// `false` when an existing record for the URL was returned.
    pub created: bool,
}

/// Service for creating short links.
///
/// Validates input, derives the code, and relies on
/// [`RecordStore::insert_if_absent`] for uniqueness. Holds no lock of its own.
pub struct ShorteningService {
    store: Arc<dyn RecordStore>,
    expiration: ExpirationPolicy,
    collision_policy: CollisionPolicy,
}

impl ShorteningService {
    /// Creates a new shortening service.
    pub fn new(
        store: Arc<dyn RecordStore>,
        expiration: ExpirationPolicy,
        collision_policy: CollisionPolicy,
    ) -> Self {
        Self {
            store,
            expiration,
            collision_policy,
        }
    }

    /// Shortens `raw_url` using the current time as creation time.
    ///
    /// See [`Self::shorten_at`].
    pub async fn shorten(&self, raw_url: &str) -> Result<Shortened, ShortenError> {
        self.shorten_at(raw_url, Utc::now()).await
    }

    /// Shortens `raw_url`, treating `now` as the creation time.
    ///
    /// # Idempotence
    ///
    /// If a record already exists for the trimmed URL it is returned as-is,
    /// with its original code and expiration date. A concurrent caller that
    /// loses the insert race re-reads the winner's record.
    ///
    /// # Errors
    ///
    /// - [`ShortenError::Validation`] for empty, malformed, or overlong input
    /// - [`ShortenError::Conflict`] when the derived code belongs to another
    ///   URL and the collision policy could not resolve it
    /// - [`ShortenError::Store`] on backend failure
    pub async fn shorten_at(
        &self,
        raw_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Shortened, ShortenError> {
        let url = validate_url(raw_url)?;

        if let Some(existing) = self.store.find_by_original_url(url).await? {
            debug!(code = %existing.short_code, "Returning existing short link");
            return Ok(Shortened {
                record: existing,
                created: false,
            });
        }

        let expiration_date = self.expiration.compute_expiration(now);
        let max_attempts = match self.collision_policy {
            CollisionPolicy::Reject => 0,
            CollisionPolicy::Probe { max_attempts } => max_attempts,
        };

        for attempt in 0..=max_attempts {
            let new_record = NewUrlRecord {
                original_url: url.to_string(),
                short_code: generate_code_with_salt(url, attempt),
                expiration_date,
                created_at: now,
            };

            match self.store.insert_if_absent(new_record).await? {
                InsertOutcome::Inserted(record) => {
                    info!(code = %record.short_code, "Created short link");
                    return Ok(Shortened {
                        record,
                        created: true,
                    });
                }
                InsertOutcome::Conflict(ConflictKind::DuplicateOriginalUrl) => {
                    debug!("Lost insert race, re-reading existing record");
                    return self.refetch(url).await;
                }
                InsertOutcome::Conflict(ConflictKind::DuplicateShortCode) => {
                    warn!(
                        attempt,
                        policy = ?self.collision_policy,
                        "Short code collision with a different URL"
                    );
                }
            }
        }

        Err(ConflictError::DuplicateShortCode.into())
    }

    async fn refetch(&self, url: &str) -> Result<Shortened, ShortenError> {
        let record = self.store.find_by_original_url(url).await?.ok_or_else(|| {
            StoreError::Inconsistent(
                "insert reported duplicate URL but no record was found".to_string(),
            )
        })?;

        Ok(Shortened {
            record,
            created: false,
        })
    }
}
