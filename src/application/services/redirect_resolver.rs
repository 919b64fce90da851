//! Short code resolution service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::expiration::ExpirationPolicy;
use crate::domain::repositories::RecordStore;
use crate::error::LookupError;
use crate::utils::code_generator::is_valid_code;

/// Resolves short codes to their target URLs.
///
/// Read-only: expired records are reported as such and left in storage.
pub struct RedirectResolver {
    store: Arc<dyn RecordStore>,
    expiration: ExpirationPolicy,
}

impl RedirectResolver {
    /// Creates a new resolver.
    pub fn new(store: Arc<dyn RecordStore>, expiration: ExpirationPolicy) -> Self {
        Self { store, expiration }
    }

    /// Resolves `code` against the current time.
    pub async fn resolve(&self, code: &str) -> Result<String, LookupError> {
        self.resolve_at(code, Utc::now()).await
    }

    /// Resolves `code` as of `now`.
    ///
    /// # Errors
    ///
    /// - [`LookupError::InvalidCodeFormat`] if `code` is not eight ASCII
    ///   alphanumerics; the store is not queried
    /// - [`LookupError::NotFound`] if no record has this code
    /// - [`LookupError::Expired`] if `now` is at or past the expiration date
    /// - [`LookupError::Store`] on backend failure
    pub async fn resolve_at(&self, code: &str, now: DateTime<Utc>) -> Result<String, LookupError> {
        if !is_valid_code(code) {
            return Err(LookupError::InvalidCodeFormat);
        }

        let record = self
            .store
            .find_by_short_code(code)
            .await?
            .ok_or(LookupError::NotFound)?;

        if self.expiration.is_expired(&record, now) {
            debug!(code, expired_at = %record.expiration_date, "Short link expired");
            return Err(LookupError::Expired);
        }

        Ok(record.original_url)
    }
}
