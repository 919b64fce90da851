//! Mapping of PostgreSQL unique violations onto [`ConflictKind`].

use crate::domain::repositories::ConflictKind;

/// Unique constraint on `url_records.original_url`.
pub const ORIGINAL_URL_CONSTRAINT: &str = "url_records_original_url_key";

/// Unique constraint on `url_records.short_code`.
pub const SHORT_CODE_CONSTRAINT: &str = "url_records_short_code_key";

/// Returns the conflict kind if `e` is a unique violation on one of the
/// `url_records` constraints.
pub fn unique_violation_kind(e: &sqlx::Error) -> Option<ConflictKind> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    constraint_kind(db_err.constraint()?)
}

fn constraint_kind(constraint: &str) -> Option<ConflictKind> {
    match constraint {
        ORIGINAL_URL_CONSTRAINT => Some(ConflictKind::DuplicateOriginalUrl),
        SHORT_CODE_CONSTRAINT => Some(ConflictKind::DuplicateShortCode),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_kind() {
        assert_eq!(
            constraint_kind("url_records_original_url_key"),
            Some(ConflictKind::DuplicateOriginalUrl)
        );
        assert_eq!(
            constraint_kind("url_records_short_code_key"),
            Some(ConflictKind::DuplicateShortCode)
        );
        assert_eq!(constraint_kind("url_records_pkey"), None);
    }

    #[test]
    fn test_non_database_error_is_not_a_conflict() {
        assert_eq!(unique_violation_kind(&sqlx::Error::RowNotFound), None);
    }
}
