//! Validation of URLs submitted for shortening.

use url::Url;

use crate::error::ValidationError;

/// Maximum accepted URL length, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Trims and validates a raw URL.
///
/// Rules are applied in order and the first failure is returned:
///
/// 1. Not empty after trimming whitespace
/// 2. Contains no control or whitespace characters, and parses as an
///    absolute `http`/`https` URL with a host
/// 3. At most [`MAX_URL_LENGTH`] characters
///
/// The trimmed input is returned verbatim; no other normalization happens.
pub fn validate_url(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::MissingInput);
    }

    if !is_well_formed(trimmed) {
        return Err(ValidationError::InvalidFormat);
    }

    if trimmed.chars().count() > MAX_URL_LENGTH {
        return Err(ValidationError::TooLong);
    }

    Ok(trimmed)
}

fn is_well_formed(input: &str) -> bool {
    // The URL parser drops tabs and newlines and escapes other controls, but
    // the input is stored as given and must be usable as a Location header.
    if input.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return false;
    }

    let Ok(url) = Url::parse(input) else {
        return false;
    };

    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_of_length(len: usize) -> String {
        let prefix = "https://example.com/";
        format!("{prefix}{}", "a".repeat(len - prefix.len()))
    }

    #[test]
    fn test_valid_url_is_returned_trimmed() {
        assert_eq!(
            validate_url("  https://example.com/page \n"),
            Ok("https://example.com/page")
        );
    }

    #[test]
    fn test_empty_and_blank_are_missing() {
        assert_eq!(validate_url(""), Err(ValidationError::MissingInput));
        assert_eq!(validate_url("   \t"), Err(ValidationError::MissingInput));
    }

    #[test]
    fn test_relative_and_garbage_are_invalid() {
        assert_eq!(validate_url("not-a-url"), Err(ValidationError::InvalidFormat));
        assert_eq!(validate_url("/relative/path"), Err(ValidationError::InvalidFormat));
        assert_eq!(validate_url("example.com"), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_non_http_schemes_are_invalid() {
        assert_eq!(
            validate_url("ftp://example.com/file"),
            Err(ValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_url("javascript:alert(1)"),
            Err(ValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_url("mailto:someone@example.com"),
            Err(ValidationError::InvalidFormat)
        );
    }

    #[test]
    fn test_embedded_control_and_whitespace_are_invalid() {
        for input in [
            "https://example.com/a\nb",
            "https://example.com/a\rb",
            "https://example.com/a\tb",
            "https://example.com/a\u{0}b",
            "https://example.com/a\u{7f}b",
            "https://example.com/a b",
            "https://exa mple.com/",
            "https://example.com/a\u{a0}b",
        ] {
            assert_eq!(
                validate_url(input),
                Err(ValidationError::InvalidFormat),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_percent_encoded_controls_are_accepted() {
        assert_eq!(
            validate_url("https://example.com/a%0Ab%20c"),
            Ok("https://example.com/a%0Ab%20c")
        );
    }

    #[test]
    fn test_max_length_boundary() {
        let at_limit = url_of_length(MAX_URL_LENGTH);
        assert_eq!(at_limit.chars().count(), 2048);
        assert!(validate_url(&at_limit).is_ok());

        let over_limit = url_of_length(MAX_URL_LENGTH + 1);
        assert_eq!(validate_url(&over_limit), Err(ValidationError::TooLong));
    }

    #[test]
    fn test_length_counts_characters_after_trim() {
        let padded = format!("   {}   ", url_of_length(MAX_URL_LENGTH));
        assert!(validate_url(&padded).is_ok());
    }
}
