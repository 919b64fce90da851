//! Deterministic short code derivation and code shape validation.
//!
//! A short code is derived from the SHA-256 digest of the original URL: the
//! first eight digest bytes are read as a big-endian integer and rendered as
//! eight base-62 digits. The same URL therefore always maps to the same code.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

/// Length of every short code.
pub const CODE_LENGTH: usize = 8;

/// Alphabet used for short codes.
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Compiled regex for short code shape validation.
static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{8}$").expect("short code regex is valid"));

/// Derives the short code for a URL.
///
/// # Examples
///
/// ```
/// use snaplink::utils::code_generator::generate_code;
///
/// let code = generate_code("https://example.com/page");
/// assert_eq!(code.len(), 8);
/// assert_eq!(code, generate_code("https://example.com/page"));
/// ```
pub fn generate_code(original_url: &str) -> String {
    encode_digest(&Sha256::digest(original_url.as_bytes()))
}

/// Derives an alternative code for collision probing.
///
/// `attempt == 0` yields the same code as [`generate_code`]; higher attempts
/// hash the URL together with the attempt number.
pub fn generate_code_with_salt(original_url: &str, attempt: u32) -> String {
    if attempt == 0 {
        return generate_code(original_url);
    }

    let mut hasher = Sha256::new();
    hasher.update(original_url.as_bytes());
    hasher.update([0u8]);
    hasher.update(attempt.to_string().as_bytes());
    encode_digest(&hasher.finalize())
}

/// Returns true if `code` is exactly eight ASCII alphanumerics.
pub fn is_valid_code(code: &str) -> bool {
    SHORT_CODE_REGEX.is_match(code)
}

fn encode_digest(digest: &[u8]) -> String {
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let mut value = u64::from_be_bytes(prefix);

    let mut out = [b'0'; CODE_LENGTH];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value % 62) as usize];
        value /= 62;
    }

    out.iter().map(|&b| b as char).collect()
}
