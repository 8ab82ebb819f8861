//! Alias token generation and normalization.
//!
//! Generated tokens are random and independent of any sequence or counter, so
//! uniqueness is left to storage and the allocator's bounded retry.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Length of a generated token.
pub const TOKEN_LENGTH: usize = 5;

/// Alphabet used for generated tokens (62 symbols).
pub const TOKEN_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Generates a random 5-character alphanumeric token.
///
/// # Examples
///
/// ```ignore
/// let token = generate_token();
/// assert_eq!(token.len(), 5);
/// assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_token() -> String {
    let mut rng = rand::rng();

    (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Normalizes a caller-supplied alias into a token.
///
/// Every run of whitespace, including runs at either edge, becomes a single
/// hyphen. Returns `None` only for absent or empty input, which means
/// "generate a token instead".
///
/// The function is idempotent: normalizing a normalized token returns it unchanged.
///
/// ```ignore
/// assert_eq!(normalize_alias(Some("my alias")), Some("my-alias".to_string()));
/// assert_eq!(normalize_alias(Some("my-alias")), Some("my-alias".to_string()));
/// assert_eq!(normalize_alias(Some(" a b ")), Some("-a-b-".to_string()));
/// assert_eq!(normalize_alias(Some("")), None);
/// ```
pub fn normalize_alias(raw: Option<&str>) -> Option<String> {
    let raw = raw?;

    if raw.is_empty() {
        return None;
    }

    Some(WHITESPACE_RUN.replace_all(raw, "-").into_owned())
}

/// Joins the fixed prefix and a token into a full alias.
pub fn compose_alias(prefix: &str, token: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), token)
}
