//! One-way hashing for equality checks on sensitive values.
//!
//! Digests are lowercase hex SHA-256. They support "does this input match what
//! was stored" checks and nothing else; there is no way back to the input.

use sha2::{Digest, Sha256};

/// Length of a hex digest in characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hashes `text` to a lowercase hex SHA-256 digest.
///
/// An empty input yields an empty string.
///
/// # Example
///
/// ```
/// use fieldcipher::digest::hash;
///
/// assert_eq!(
///     hash("abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
#[must_use]
pub fn hash(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Checks whether `text` hashes to `digest`.
///
/// Returns `false` if either argument is empty.
#[must_use]
pub fn compare_hash(text: &str, digest: &str) -> bool {
    if text.is_empty() || digest.is_empty() {
        return false;
    }
    hash(text) == digest
}
