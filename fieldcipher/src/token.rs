//! Random opaque tokens.

use aes_gcm::aead::{rand_core::RngCore, OsRng};

/// Default token size in bytes.
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Generates `byte_len` random bytes from the OS CSPRNG, hex-encoded.
///
/// The result is `2 * byte_len` lowercase hex characters.
///
/// # Example
///
/// ```
/// use fieldcipher::token::generate_token;
///
/// let token = generate_token(16);
/// assert_eq!(token.len(), 32);
/// ```
#[must_use]
pub fn generate_token(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generates a token of [`DEFAULT_TOKEN_BYTES`] bytes.
#[must_use]
pub fn generate_default_token() -> String {
    generate_token(DEFAULT_TOKEN_BYTES)
}
