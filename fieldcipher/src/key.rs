//! Encryption key derived from an operator-supplied secret string.
//!
//! The derivation is fixed by the data already at rest: the secret is
//! right-padded with `'0'` to [`KEY_SIZE`] characters and cut to its first
//! [`KEY_SIZE`] characters, and those characters' UTF-8 bytes form the key.

use crate::error::Error;
use secrecy::{ExposeSecret, Secret};
use zeroize::Zeroizing;

/// AES-256 key size in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Padding character appended to short secrets.
const PAD_CHAR: char = '0';

/// Fixed-length AES-256 key, wiped from memory on drop.
pub struct EncryptionKey {
    bytes: Secret<[u8; KEY_SIZE]>,
}

impl EncryptionKey {
    /// Derives a key from a secret string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] if the first [`KEY_SIZE`] characters
    /// of the padded secret do not encode to exactly [`KEY_SIZE`] bytes, which
    /// happens when the secret contains multi-byte characters.
    ///
    /// # Example
    ///
    /// ```
    /// use fieldcipher::key::EncryptionKey;
    ///
    /// let key = EncryptionKey::from_secret("correct horse battery staple").unwrap();
    /// ```
    pub fn from_secret(secret: &str) -> Result<Self, Error> {
        let padded: Zeroizing<String> = Zeroizing::new(
            secret.chars().chain(std::iter::repeat(PAD_CHAR)).take(KEY_SIZE).collect(),
        );
        Self::from_bytes(padded.as_bytes())
    }

    /// Wraps raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] unless `bytes` is exactly [`KEY_SIZE`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let array: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::InvalidKeyLength { expected: KEY_SIZE, actual: bytes.len() })?;
        Ok(Self { bytes: Secret::new(array) })
    }

    pub(crate) fn expose(&self) -> &[u8; KEY_SIZE] {
        self.bytes.expose_secret()
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey([REDACTED])")
    }
}
