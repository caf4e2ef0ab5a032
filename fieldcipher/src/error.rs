//! Error types for `fieldcipher` operations.
//!
//! Messages never carry key material, plaintext, or raw envelopes.

/// Main error type for `fieldcipher` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Encryption operation failed; the caller must not persist anything.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// The envelope does not have the `nonce:tag:ciphertext` shape.
    #[error("invalid encrypted data format: {0}")]
    Format(String),

    /// Decryption failed for a reason other than authentication.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Authentication tag verification failed (wrong key, or the data was corrupted or tampered)
    #[error("authentication failed: ciphertext may be corrupted or tampered")]
    AuthenticationFailed,

    /// Key material has the wrong length for the cipher.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required key size in bytes
        expected: usize,
        /// Size that was supplied
        actual: usize,
    },

    /// No encryption secret is configured.
    #[error("no encryption key configured: set ENCRYPTION_KEY")]
    MissingKey,

    /// The configuration source could not be read.
    #[error("configuration error: {0}")]
    Config(String),

    /// The startup round trip did not reproduce its input.
    #[error("self-check failed: round trip did not reproduce the probe value")]
    SelfCheck,
}

impl Error {
    /// Returns `true` for every failure of the decrypt path: a malformed
    /// envelope, undecodable components, or a failed authentication.
    #[must_use]
    pub const fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::Format(_) | Self::Decryption(_) | Self::AuthenticationFailed)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
