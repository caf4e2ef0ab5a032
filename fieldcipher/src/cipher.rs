//! Field cipher for encryption and decryption of individual string values.
//!
//! Values are sealed with AES-256-GCM under a process-wide key, using a fresh
//! random 128-bit nonce per call and no associated data. The result is
//! rendered as an [`Envelope`] string.

use crate::config::CipherConfig;
use crate::envelope::{Envelope, NONCE_SIZE, TAG_SIZE};
use crate::error::Error;
use crate::key::EncryptionKey;
use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce, Tag,
};
use std::sync::Arc;
use tracing::{debug, error, info};
use zeroize::Zeroizing;

/// AES-256-GCM with a 16-byte nonce, matching envelopes already at rest.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Probe value used by [`FieldCipher::self_check`].
const SELF_CHECK_PROBE: &str = "test-encryption";

/// Encrypts and decrypts string fields under a single key.
///
/// Cloning is cheap; clones share the key.
///
/// # Example
///
/// ```
/// use fieldcipher::cipher::FieldCipher;
/// use fieldcipher::key::EncryptionKey;
///
/// # fn main() -> Result<(), fieldcipher::error::Error> {
/// let cipher = FieldCipher::new(EncryptionKey::from_secret("an operator secret")?);
///
/// let envelope = cipher.encrypt("TR33 0006 1005 1978 6457 8413 26")?;
/// let plaintext = cipher.decrypt(&envelope)?;
///
/// assert_eq!(plaintext, "TR33 0006 1005 1978 6457 8413 26");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FieldCipher {
    key: Arc<EncryptionKey>,
}

impl FieldCipher {
    /// Creates a cipher holding `key` for its whole lifetime.
    ///
    /// # Arguments
    ///
    /// * `key` - Process-wide encryption key, usually from [`CipherConfig`]
    #[must_use]
    pub fn new(key: EncryptionKey) -> Self {
        debug!(key_bytes = crate::key::KEY_SIZE, "field cipher initialized");
        Self { key: Arc::new(key) }
    }

    /// Creates a cipher from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configured secret cannot produce a valid key.
    pub fn from_config(config: &CipherConfig) -> Result<Self, Error> {
        Ok(Self::new(config.encryption_key()?))
    }

    /// Creates a cipher from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if no secret is configured.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_config(&CipherConfig::from_env()?)
    }

    /// Encrypts a string into envelope text.
    ///
    /// An empty input yields an empty string, not an envelope. Every other
    /// call draws a fresh nonce, so equal inputs give different envelopes.
    ///
    /// # Arguments
    ///
    /// * `plaintext` - Value to protect
    ///
    /// # Returns
    ///
    /// Envelope text: `<nonce-hex>:<tag-hex>:<ciphertext-hex>`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encryption`] if the cipher cannot be initialized or
    /// the encryption itself fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, Error> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        Ok(self.seal(plaintext.as_bytes())?.to_string())
    }

    /// Decrypts envelope text produced by [`FieldCipher::encrypt`].
    ///
    /// An empty input yields an empty string.
    ///
    /// # Arguments
    ///
    /// * `envelope` - Envelope text as stored
    ///
    /// # Returns
    ///
    /// The original plaintext.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The envelope is malformed ([`Error::Format`])
    /// - A segment cannot be decoded, or the plaintext is not UTF-8
    ///   ([`Error::Decryption`])
    /// - The tag does not authenticate the ciphertext under this key
    ///   ([`Error::AuthenticationFailed`])
    pub fn decrypt(&self, envelope: &str) -> Result<String, Error> {
        if envelope.is_empty() {
            return Ok(String::new());
        }
        let plaintext = self.open(&Envelope::parse(envelope)?)?;
        String::from_utf8(plaintext)
            .map_err(|_| Error::Decryption("plaintext is not valid UTF-8".to_string()))
    }

    /// Encrypts raw bytes into a typed envelope.
    ///
    /// # Arguments
    ///
    /// * `plaintext` - Data to encrypt
    ///
    /// # Returns
    ///
    /// Envelope holding the fresh nonce, the tag and a ciphertext of the
    /// same length as `plaintext`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encryption`] if the cipher operation fails.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Envelope, Error> {
        let cipher = self.cipher().map_err(Error::Encryption)?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);

        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&nonce_bytes), b"", &mut buffer)
            .map_err(|e| Error::Encryption(format!("AES-256-GCM encryption failed: {e}")))?;

        let mut tag_bytes = [0u8; TAG_SIZE];
        tag_bytes.copy_from_slice(&tag);

        Ok(Envelope::new(nonce_bytes, tag_bytes, buffer))
    }

    /// Decrypts a typed envelope into raw bytes.
    ///
    /// Fails closed: no plaintext is returned unless the tag authenticates.
    ///
    /// # Arguments
    ///
    /// * `envelope` - Envelope produced by [`FieldCipher::seal`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] on a tag mismatch or wrong key.
    pub fn open(&self, envelope: &Envelope) -> Result<Vec<u8>, Error> {
        let cipher = self.cipher().map_err(Error::Decryption)?;

        let mut buffer = Zeroizing::new(envelope.ciphertext().to_vec());
        cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(envelope.nonce()),
                b"",
                &mut buffer,
                Tag::<U16>::from_slice(envelope.tag()),
            )
            .map_err(|_| Error::AuthenticationFailed)?;

        Ok(std::mem::take(&mut *buffer))
    }

    /// Encrypts and decrypts a fixed probe value and checks that it survives.
    ///
    /// Meant for the owning process's startup sequence; constructing a
    /// cipher never runs it implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelfCheck`] if the round trip does not reproduce the
    /// probe, or the underlying error if either direction fails.
    pub fn self_check(&self) -> Result<(), Error> {
        let result = self
            .encrypt(SELF_CHECK_PROBE)
            .and_then(|envelope| self.decrypt(&envelope))
            .and_then(|decrypted| {
                if decrypted == SELF_CHECK_PROBE {
                    Ok(())
                } else {
                    Err(Error::SelfCheck)
                }
            });

        match &result {
            Ok(()) => info!("field cipher self-check passed"),
            Err(e) => error!(error = %e, "field cipher self-check failed"),
        }
        result
    }

    fn cipher(&self) -> Result<Aes256Gcm16, String> {
        Aes256Gcm16::new_from_slice(self.key.expose()).map_err(|e| format!("invalid key: {e}"))
    }
}
