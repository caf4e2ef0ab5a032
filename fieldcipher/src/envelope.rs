//! Text envelope for encrypted field values.
//!
//! Format:
//! ```text
//! <nonce-hex>:<tag-hex>:<ciphertext-hex>
//! ```
//!
//! All segments are lowercase hex on output. The layout is shared with data
//! already persisted in document stores and must not change.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Nonce size for the envelope cipher (128 bits).
pub const NONCE_SIZE: usize = 16;

/// Authentication tag size (128 bits).
pub const TAG_SIZE: usize = 16;

/// Separator between envelope segments. Never part of the hex alphabet.
pub const DELIMITER: char = ':';

/// Number of segments in a well-formed envelope.
const SEGMENTS: usize = 3;

/// Parsed encrypted value: nonce, authentication tag and ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    nonce: [u8; NONCE_SIZE],
    tag: [u8; TAG_SIZE],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Creates an envelope from its components.
    #[must_use]
    pub const fn new(nonce: [u8; NONCE_SIZE], tag: [u8; TAG_SIZE], ciphertext: Vec<u8>) -> Self {
        Self { nonce, tag, ciphertext }
    }

    /// Returns the nonce.
    #[must_use]
    pub const fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Returns the authentication tag.
    #[must_use]
    pub const fn tag(&self) -> &[u8; TAG_SIZE] {
        &self.tag
    }

    /// Returns the ciphertext.
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Consumes the envelope, returning the ciphertext buffer.
    #[must_use]
    pub fn into_ciphertext(self) -> Vec<u8> {
        self.ciphertext
    }

    /// Parses an envelope string.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The string does not split into exactly three non-empty segments
    ///   ([`Error::Format`])
    /// - A segment is not valid hex, or the nonce or tag has the wrong size
    ///   ([`Error::Decryption`])
    pub fn parse(s: &str) -> Result<Self, Error> {
        let segments: Vec<&str> = s.split(DELIMITER).collect();
        if segments.len() != SEGMENTS {
            return Err(Error::Format(format!(
                "expected {SEGMENTS} segments, found {}",
                segments.len()
            )));
        }
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(Error::Format("empty segment".to_string()));
        }

        let nonce = decode_fixed::<NONCE_SIZE>(segments[0], "nonce")?;
        let tag = decode_fixed::<TAG_SIZE>(segments[1], "tag")?;
        let ciphertext = hex::decode(segments[2])
            .map_err(|e| Error::Decryption(format!("ciphertext is not valid hex: {e}")))?;

        Ok(Self { nonce, tag, ciphertext })
    }
}

fn decode_fixed<const N: usize>(segment: &str, name: &str) -> Result<[u8; N], Error> {
    let bytes = hex::decode(segment)
        .map_err(|e| Error::Decryption(format!("{name} is not valid hex: {e}")))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| Error::Decryption(format!("{name} must be {N} bytes, got {len}")))
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for Envelope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
