//! # `fieldcipher`
//!
//! Field-level protection for values stored in a document database:
//! authenticated encryption into a stable text envelope, one-way digests,
//! random tokens and log-safe masking.
//!
//! ## Features
//!
//! - AES-256-GCM encryption with a fresh nonce per value
//! - `nonce:tag:ciphertext` hex envelopes that fail closed on tampering
//! - Named-field transforms over JSON records with per-field failure isolation
//! - SHA-256 digests for equality checks
//! - Masking helpers for logs
//! - Payment gateway request signing and callback verification
//!
//! ## Example
//!
//! ```rust,no_run
//! use fieldcipher::prelude::*;
//!
//! # fn main() -> Result<(), Error> {
//! let cipher = FieldCipher::from_env()?;
//! cipher.self_check()?;
//!
//! let envelope = cipher.encrypt("alice@example.com")?;
//! let plaintext = cipher.decrypt(&envelope)?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cipher;
pub mod config;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod key;
pub mod mask;
pub mod payment;
pub mod token;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::cipher::FieldCipher;
    pub use crate::config::CipherConfig;
    pub use crate::digest::{compare_hash, hash};
    pub use crate::envelope::Envelope;
    pub use crate::error::Error;
    pub use crate::fields::Record;
    pub use crate::key::EncryptionKey;
    pub use crate::mask::mask_sensitive;
    pub use crate::token::generate_token;
}
