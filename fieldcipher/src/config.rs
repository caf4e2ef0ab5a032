//! Configuration for the field cipher.
//!
//! The secret is read once at process start. Recognized variables, highest
//! precedence first:
//!
//! - `ENCRYPTION_KEY`
//! - `FUNCTIONS_CONFIG_encryption_key`
//!
//! There is no built-in fallback secret: a process without one refuses to
//! build a cipher.

use crate::error::Error;
use crate::key::EncryptionKey;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;

/// Variables that may hold the secret, highest precedence first.
const KEY_VARS: [&str; 2] = ["ENCRYPTION_KEY", "FUNCTIONS_CONFIG_encryption_key"];

/// Raw view of the environment, as deserialized by the `config` crate.
///
/// `config::Environment` lowercases variable names.
#[derive(Debug, Default, Deserialize)]
struct EnvSource {
    encryption_key: Option<SecretString>,
    functions_config_encryption_key: Option<SecretString>,
}

/// Validated cipher configuration.
#[derive(Debug)]
pub struct CipherConfig {
    secret: SecretString,
}

impl CipherConfig {
    /// Builds a configuration from an explicit secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if `secret` is empty.
    pub fn from_secret(secret: impl Into<String>) -> Result<Self, Error> {
        let secret = SecretString::new(secret.into());
        if secret.expose_secret().is_empty() {
            return Err(Error::MissingKey);
        }
        Ok(Self { secret })
    }

    /// Loads the configuration from process environment variables.
    ///
    /// Only the recognized variables are read; the rest of the environment
    /// is never inspected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if no non-empty secret is set, or
    /// [`Error::Config`] if a recognized variable is not valid Unicode.
    pub fn from_env() -> Result<Self, Error> {
        let mut vars = HashMap::new();
        for name in KEY_VARS {
            if let Some(value) = std::env::var_os(name) {
                let value = value
                    .into_string()
                    .map_err(|_| Error::Config(format!("{name} is not valid Unicode")))?;
                vars.insert(name.to_string(), value);
            }
        }
        Self::from_vars(vars)
    }

    /// Loads the configuration from an explicit variable map instead of the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Same as [`CipherConfig::from_env`].
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, Error> {
        Self::load(config::Environment::default().source(Some(vars)))
    }

    fn load(environment: config::Environment) -> Result<Self, Error> {
        let source: EnvSource =
            config::Config::builder().add_source(environment).build()?.try_deserialize()?;

        let secret = [source.encryption_key, source.functions_config_encryption_key]
            .into_iter()
            .flatten()
            .find(|secret| !secret.expose_secret().is_empty())
            .ok_or(Error::MissingKey)?;

        Ok(Self { secret })
    }

    /// Derives the encryption key from the configured secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] if the secret cannot produce a
    /// key of the required size.
    pub fn encryption_key(&self) -> Result<EncryptionKey, Error> {
        EncryptionKey::from_secret(self.secret.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_primary_variable() {
        let config = CipherConfig::from_vars(vars(&[("ENCRYPTION_KEY", "primary")])).unwrap();
        assert_eq!(config.secret.expose_secret(), "primary");
    }

    #[test]
    fn test_legacy_variable() {
        let config =
            CipherConfig::from_vars(vars(&[("FUNCTIONS_CONFIG_encryption_key", "legacy")]))
                .unwrap();
        assert_eq!(config.secret.expose_secret(), "legacy");
    }

    #[test]
    fn test_primary_takes_precedence() {
        let config = CipherConfig::from_vars(vars(&[
            ("ENCRYPTION_KEY", "primary"),
            ("FUNCTIONS_CONFIG_encryption_key", "legacy"),
        ]))
        .unwrap();
        assert_eq!(config.secret.expose_secret(), "primary");
    }

    #[test]
    fn test_empty_primary_falls_through() {
        let config = CipherConfig::from_vars(vars(&[
            ("ENCRYPTION_KEY", ""),
            ("FUNCTIONS_CONFIG_encryption_key", "legacy"),
        ]))
        .unwrap();
        assert_eq!(config.secret.expose_secret(), "legacy");
    }

    #[test]
    fn test_missing_key_fails() {
        let result = CipherConfig::from_vars(vars(&[("UNRELATED", "value")]));
        assert!(matches!(result, Err(Error::MissingKey)));
    }

    #[test]
    fn test_from_env_reads_only_key_variables() {
        // Holds regardless of what else the test process environment carries
        match CipherConfig::from_env() {
            Ok(config) => assert!(!config.secret.expose_secret().is_empty()),
            Err(e) => assert!(matches!(e, Error::MissingKey | Error::Config(_))),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_key_variable_rejected() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let name = "FUNCTIONS_CONFIG_encryption_key";
        let previous = std::env::var_os(name);
        std::env::set_var(name, OsString::from_vec(vec![0x66, 0xff, 0x6f]));
        let result = CipherConfig::from_env();
        match previous {
            Some(value) => std::env::set_var(name, value),
            None => std::env::remove_var(name),
        }

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(CipherConfig::from_secret(""), Err(Error::MissingKey)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = CipherConfig::from_secret("hunter2-hunter2").unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_encryption_key_derivation() {
        let config = CipherConfig::from_secret("abc").unwrap();
        assert!(config.encryption_key().is_ok());
    }
}
