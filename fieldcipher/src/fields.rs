//! Named-field encryption over document records.
//!
//! A record is a JSON object as stored in a document database. Only the
//! requested fields are touched, and only when they hold a truthy value:
//! `null`, `false`, zero and `""` are left exactly as they are.

use crate::cipher::FieldCipher;
use crate::error::Error;
use serde_json::{Map, Value};
use tracing::warn;

/// JSON object record, keyed by field name.
pub type Record = Map<String, Value>;

/// Returns `true` if `value` counts as set in the document model.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whole numbers below this magnitude print in plain integer form.
const PLAIN_INTEGER_LIMIT: f64 = 1e21;

/// Renders a field value as the text that gets encrypted.
///
/// Whole-valued floats drop their fraction, so `100.0` encrypts as `"100"`
/// just like the integer `100`.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < PLAIN_INTEGER_LIMIT => {
                format!("{f:.0}")
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

impl FieldCipher {
    /// Returns a copy of `record` with each named, truthy field replaced by
    /// its envelope string.
    ///
    /// Absent and falsy fields are left untouched. An empty `fields` list
    /// returns an unchanged copy.
    ///
    /// # Arguments
    ///
    /// * `record` - Document to protect; it is not modified
    /// * `fields` - Names of the fields to encrypt
    ///
    /// # Returns
    ///
    /// A new record with the named fields replaced by envelope strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encryption`] if any field fails to encrypt; no
    /// partially encrypted record is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use fieldcipher::cipher::FieldCipher;
    /// use fieldcipher::key::EncryptionKey;
    /// use serde_json::json;
    ///
    /// # fn main() -> Result<(), fieldcipher::error::Error> {
    /// let cipher = FieldCipher::new(EncryptionKey::from_secret("an operator secret")?);
    /// let record = json!({ "taxId": "1234567890", "note": "" });
    /// let record = record.as_object().unwrap();
    ///
    /// let sealed = cipher.encrypt_fields(record, &["taxId", "note"])?;
    /// assert_ne!(sealed["taxId"], record["taxId"]);
    /// assert_eq!(sealed["note"], "");
    /// # Ok(())
    /// # }
    /// ```
    pub fn encrypt_fields(&self, record: &Record, fields: &[&str]) -> Result<Record, Error> {
        let mut sealed = record.clone();
        for &field in fields {
            if let Some(value) = sealed.get_mut(field).filter(|value| is_truthy(value)) {
                *value = Value::String(self.encrypt(&stringify(value))?);
            }
        }
        Ok(sealed)
    }

    /// Returns a copy of `record` with each named, truthy field decrypted.
    ///
    /// A field that fails to decrypt, including a non-string value, becomes
    /// `""` and the remaining fields are still processed. Failures are logged
    /// by field name only.
    ///
    /// # Arguments
    ///
    /// * `record` - Document as read from storage
    /// * `fields` - Names of the fields to decrypt
    #[must_use]
    pub fn decrypt_fields(&self, record: &Record, fields: &[&str]) -> Record {
        let mut opened = record.clone();
        for &field in fields {
            let Some(value) = opened.get_mut(field).filter(|value| is_truthy(value)) else {
                continue;
            };

            let result = match value {
                Value::String(envelope) => self.decrypt(envelope),
                _ => Err(Error::Format("field value is not a string".to_string())),
            };

            *value = Value::String(result.unwrap_or_else(|e| {
                warn!(field, error = %e, "failed to decrypt field");
                String::new()
            }));
        }
        opened
    }
}
