//! Payment gateway request signing and callback verification.
//!
//! The gateway authenticates both directions with base64 HMAC-SHA256 keyed by
//! the merchant key, over a fixed concatenation of request fields salted with
//! the merchant salt.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Single payment, no installments.
const NO_INSTALLMENT: &str = "1";

/// Maximum installment count (0 = gateway default).
const MAX_INSTALLMENT: &str = "0";

/// Settlement currency.
const CURRENCY: &str = "TRY";

/// Gateway test-mode flag sent with every token request.
const TEST_MODE: &str = "1";

/// Basket line name used when an item has none.
pub const DEFAULT_ITEM_NAME: &str = "Ürün";

/// Merchant secrets issued by the gateway.
pub struct MerchantCredentials {
    merchant_key: SecretString,
    merchant_salt: SecretString,
}

impl MerchantCredentials {
    /// Creates credentials from the merchant key and salt.
    #[must_use]
    pub fn new(merchant_key: impl Into<String>, merchant_salt: impl Into<String>) -> Self {
        Self {
            merchant_key: SecretString::new(merchant_key.into()),
            merchant_salt: SecretString::new(merchant_salt.into()),
        }
    }

    fn sign(&self, message: &str) -> String {
        STANDARD.encode(self.mac(message).finalize().into_bytes())
    }

    fn mac(&self, message: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.merchant_key.expose_secret().as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC takes keys of any length"));
        mac.update(message.as_bytes());
        mac
    }
}

impl std::fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("merchant_key", &"[REDACTED]")
            .field("merchant_salt", &"[REDACTED]")
            .finish()
    }
}

/// Fields of a payment token request that enter the signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Merchant identifier
    pub merchant_id: String,
    /// Unique order identifier, see [`merchant_oid`]
    pub merchant_oid: String,
    /// Customer email
    pub email: String,
    /// Amount in minor currency units
    pub payment_amount: String,
    /// Redirect on success
    pub ok_url: String,
    /// Redirect on failure
    pub fail_url: String,
    /// Customer name
    pub user_name: String,
    /// Customer address
    pub user_address: String,
    /// Customer phone
    pub user_phone: String,
    /// Basket as produced by [`encode_basket`]
    pub user_basket: String,
}

/// Computes the token hash for a payment request.
#[must_use]
pub fn payment_token_hash(request: &PaymentRequest, credentials: &MerchantCredentials) -> String {
    let message = [
        request.merchant_id.as_str(),
        request.user_basket.as_str(),
        NO_INSTALLMENT,
        MAX_INSTALLMENT,
        CURRENCY,
        TEST_MODE,
        request.merchant_oid.as_str(),
        request.payment_amount.as_str(),
        request.ok_url.as_str(),
        request.fail_url.as_str(),
        request.user_name.as_str(),
        request.user_address.as_str(),
        request.user_phone.as_str(),
        request.user_basket.as_str(),
        request.email.as_str(),
        credentials.merchant_salt.expose_secret().as_str(),
    ]
    .concat();

    credentials.sign(&message)
}

/// Verifies the hash sent with a payment callback.
///
/// The comparison runs in constant time. A hash that is not valid base64
/// never verifies.
#[must_use]
pub fn verify_callback_hash(
    merchant_oid: &str,
    status: &str,
    total_amount: &str,
    hash: &str,
    credentials: &MerchantCredentials,
) -> bool {
    let Ok(expected) = STANDARD.decode(hash) else {
        return false;
    };

    let message =
        [merchant_oid, credentials.merchant_salt.expose_secret().as_str(), status, total_amount]
            .concat();

    credentials.mac(&message).verify_slice(&expected).is_ok()
}

/// Generates a merchant order id: `YYYYMMDD-HHMMSS-NNNN` in UTC.
#[must_use]
pub fn merchant_oid(now: DateTime<Utc>) -> String {
    let suffix = OsRng.next_u32() % 10_000;
    format!("{}-{suffix:04}", now.format("%Y%m%d-%H%M%S"))
}

/// One line of a payment basket.
#[derive(Debug, Clone, PartialEq)]
pub struct BasketItem {
    /// Product name
    pub name: Option<String>,
    /// Unit price in major currency units
    pub price: f64,
    /// Quantity
    pub quantity: Option<u32>,
}

/// Encodes a basket as base64 JSON of `[name, price_in_minor_units, quantity]`.
///
/// An empty or missing name becomes [`DEFAULT_ITEM_NAME`], a zero or missing
/// quantity becomes 1, and the minor-unit price rounds half away from zero.
#[must_use]
pub fn encode_basket(items: &[BasketItem]) -> String {
    let lines: Vec<_> = items
        .iter()
        .map(|item| {
            json!([
                item.name.as_deref().filter(|name| !name.is_empty()).unwrap_or(DEFAULT_ITEM_NAME),
                format!("{}", (item.price * 100.0).round()),
                item.quantity.filter(|&quantity| quantity != 0).unwrap_or(1),
            ])
        })
        .collect();

    STANDARD.encode(serde_json::Value::Array(lines).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn credentials() -> MerchantCredentials {
        MerchantCredentials::new("merchant-key", "merchant-salt")
    }

    fn request() -> PaymentRequest {
        PaymentRequest {
            merchant_id: "123456".to_string(),
            merchant_oid: "20240101-120000-0042".to_string(),
            email: "alice@example.com".to_string(),
            payment_amount: "15000".to_string(),
            ok_url: "https://shop.example/ok".to_string(),
            fail_url: "https://shop.example/fail".to_string(),
            user_name: "Alice".to_string(),
            user_address: "Istanbul".to_string(),
            user_phone: "05551112233".to_string(),
            user_basket: encode_basket(&[BasketItem {
                name: Some("Kutu".to_string()),
                price: 150.0,
                quantity: Some(1),
            }]),
        }
    }

    fn expected_token_hash(request: &PaymentRequest) -> String {
        let message = format!(
            "{}{}10TRY1{}{}{}{}{}{}{}{}{}merchant-salt",
            request.merchant_id,
            request.user_basket,
            request.merchant_oid,
            request.payment_amount,
            request.ok_url,
            request.fail_url,
            request.user_name,
            request.user_address,
            request.user_phone,
            request.user_basket,
            request.email,
        );
        let mut mac = HmacSha256::new_from_slice(b"merchant-key").unwrap();
        mac.update(message.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_token_hash_field_order() {
        let request = request();
        assert_eq!(payment_token_hash(&request, &credentials()), expected_token_hash(&request));
    }

    #[test]
    fn test_token_hash_depends_on_amount() {
        let mut changed = request();
        changed.payment_amount = "15001".to_string();
        assert_ne!(
            payment_token_hash(&request(), &credentials()),
            payment_token_hash(&changed, &credentials())
        );
    }

    #[test]
    fn test_verify_callback_hash() {
        let hash = credentials().sign("20240101-120000-0042merchant-saltsuccess15000");
        assert!(verify_callback_hash(
            "20240101-120000-0042",
            "success",
            "15000",
            &hash,
            &credentials()
        ));
    }

    #[test]
    fn test_verify_callback_hash_rejects_changed_status() {
        let hash = credentials().sign("20240101-120000-0042merchant-saltsuccess15000");
        assert!(!verify_callback_hash(
            "20240101-120000-0042",
            "failed",
            "15000",
            &hash,
            &credentials()
        ));
    }

    #[test]
    fn test_verify_callback_hash_rejects_bad_base64() {
        assert!(!verify_callback_hash("oid", "success", "1", "***", &credentials()));
        assert!(!verify_callback_hash("oid", "success", "1", "", &credentials()));
    }

    #[test]
    fn test_merchant_oid_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let oid = merchant_oid(now);

        assert!(oid.starts_with("20240309-070501-"));
        let suffix = &oid["20240309-070501-".len()..];
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_encode_basket() {
        let encoded = encode_basket(&[
            BasketItem { name: Some("Şişe".to_string()), price: 12.5, quantity: Some(3) },
            BasketItem { name: None, price: 0.99, quantity: None },
        ]);
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, r#"[["Şişe","1250",3],["Ürün","99",1]]"#);
    }

    #[test]
    fn test_encode_basket_defaults_and_rounding() {
        let encoded = encode_basket(&[
            BasketItem { name: Some(String::new()), price: 0.125, quantity: Some(0) },
            BasketItem { name: Some("Kutu".to_string()), price: 1.005, quantity: Some(2) },
            BasketItem { name: Some("X".to_string()), price: 2.5, quantity: Some(1) },
        ]);
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, r#"[["Ürün","13",1],["Kutu","100",2],["X","250",1]]"#);
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let debug = format!("{:?}", credentials());
        assert!(!debug.contains("merchant-key"));
        assert!(!debug.contains("merchant-salt"));
    }
}
