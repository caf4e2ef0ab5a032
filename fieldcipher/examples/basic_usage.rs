//! Basic usage example for `fieldcipher`.

use fieldcipher::prelude::*;
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("fieldcipher Basic Usage Example");
    println!("===============================\n");

    // The secret normally comes from ENCRYPTION_KEY
    let config = CipherConfig::from_secret("example-secret-do-not-use")?;
    let cipher = FieldCipher::from_config(&config)?;
    cipher.self_check()?;
    println!("✓ Cipher ready\n");

    let plaintext = "alice@example.com";
    println!("Plaintext: {}", mask_sensitive(plaintext));

    let envelope = cipher.encrypt(plaintext)?;
    println!("✓ Encrypted: {envelope}");

    let decrypted = cipher.decrypt(&envelope)?;
    println!("✓ Decrypted: {}\n", mask_sensitive(&decrypted));

    let customer = json!({ "name": "Alice", "iban": "TR330006100519786457841326" });
    let customer = customer.as_object().ok_or("customer must be an object")?;

    let stored = cipher.encrypt_fields(customer, &["iban"])?;
    println!("Stored record: {}", serde_json::Value::Object(stored.clone()));

    let loaded = cipher.decrypt_fields(&stored, &["iban"]);
    println!("Loaded IBAN: {}", mask_sensitive(loaded["iban"].as_str().unwrap_or_default()));

    let digest = hash("reset-code-991");
    println!("\nDigest: {digest}");
    println!("Matches: {}", compare_hash("reset-code-991", &digest));
    println!("Token: {}", generate_token(16));

    Ok(())
}
