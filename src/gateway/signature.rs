//! Relay signature verification using HMAC-SHA256.
//!
//! The gateway relay signs each forwarded dispatch with the shared relay
//! secret and sends the result in the `X-Signature-256` header as
//! `sha256=<hex>`. Requests are verified before their body is parsed.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the relay signature.
pub const SIGNATURE_HEADER: &str = "x-signature-256";

const SCHEME: &str = "sha256=";

/// Decodes a `sha256=<hex>` header value into the raw MAC bytes.
///
/// Returns `None` for any other scheme or for invalid hex.
pub fn decode_signature(header: &str) -> Option<Vec<u8>> {
    hex::decode(header.trim().strip_prefix(SCHEME)?).ok()
}

/// Signs `payload` and returns the header value a relay would send.
///
/// # Errors
///
/// Only if the MAC rejects the key, which HMAC never does.
pub fn sign(payload: &[u8], secret: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(payload);
    Ok(format!("{SCHEME}{}", hex::encode(mac.finalize().into_bytes())))
}

/// Checks `header` against the MAC of `payload` under `secret`.
///
/// The comparison is constant-time. Malformed headers fail verification.
pub fn verify(payload: &[u8], header: &str, secret: &[u8]) -> bool {
    let Some(claimed) = decode_signature(header) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&claimed).is_ok()
}
