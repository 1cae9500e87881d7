//! Webhook signature verification.
//!
//! LINE signs every webhook delivery with HMAC-SHA256 over the raw request
//! body, keyed by the channel secret, and ships the digest base64-encoded in
//! the `X-Line-Signature` header.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the expected signature for a raw webhook body.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Check a claimed signature against the raw body.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    constant_time_eq(&sign(channel_secret, body), signature)
}

/// Constant-time string comparison to prevent timing attacks on signature checks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
