//! HMAC-SHA256 helpers and random token generation.
//!
//! Session tokens are stored as `hex(HMAC-SHA256(secret, token))`, so a
//! database dump alone cannot be used to authenticate. Payment webhooks are
//! signed the same way over the raw request body.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of raw tokens issued by [`generate_token`].
pub const TOKEN_LEN: usize = 48;

fn mac(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length")
}

/// Returns the 64-character lowercase hex HMAC-SHA256 of `data`.
pub fn hmac_hex(secret: &str, data: &[u8]) -> String {
    let mut mac = mac(secret);
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

/// Checks a hex-encoded HMAC-SHA256 signature in constant time.
///
/// Malformed hex is treated as a mismatch.
pub fn verify_hmac_hex(secret: &str, data: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };

    let mut mac = mac(secret);
    mac.update(data);
    mac.verify_slice(&expected).is_ok()
}

/// Generates a random alphanumeric token of [`TOKEN_LEN`] characters.
pub fn generate_token() -> String {
    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect()
}
