//! Payment Signatures
//!
//! The checkout widget returns `razorpay_signature`, which the provider
//! computes as `hex(HMAC-SHA256(key_secret, order_id + "|" + payment_id))`.
//! Recomputing it here is the only proof that a reported payment is real.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Server-held signing secret. Never serialized, never printed.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(**redacted**)")
    }
}

/// Compute the expected hex signature for an order/payment pair
pub fn sign(secret: &SecretKey, order_id: &str, payment_id: &str) -> String {
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts any key length"));
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Check a submitted signature in constant time
pub fn verify(secret: &SecretKey, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let expected = sign(secret, order_id, payment_id);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretKey {
        SecretKey::new("test_secret")
    }

    #[test]
    fn test_sign_is_hex_sha256() {
        let sig = sign(&secret(), "order_abc", "pay_xyz");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_accepts_own_signature() {
        let sig = sign(&secret(), "order_abc", "pay_xyz");
        assert!(verify(&secret(), "order_abc", "pay_xyz", &sig));
    }

    #[test]
    fn test_separator_is_part_of_message() {
        // "ab" + "|" + "c" must not collide with "a" + "|" + "bc"
        assert_ne!(sign(&secret(), "ab", "c"), sign(&secret(), "a", "bc"));
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let sig = sign(&secret(), "order_abc", "pay_xyz");

        let mut flipped = sig.clone().into_bytes();
        flipped[0] = if flipped[0] == b'0' { b'1' } else { b'0' };
        let flipped = String::from_utf8(flipped).unwrap();

        assert!(!verify(&secret(), "order_abc", "pay_xyz", &flipped));
        assert!(!verify(&secret(), "order_abc", "pay_other", &sig));
        assert!(!verify(&SecretKey::new("other"), "order_abc", "pay_xyz", &sig));
        assert!(!verify(&secret(), "order_abc", "pay_xyz", &sig[..63]));
        assert!(!verify(&secret(), "order_abc", "pay_xyz", ""));
    }

    #[test]
    fn test_debug_redacts_secret() {
        assert!(!format!("{:?}", secret()).contains("test_secret"));
    }
}
