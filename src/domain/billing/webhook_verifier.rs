//! Gateway webhook signature verification.
//!
//! The gateway signs the raw request body with HMAC-SHA256 under the shared
//! webhook secret and sends the hex-encoded digest in a header. Verification
//! must run on the exact received bytes, before any JSON parsing.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Verifier for gateway webhook signatures.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: SecretString,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl WebhookVerifier {
    /// Creates a verifier. The secret is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MissingSecret` if the secret is empty.
    pub fn new(secret: &str) -> Result<Self, WebhookError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(WebhookError::MissingSecret);
        }
        Ok(Self {
            secret: SecretString::new(secret.to_string()),
        })
    }

    /// Returns true if `signature` is the hex HMAC-SHA256 of `body`.
    ///
    /// Fails closed on an absent, empty, non-hex or wrong-length signature.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> bool {
        match signature {
            Some(sig) => verify_signature(body, sig, self.secret.expose_secret()),
            None => false,
        }
    }

    /// Like [`verify`](Self::verify) but distinguishes a missing signature
    /// from a mismatched one.
    pub fn verify_request(&self, body: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        if self.verify(body, Some(signature)) {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }
}

/// Verifies a hex-encoded HMAC-SHA256 signature over `body`.
pub fn verify_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    let signature = signature.trim();
    if signature.is_empty() {
        return false;
    }
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let Some(expected) = compute_digest(body, secret) else {
        return false;
    };
    constant_time_compare(&expected, &provided)
}

/// Hex-encoded HMAC-SHA256 of `body` under `secret`.
pub fn compute_signature(body: &[u8], secret: &str) -> Option<String> {
    compute_digest(body, secret).map(hex::encode)
}

fn compute_digest(body: &[u8], secret: &str) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(mac.finalize().into_bytes().to_vec())
}

/// Whole-buffer comparison with no early exit on the first differing byte.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "whsec_razorpay_test";
    const BODY: &[u8] = br#"{"event":"subscription.activated","payload":{}}"#;

    fn sign(body: &[u8], secret: &str) -> String {
        compute_signature(body, secret).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Construction
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(WebhookVerifier::new(""), Err(WebhookError::MissingSecret)));
        assert!(matches!(WebhookVerifier::new("   "), Err(WebhookError::MissingSecret)));
    }

    #[test]
    fn secret_is_trimmed() {
        let verifier = WebhookVerifier::new("  whsec_razorpay_test\n").unwrap();
        let signature = sign(BODY, TEST_SECRET);
        assert!(verifier.verify(BODY, Some(&signature)));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let verifier = WebhookVerifier::new(TEST_SECRET).unwrap();
        let rendered = format!("{:?}", verifier);
        assert!(!rendered.contains(TEST_SECRET));
    }

    // ══════════════════════════════════════════════════════════════
    // Verification
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn valid_signature_passes() {
        let verifier = WebhookVerifier::new(TEST_SECRET).unwrap();
        let signature = sign(BODY, TEST_SECRET);
        assert!(verifier.verify_request(BODY, Some(&signature)).is_ok());
    }

    #[test]
    fn uppercase_hex_signature_passes() {
        let signature = sign(BODY, TEST_SECRET).to_uppercase();
        assert!(verify_signature(BODY, &signature, TEST_SECRET));
    }

    #[test]
    fn signature_with_surrounding_whitespace_passes() {
        let signature = format!(" {} ", sign(BODY, TEST_SECRET));
        assert!(verify_signature(BODY, &signature, TEST_SECRET));
    }

    #[test]
    fn wrong_secret_fails() {
        let verifier = WebhookVerifier::new("other_secret").unwrap();
        let signature = sign(BODY, TEST_SECRET);
        assert!(matches!(
            verifier.verify_request(BODY, Some(&signature)),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_body_fails() {
        let signature = sign(BODY, TEST_SECRET);
        let tampered = br#"{"event":"subscription.activated","payload":{} }"#;
        assert!(!verify_signature(tampered, &signature, TEST_SECRET));
    }

    #[test]
    fn missing_signature_is_reported() {
        let verifier = WebhookVerifier::new(TEST_SECRET).unwrap();
        assert!(!verifier.verify(BODY, None));
        assert!(matches!(
            verifier.verify_request(BODY, None),
            Err(WebhookError::MissingSignature)
        ));
        assert!(matches!(
            verifier.verify_request(BODY, Some("  ")),
            Err(WebhookError::MissingSignature)
        ));
    }

    #[test]
    fn non_hex_signature_fails_closed() {
        assert!(!verify_signature(BODY, "not-hex-at-all", TEST_SECRET));
    }

    #[test]
    fn truncated_signature_fails_closed() {
        let signature = sign(BODY, TEST_SECRET);
        assert!(!verify_signature(BODY, &signature[..62], TEST_SECRET));
    }

    #[test]
    fn extended_signature_fails_closed() {
        let signature = format!("{}00", sign(BODY, TEST_SECRET));
        assert!(!verify_signature(BODY, &signature, TEST_SECRET));
    }

    #[test]
    fn constant_time_compare_rejects_length_mismatch() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
        assert!(constant_time_compare(&[1, 2, 3], &[1, 2, 3]));
    }

    // ══════════════════════════════════════════════════════════════
    // Properties
    // ══════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn signed_body_always_verifies(
            secret in "[a-zA-Z0-9_]{1,64}",
            body in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let signature = sign(&body, &secret);
            prop_assert!(verify_signature(&body, &signature, &secret));
        }

        #[test]
        fn mutating_any_byte_fails(
            secret in "[a-zA-Z0-9_]{1,64}",
            body in proptest::collection::vec(any::<u8>(), 1..512),
            index in any::<proptest::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let signature = sign(&body, &secret);
            let mut mutated = body.clone();
            let i = index.index(mutated.len());
            mutated[i] ^= flip;
            prop_assert!(!verify_signature(&mutated, &signature, &secret));
        }
    }
}
