//! Lemon Squeezy webhook signature verification.
//!
//! The provider signs every delivery with HMAC-SHA256 over the exact request
//! body bytes, hex-encoded into the `X-Signature` header. Verification must
//! happen on the raw bytes before any JSON parsing, since re-serialization
//! would not reproduce the original payload.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Verifier for Lemon Squeezy webhook signatures.
#[derive(Clone)]
pub struct SignatureVerifier {
    /// The webhook signing secret from the Lemon Squeezy dashboard.
    secret: Secret<String>,
}

impl SignatureVerifier {
    /// Creates a new verifier with the given signing secret.
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    /// Verifies a hex-encoded signature against the raw request body.
    ///
    /// Returns `false` for any malformed signature (bad hex, wrong length)
    /// without surfacing why; the caller only ever learns pass/fail. The
    /// digest comparison is constant time so repeated guesses reveal nothing
    /// about where a mismatch occurs.
    ///
    /// A missing signature header is the caller's concern and must be
    /// rejected before this method is invoked.
    pub fn verify(&self, signature_hex: &str, raw_body: &[u8]) -> bool {
        let supplied = match hex::decode(signature_hex.trim()) {
            Ok(bytes) => bytes,
            Err(_) => {
                tracing::warn!("webhook signature is not valid hex");
                return false;
            }
        };

        let computed = match self.compute_digest(raw_body) {
            Some(digest) => digest,
            None => return false,
        };

        constant_time_compare(&computed, &supplied)
    }

    /// Computes the lowercase hex HMAC-SHA256 digest of a payload.
    ///
    /// Exposed so callers producing signed payloads (tests, outbound
    /// integrations) share one implementation with verification.
    pub fn sign(&self, raw_body: &[u8]) -> String {
        self.compute_digest(raw_body)
            .map(hex::encode)
            .unwrap_or_default()
    }

    fn compute_digest(&self, raw_body: &[u8]) -> Option<Vec<u8>> {
        let mut mac = match Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
        {
            Ok(mac) => mac,
            Err(err) => {
                // HMAC accepts any key length, so this is unreachable in
                // practice, but a verifier must never panic on hostile input.
                tracing::error!(error = %err, "failed to initialize HMAC key");
                return None;
            }
        };
        mac.update(raw_body);
        Some(mac.finalize().into_bytes().to_vec())
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// This prevents timing attacks that could leak information about the
/// expected digest. The length check is allowed to exit early because the
/// digest length is fixed and public.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
