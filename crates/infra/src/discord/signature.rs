//! Ed25519 request signature verification
//!
//! Discord signs `timestamp ‖ body` with the application key and sends the
//! hex signature in `X-Signature-Ed25519`.

use ed25519_dalek::{Signature, VerifyingKey};
use famcal_domain::{FamcalError, Result};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Parse the hex public key shown in the developer portal.
    ///
    /// # Errors
    /// Returns `FamcalError::Config` when the key is not 32 hex-encoded bytes
    /// or not a valid curve point.
    pub fn from_hex(public_key: &str) -> Result<Self> {
        let bytes = hex::decode(public_key.trim())
            .map_err(|e| FamcalError::Config(format!("Invalid Discord public key hex: {e}")))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            FamcalError::Config("Discord public key must be 32 bytes".to_string())
        })?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| FamcalError::Config(format!("Invalid Discord public key: {e}")))?;
        Ok(Self { key })
    }

    pub fn from_key(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// True when `signature_hex` signs `timestamp` followed by `body`.
    pub fn verify(&self, timestamp: &str, body: &[u8], signature_hex: &str) -> bool {
        let Ok(bytes) = hex::decode(signature_hex.trim()) else {
            return false;
        };
        let Ok(bytes) = <[u8; 64]>::try_from(bytes) else {
            return false;
        };
        let signature = Signature::from_bytes(&bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);
        self.key.verify_strict(&message, &signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};

    use super::*;

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn sign(key: &SigningKey, timestamp: &str, body: &[u8]) -> String {
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(body);
        hex::encode(key.sign(&message).to_bytes())
    }

    #[test]
    fn accepts_valid_signature() {
        let key = signing_key();
        let verifier =
            SignatureVerifier::from_hex(&hex::encode(key.verifying_key().to_bytes())).unwrap();
        let body = br#"{"type":1}"#;

        assert!(verifier.verify("1700000000", body, &sign(&key, "1700000000", body)));
    }

    #[test]
    fn rejects_tampered_body_or_timestamp() {
        let key = signing_key();
        let verifier = SignatureVerifier::from_key(key.verifying_key());
        let signature = sign(&key, "1700000000", b"original");

        assert!(!verifier.verify("1700000000", b"tampered", &signature));
        assert!(!verifier.verify("1700000001", b"original", &signature));
        assert!(!verifier.verify("1700000000", b"original", "zz"));
        assert!(!verifier.verify("1700000000", b"original", "abcd"));
    }

    #[test]
    fn malformed_public_key_is_config_error() {
        assert!(matches!(SignatureVerifier::from_hex("not-hex"), Err(FamcalError::Config(_))));
        assert!(matches!(SignatureVerifier::from_hex("abcd"), Err(FamcalError::Config(_))));
    }
}
