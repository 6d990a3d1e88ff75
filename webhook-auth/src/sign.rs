//! Webhook signature generation.
//!
//! Mirrors the verifier's canonicalization exactly (both call
//! [`signed_content`](crate::verify)); used by tests and the `sign_payload`
//! dev utility to produce signature header values for curl-driven testing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::Mac;

use crate::error::{signature_error, Error, SignatureErrorKind};
use crate::secret::SigningSecret;
use crate::verify::{signed_content, HmacSha256};

pub struct Signer {
    secret: SigningSecret,
}

impl Signer {
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }

    /// Produce a `v1,<base64>` header value for the exact bytes of `body`.
    ///
    /// No normalization is applied to the body; callers must sign the same
    /// bytes the receiver will see.
    pub fn sign(&self, msg_id: &str, timestamp: i64, body: &[u8]) -> Result<String, Error> {
        let mut mac = HmacSha256::new_from_slice(self.secret.key_bytes())
            .map_err(|_| signature_error(SignatureErrorKind::InvalidKey, "invalid HMAC key"))?;
        mac.update(&signed_content(msg_id, timestamp, body));
        Ok(format!("v1,{}", BASE64.encode(mac.finalize().into_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_produces_known_header_value() {
        let signer = Signer::new(
            SigningSecret::from_provider_string("whsec_dGVzdHNlY3JldA==").unwrap(),
        );
        let body: &[u8] = b"{\"type\":\"user.created\",\"data\":{\"id\":\"user_29w\"}}\n";

        let header = signer.sign("msg_1700000000", 1700000000, body).unwrap();

        // Digest computed independently with Node's crypto module.
        assert_eq!(header, "v1,qSfT7qC+mBAm1izSIDduI75yTCeN8Cv+uLes1jQDqfI=");
    }

    #[test]
    fn test_signs_exact_bytes_without_normalization() {
        let signer = Signer::new(
            SigningSecret::from_provider_string("whsec_dGVzdHNlY3JldA==").unwrap(),
        );

        let without_newline = signer.sign("msg_1", 1700000000, b"{}").unwrap();
        let with_newline = signer.sign("msg_1", 1700000000, b"{}\n").unwrap();

        assert_ne!(without_newline, with_newline);
    }
}
