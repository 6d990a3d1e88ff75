//! HMAC-SHA256 webhook signature verification.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{signature_error, Error, SignatureErrorKind};
use crate::secret::SigningSecret;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Scheme prefix on each candidate in the signature header.
const SCHEME_PREFIX: &str = "v1,";

/// Builds the canonical signed content for a webhook message:
/// `msg_id + "." + timestamp + "." + body`, with the timestamp rendered as its
/// plain decimal form. The signer and verifier both call this function; the
/// two sides must agree byte-for-byte.
pub(crate) fn signed_content(msg_id: &str, timestamp: i64, body: &[u8]) -> Vec<u8> {
    let timestamp = timestamp.to_string();
    let mut content = Vec::with_capacity(msg_id.len() + timestamp.len() + body.len() + 2);
    content.extend_from_slice(msg_id.as_bytes());
    content.push(b'.');
    content.extend_from_slice(timestamp.as_bytes());
    content.push(b'.');
    content.extend_from_slice(body);
    content
}

/// Verifies Svix-style `v1,<base64>` signatures over webhook payloads.
///
/// Holds the signing secret loaded once at startup; verification itself is a
/// pure function of the request.
pub struct SignatureVerifier {
    secret: SigningSecret,
}

impl SignatureVerifier {
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }

    /// Check `signature_header` against the expected signature for
    /// `(msg_id, timestamp, body)`.
    ///
    /// The header may carry several space-separated candidates during key
    /// rotation; the request is valid if any candidate matches. Candidates
    /// with an unknown scheme or an undecodable digest are skipped, not
    /// treated as errors. The digest comparison is constant-time
    /// (`Mac::verify_slice`), not a short-circuiting byte compare.
    pub fn verify(
        &self,
        msg_id: &str,
        timestamp: i64,
        body: &[u8],
        signature_header: &str,
    ) -> Result<bool, Error> {
        let mac = self.mac_for(msg_id, timestamp, body)?;

        for candidate in signature_header.split_whitespace() {
            let encoded = match candidate.strip_prefix(SCHEME_PREFIX) {
                Some(encoded) => encoded,
                None => continue,
            };
            let digest = match BASE64.decode(encoded) {
                Ok(digest) => digest,
                Err(_) => continue,
            };
            if mac.clone().verify_slice(&digest).is_ok() {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn mac_for(&self, msg_id: &str, timestamp: i64, body: &[u8]) -> Result<HmacSha256, Error> {
        let mut mac = HmacSha256::new_from_slice(self.secret.key_bytes())
            .map_err(|_| signature_error(SignatureErrorKind::InvalidKey, "invalid HMAC key"))?;
        mac.update(&signed_content(msg_id, timestamp, body));
        Ok(mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::Signer;

    const TEST_SECRET: &str = "whsec_dGVzdHNlY3JldA==";

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(SigningSecret::from_provider_string(TEST_SECRET).unwrap())
    }

    fn signer() -> Signer {
        Signer::new(SigningSecret::from_provider_string(TEST_SECRET).unwrap())
    }

    // Digest computed independently with Node's crypto module over
    // "msg_1700000000.1700000000." + body.
    const KNOWN_BODY: &[u8] = b"{\"type\":\"user.created\",\"data\":{\"id\":\"user_29w\"}}\n";
    const KNOWN_HEADER: &str = "v1,qSfT7qC+mBAm1izSIDduI75yTCeN8Cv+uLes1jQDqfI=";

    #[test]
    fn test_known_signature_accepted() {
        let valid = verifier()
            .verify("msg_1700000000", 1700000000, KNOWN_BODY, KNOWN_HEADER)
            .unwrap();
        assert!(valid);
    }

    #[test]
    fn test_signed_content_format() {
        let content = signed_content("msg_1", 42, b"{}");
        assert_eq!(content, b"msg_1.42.{}");
    }

    #[test]
    fn test_round_trip_sign_then_verify() {
        let bodies: [&[u8]; 4] = [
            b"",
            b"{\"type\":\"user.updated\",\"data\":{}}",
            "{\"note\":\"sch\u{00f6}n\"}".as_bytes(),
            &[0xFFu8; 4096],
        ];
        for body in bodies {
            let header = signer().sign("msg_rt", 1700000000, body).unwrap();
            assert!(
                verifier().verify("msg_rt", 1700000000, body, &header).unwrap(),
                "round trip failed for body of {} bytes",
                body.len()
            );
        }
    }

    #[test]
    fn test_rejects_when_any_input_is_altered() {
        let body: &[u8] = b"{\"type\":\"user.created\",\"data\":{}}";
        let header = signer().sign("msg_orig", 1700000000, body).unwrap();
        let v = verifier();

        assert!(v.verify("msg_orig", 1700000000, body, &header).unwrap());
        assert!(!v.verify("msg_other", 1700000000, body, &header).unwrap());
        assert!(!v.verify("msg_orig", 1700000001, body, &header).unwrap());
        assert!(!v
            .verify("msg_orig", 1700000000, b"{\"type\":\"tampered\"}", &header)
            .unwrap());

        let other_verifier = SignatureVerifier::new(
            SigningSecret::from_provider_string("whsec_b3RoZXJzZWNyZXQ=").unwrap(),
        );
        assert!(!other_verifier
            .verify("msg_orig", 1700000000, body, &header)
            .unwrap());
    }

    #[test]
    fn test_accepts_match_at_any_candidate_position() {
        let body: &[u8] = b"{}";
        let good = signer().sign("msg_rot", 1700000000, body).unwrap();
        let bad = signer().sign("msg_rot", 1699999999, body).unwrap();

        let header = format!("{bad} {good}");
        assert!(verifier().verify("msg_rot", 1700000000, body, &header).unwrap());

        let header = format!("{good} {bad}");
        assert!(verifier().verify("msg_rot", 1700000000, body, &header).unwrap());
    }

    #[test]
    fn test_skips_unknown_schemes_and_garbage_candidates() {
        let body: &[u8] = b"{}";
        let good = signer().sign("msg_mix", 1700000000, body).unwrap();

        let header = format!("v2,AAAA v1,!!!not-base64!!! {good}");
        assert!(verifier().verify("msg_mix", 1700000000, body, &header).unwrap());
    }

    #[test]
    fn test_rejects_header_without_matching_candidate() {
        let v = verifier();
        assert!(!v.verify("msg_x", 1700000000, b"{}", "").unwrap());
        assert!(!v.verify("msg_x", 1700000000, b"{}", "v2,AAAA").unwrap());
        assert!(!v
            .verify("msg_x", 1700000000, b"{}", "v1,AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=")
            .unwrap());
    }
}
