//! Provider-issued signing secret parsing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use secrecy::{ExposeSecret, Secret};

use crate::error::{secret_error, Error, ErrorKind, SecretErrorKind};

/// Prefix the provider puts on issued secrets (`whsec_<base64>`).
const SECRET_PREFIX: &str = "whsec_";

/// A webhook signing secret decoded from its provider-issued form.
///
/// The prefix is stripped and the remainder base64-decoded once at load time.
/// The decoded key must be at least one byte; it is held in a [`Secret`] so
/// the bytes are zeroized on drop and kept out of Debug output.
pub struct SigningSecret {
    key: Secret<Vec<u8>>,
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSecret")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl SigningSecret {
    /// Parse a provider-issued secret string of the form `whsec_<base64>`.
    ///
    /// A missing prefix is tolerated; the whole string is then treated as the
    /// base64 payload.
    pub fn from_provider_string(raw: &str) -> Result<Self, Error> {
        let encoded = raw.strip_prefix(SECRET_PREFIX).unwrap_or(raw);

        let key = BASE64.decode(encoded).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Secret(SecretErrorKind::InvalidEncoding),
        })?;

        if key.is_empty() {
            return Err(secret_error(
                SecretErrorKind::EmptyKey,
                "signing secret decodes to zero bytes",
            ));
        }

        Ok(Self {
            key: Secret::new(key),
        })
    }

    /// The decoded HMAC key bytes.
    pub(crate) fn key_bytes(&self) -> &[u8] {
        self.key.expose_secret()
    }
}
