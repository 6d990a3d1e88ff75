//! # webhook-auth
//!
//! Authentication for inbound webhooks signed in the Svix style:
//! - signing-secret parsing (`whsec_<base64>`)
//! - HMAC-SHA256 signature verification, including key-rotation candidates
//! - replay-window enforcement on the claimed send time
//! - signature generation for tests and dev tooling
//!
//! Verification is a pure function of the request plus the secret loaded at
//! startup, so it is safe to run concurrently across requests.

pub mod error;
pub mod replay;
pub mod secret;
pub mod sign;
pub mod verify;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use replay::{ReplayGuard, DEFAULT_TOLERANCE_SECS};
pub use secret::SigningSecret;
pub use sign::Signer;
pub use verify::SignatureVerifier;
