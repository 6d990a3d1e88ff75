//! Domain layer for the booking platform backend: the identity-provider
//! event model, the user-sync dispatcher, and gateway clients for external
//! services.

pub mod error;
pub mod event;
pub mod gateway;
pub mod user_sync;

// Re-export commonly used types
pub use event::WebhookEvent;
pub use user_sync::{dispatch, SyncOutcome, UserStore, UserUpsert};

// Re-exports from the `webhook-auth` crate. Consumers of `domain` (the web
// layer and the binaries) work with webhook authentication through these
// re-exports instead of depending on `webhook-auth` directly, keeping the
// layer boundaries intact.
pub use webhook_auth::{replay, ReplayGuard, SignatureVerifier, Signer, SigningSecret};
