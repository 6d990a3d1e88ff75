//! Routes verified identity-provider events into the booking data store.

use async_trait::async_trait;
use log::*;

use crate::error::{webhook_error, Error, WebhookErrorKind};
use crate::event::{UserEventData, WebhookEvent};

/// An idempotent upsert of one user record, keyed by the identity provider's id.
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpsert {
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
}

/// Seam to the external data store's user table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create or update the user keyed by `upsert.external_id`. Returns the
    /// stored document id. The store owns idempotency and last-write-wins
    /// semantics for concurrent deliveries of the same user.
    async fn create_or_update_user(&self, upsert: UserUpsert) -> Result<String, Error>;
}

/// Terminal outcome of dispatching one verified event.
#[derive(Debug, PartialEq)]
pub enum SyncOutcome {
    /// The user record was written to the store.
    Applied { store_id: String },
    /// A `user.deleted` event was acknowledged. No store mutation is wired
    /// for deletions yet; the event is recorded in the log only.
    DeletionAcknowledged { external_id: Option<String> },
    /// The event type is not one we handle. Acknowledged so the provider
    /// does not retry it.
    Ignored { event_type: String },
}

/// Route a verified event to the matching store action.
///
/// Unknown event types are accepted and acknowledged, never rejected, so the
/// provider can evolve its schema without breaking deliveries. A store
/// failure propagates to the caller; the provider's own retry policy is the
/// only retry mechanism.
pub async fn dispatch(store: &dyn UserStore, event: WebhookEvent) -> Result<SyncOutcome, Error> {
    match event {
        WebhookEvent::UserCreated(data) | WebhookEvent::UserUpdated(data) => {
            let upsert = upsert_from_event(data)?;
            debug!("Upserting user {}", upsert.external_id);
            let store_id = store.create_or_update_user(upsert).await?;
            Ok(SyncOutcome::Applied { store_id })
        }
        WebhookEvent::UserDeleted(data) => {
            // Deliberately inert: the store-side delete mutation is not wired.
            info!(
                "Received user.deleted for {}; no store action taken",
                data.id.as_deref().unwrap_or("<no id>")
            );
            Ok(SyncOutcome::DeletionAcknowledged {
                external_id: data.id,
            })
        }
        WebhookEvent::Unrecognized { event_type } => {
            debug!("Ignoring unhandled event type: {event_type}");
            Ok(SyncOutcome::Ignored { event_type })
        }
    }
}

/// Validate a user event and shape it into an upsert.
///
/// The provider guarantees neither field presence nor shape across event
/// versions; an event without an id or without at least one email address is
/// rejected before any store call.
fn upsert_from_event(data: UserEventData) -> Result<UserUpsert, Error> {
    let external_id = match data.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            return Err(webhook_error(
                WebhookErrorKind::InvalidPayload,
                "user event is missing an id",
            ))
        }
    };

    let email = match data.email_addresses.first() {
        Some(entry) => entry.email_address.clone(),
        None => {
            return Err(webhook_error(
                WebhookErrorKind::InvalidPayload,
                "user event carries no email addresses",
            ))
        }
    };

    Ok(UserUpsert {
        external_id,
        email,
        name: display_name(data.first_name.as_deref(), data.last_name.as_deref()),
    })
}

/// Trimmed concatenation of given and family name; `None` when both are empty.
fn display_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let name = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
