//! Controller for handling webhooks from external services.
//!
//! Handles webhooks from Clerk (delivered through Svix) for user lifecycle
//! events, keeping the user table in the Convex data store in sync.

use crate::{AppState, Error};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use domain::error::{config_error, webhook_error, WebhookErrorKind};
use domain::user_sync::{self, SyncOutcome};
use domain::{replay, WebhookEvent};
use log::*;
use serde::Serialize;
use utoipa::ToSchema;

/// Response for webhook acknowledgment
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookResponse {
    pub status: String,
}

/// POST /webhooks/clerk
///
/// Receives signed user-lifecycle events from Clerk. The endpoint carries no
/// session authentication; each request proves itself with an HMAC signature
/// over the `svix-id` and `svix-timestamp` headers plus the raw body bytes
/// exactly as received. No trailing-newline or other normalization is
/// applied, so the sender must deliver the same bytes it signed.
#[utoipa::path(
    post,
    path = "/webhooks/clerk",
    request_body = String,
    responses(
        (status = 200, description = "Event processed, or acknowledged as ignored", body = WebhookResponse),
        (status = 400, description = "Missing or malformed headers, timestamp outside tolerance, invalid signature, or invalid event payload"),
        (status = 500, description = "Missing server configuration or downstream store failure")
    )
)]
pub async fn clerk_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    debug!("Received Clerk webhook request");

    let verifier = app_state
        .verifier
        .as_ref()
        .ok_or_else(|| config_error("CLERK_WEBHOOK_SIGNING_SECRET is not configured"))?;

    let (msg_id, timestamp_raw, signature_header) = require_svix_headers(&headers)?;

    // Cheap checks first: bound the replay window before touching the HMAC.
    let timestamp = replay::parse_timestamp(timestamp_raw)?;
    app_state.replay_guard.check_now(timestamp)?;

    if !verifier.verify(msg_id, timestamp, &body, signature_header)? {
        return Err(webhook_error(
            WebhookErrorKind::InvalidSignature,
            &format!("signature mismatch for message {msg_id}"),
        )
        .into());
    }

    let event = WebhookEvent::parse(&body)?;
    info!("Verified webhook event of type: {}", event.event_type());

    let outcome = user_sync::dispatch(app_state.user_store.as_ref(), event).await?;

    let status = match outcome {
        SyncOutcome::Applied { store_id } => {
            info!("Processed user mutation, store id: {store_id}");
            "ok"
        }
        SyncOutcome::DeletionAcknowledged { .. } => "ok",
        SyncOutcome::Ignored { event_type } => {
            debug!("Acknowledged unhandled event type: {event_type}");
            "ignored"
        }
    };

    Ok((
        StatusCode::OK,
        Json(WebhookResponse {
            status: status.to_string(),
        }),
    ))
}

/// Extract the three Svix headers, rejecting the request if any is absent or
/// not valid UTF-8.
fn require_svix_headers(headers: &HeaderMap) -> Result<(&str, &str, &str), Error> {
    let get = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    match (
        get("svix-id"),
        get("svix-timestamp"),
        get("svix-signature"),
    ) {
        (Some(id), Some(timestamp), Some(signature)) => Ok((id, timestamp, signature)),
        (id, timestamp, signature) => {
            warn!(
                "Missing svix headers: id={} timestamp={} signature={}",
                id.is_some(),
                timestamp.is_some(),
                signature.is_some()
            );
            Err(webhook_error(WebhookErrorKind::MissingHeaders, "missing svix headers").into())
        }
    }
}
