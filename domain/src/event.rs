//! Inbound identity-provider event model.
//!
//! Clerk delivers events as a JSON envelope `{ "type": string, "data": object }`.
//! The envelope is only parsed after signature verification. Event types are a
//! closed set of known variants plus a catch-all, so a provider rolling out new
//! event types never crashes the request path.

use serde::Deserialize;

use crate::error::{DomainErrorKind, Error, WebhookErrorKind};

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// A user record as it appears in `user.created` / `user.updated` events.
///
/// Every field is optional at the wire level; required-field validation
/// happens in the dispatcher, where a missing id or email is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEventData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddressEntry>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddressEntry {
    pub email_address: String,
}

/// Payload of a `user.deleted` event.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedUserData {
    #[serde(default)]
    pub id: Option<String>,
}

/// A verified identity-provider event, keyed by its declared type.
#[derive(Debug)]
pub enum WebhookEvent {
    UserCreated(UserEventData),
    UserUpdated(UserEventData),
    UserDeleted(DeletedUserData),
    Unrecognized { event_type: String },
}

impl WebhookEvent {
    /// Parse a verified request body into an event.
    ///
    /// Malformed JSON, or a known event type whose payload does not match the
    /// expected shape, is an invalid-payload error. Unknown event types parse
    /// successfully into [`WebhookEvent::Unrecognized`].
    pub fn parse(body: &[u8]) -> Result<Self, Error> {
        let envelope: EventEnvelope = serde_json::from_slice(body).map_err(invalid_payload)?;

        let event = match envelope.event_type.as_str() {
            "user.created" => WebhookEvent::UserCreated(parse_data(envelope.data)?),
            "user.updated" => WebhookEvent::UserUpdated(parse_data(envelope.data)?),
            "user.deleted" => WebhookEvent::UserDeleted(parse_data(envelope.data)?),
            _ => WebhookEvent::Unrecognized {
                event_type: envelope.event_type,
            },
        };

        Ok(event)
    }

    /// The declared event type, for logging.
    pub fn event_type(&self) -> &str {
        match self {
            WebhookEvent::UserCreated(_) => "user.created",
            WebhookEvent::UserUpdated(_) => "user.updated",
            WebhookEvent::UserDeleted(_) => "user.deleted",
            WebhookEvent::Unrecognized { event_type } => event_type,
        }
    }
}

fn parse_data<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> Result<T, Error> {
    serde_json::from_value(data).map_err(invalid_payload)
}

fn invalid_payload(err: serde_json::Error) -> Error {
    Error {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::Webhook(WebhookErrorKind::InvalidPayload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_user_created_event() {
        let body = br#"{
            "type": "user.created",
            "data": {
                "id": "user_29w83sxmDNGwOuEthce5gg56FcC",
                "email_addresses": [{"email_address": "anna@example.com"}],
                "first_name": "Anna",
                "last_name": "Jones",
                "unknown_provider_field": {"nested": true}
            }
        }"#;

        match WebhookEvent::parse(body).unwrap() {
            WebhookEvent::UserCreated(data) => {
                assert_eq!(data.id.as_deref(), Some("user_29w83sxmDNGwOuEthce5gg56FcC"));
                assert_eq!(data.email_addresses.len(), 1);
                assert_eq!(data.first_name.as_deref(), Some("Anna"));
            }
            other => panic!("expected UserCreated, got {other:?}"),
        }
    }

    #[test]
    fn test_parses_sparse_user_event() {
        // Field presence is validated by the dispatcher, not the parser.
        let body = br#"{"type": "user.updated", "data": {}}"#;
        match WebhookEvent::parse(body).unwrap() {
            WebhookEvent::UserUpdated(data) => {
                assert!(data.id.is_none());
                assert!(data.email_addresses.is_empty());
            }
            other => panic!("expected UserUpdated, got {other:?}"),
        }
    }

    #[test]
    fn test_parses_user_deleted_event() {
        let body = br#"{"type": "user.deleted", "data": {"id": "user_gone", "deleted": true}}"#;
        match WebhookEvent::parse(body).unwrap() {
            WebhookEvent::UserDeleted(data) => assert_eq!(data.id.as_deref(), Some("user_gone")),
            other => panic!("expected UserDeleted, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_type_is_unrecognized() {
        let body = br#"{"type": "organization.created", "data": {"id": "org_1"}}"#;
        match WebhookEvent::parse(body).unwrap() {
            WebhookEvent::Unrecognized { event_type } => {
                assert_eq!(event_type, "organization.created");
            }
            other => panic!("expected Unrecognized, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_invalid_payload() {
        let err = WebhookEvent::parse(b"not json").unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Webhook(WebhookErrorKind::InvalidPayload)
        );
    }

    #[test]
    fn test_wrong_data_shape_is_invalid_payload() {
        let body = br#"{"type": "user.created", "data": {"email_addresses": "not-a-list"}}"#;
        let err = WebhookEvent::parse(body).unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Webhook(WebhookErrorKind::InvalidPayload)
        );
    }

    #[test]
    fn test_event_type_accessor() {
        let event = WebhookEvent::parse(br#"{"type": "session.ended", "data": {}}"#).unwrap();
        assert_eq!(event.event_type(), "session.ended");
    }
}
