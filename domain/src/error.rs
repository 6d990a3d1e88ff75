//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

use webhook_auth::error::{
    Error as WebhookAuthError, ErrorKind as WebhookAuthErrorKind, TimestampErrorKind,
};

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries: `domain` depends on `webhook-auth`, and `web` depends on `domain`,
/// but `web` should not depend directly on `webhook-auth`. Ultimately the various
/// `error_kind`s are used by `web` to return appropriate HTTP status codes and
/// messages to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Webhook(WebhookErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Store(String),
    Other(String),
}

/// Rejection kinds for inbound webhook requests. Each maps to a 4xx response
/// at the web layer; `InvalidSignature` is additionally logged as a potential
/// attack, at a different operational severity than malformed requests.
#[derive(Debug, PartialEq)]
pub enum WebhookErrorKind {
    MissingHeaders,
    MalformedTimestamp,
    StaleTimestamp,
    InvalidSignature,
    InvalidPayload,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `webhook-auth` layer to the `domain` layer.
impl From<WebhookAuthError> for Error {
    fn from(err: WebhookAuthError) -> Self {
        let error_kind = match &err.error_kind {
            // A secret that fails to parse is an operator configuration problem,
            // not a property of the inbound request.
            WebhookAuthErrorKind::Secret(_) => DomainErrorKind::Internal(InternalErrorKind::Config),
            WebhookAuthErrorKind::Signature(_) => DomainErrorKind::Internal(
                InternalErrorKind::Other("signature computation failed".to_string()),
            ),
            WebhookAuthErrorKind::Timestamp(TimestampErrorKind::Malformed) => {
                DomainErrorKind::Webhook(WebhookErrorKind::MalformedTimestamp)
            }
            WebhookAuthErrorKind::Timestamp(TimestampErrorKind::OutsideTolerance) => {
                DomainErrorKind::Webhook(WebhookErrorKind::StaleTimestamp)
            }
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

/// Helper function to create webhook rejection errors.
pub fn webhook_error(kind: WebhookErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Webhook(kind),
    }
}

/// Helper function to create configuration errors.
pub fn config_error(message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    }
}
