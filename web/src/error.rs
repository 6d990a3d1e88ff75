use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{
    DomainErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind, WebhookErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// Converts domain error kinds into HTTP responses at the request boundary.
// Response bodies stay short and generic; the detail lives in the log.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self.0.error_kind {
            DomainErrorKind::Webhook(webhook_error_kind) => match webhook_error_kind {
                WebhookErrorKind::MissingHeaders => {
                    (StatusCode::BAD_REQUEST, "Error: Missing svix headers").into_response()
                }
                WebhookErrorKind::MalformedTimestamp => {
                    (StatusCode::BAD_REQUEST, "Error: Invalid timestamp format").into_response()
                }
                WebhookErrorKind::StaleTimestamp => {
                    (StatusCode::BAD_REQUEST, "Error: Timestamp outside tolerance").into_response()
                }
                WebhookErrorKind::InvalidSignature => {
                    // Potential forgery or replay, logged at a severity ops can
                    // alert on, unlike plain malformed requests.
                    warn!("Rejected webhook signature: {:?}", self.0.source);
                    (StatusCode::BAD_REQUEST, "Error: Verification failed").into_response()
                }
                WebhookErrorKind::InvalidPayload => {
                    (StatusCode::BAD_REQUEST, "Error: Invalid payload").into_response()
                }
            },
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Config => {
                    error!("Request failed on server configuration: {:?}", self.0);
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
                InternalErrorKind::Other(_) => {
                    error!("Internal error: {:?}", self.0);
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Network => {
                    warn!("Downstream call failed: {:?}", self.0);
                    (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
                }
                ExternalErrorKind::Store(_) | ExternalErrorKind::Other(_) => {
                    error!("Downstream store call failed: {:?}", self.0);
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
