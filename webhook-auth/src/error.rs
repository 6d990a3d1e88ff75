//! Error types for the `webhook-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and error kind enums.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for webhook-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in webhook-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Secret(SecretErrorKind),
    Signature(SignatureErrorKind),
    Timestamp(TimestampErrorKind),
}

/// Errors from parsing a provider-issued signing secret.
#[derive(Debug, PartialEq)]
pub enum SecretErrorKind {
    InvalidEncoding,
    EmptyKey,
}

/// Errors from computing a signature.
#[derive(Debug, PartialEq)]
pub enum SignatureErrorKind {
    InvalidKey,
}

/// Errors from the replay-window check on the claimed send time.
#[derive(Debug, PartialEq)]
pub enum TimestampErrorKind {
    Malformed,
    OutsideTolerance,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Secret(kind) => write!(f, "Signing secret error: {:?}", kind),
            ErrorKind::Signature(kind) => write!(f, "Signature error: {:?}", kind),
            ErrorKind::Timestamp(kind) => write!(f, "Timestamp error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Helper function to create signing secret errors.
pub fn secret_error(kind: SecretErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Secret(kind),
    }
}

/// Helper function to create signature errors.
pub fn signature_error(kind: SignatureErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Signature(kind),
    }
}

/// Helper function to create timestamp errors.
pub fn timestamp_error(kind: TimestampErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Timestamp(kind),
    }
}
