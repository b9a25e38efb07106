//! Error types for the shortener client.
//!
//! # Design
//! `ShortenError` covers everything a submission can fail with. Transport
//! failures get their own type so `Transport` implementations don't need to
//! know about API-level errors; they fold into `ShortenError::Network`.
//! Clipboard failures are separate because they never change the flow state.

use std::time::Duration;

use thiserror::Error;

/// Message shown when the API failed but gave no usable reason.
pub const GENERIC_API_FAILURE: &str = "failed to generate shortened link";

/// Message shown for any transport failure, including timeouts.
pub const GENERIC_NETWORK_FAILURE: &str = "network error: could not reach the shortening service";

/// Errors returned by validation, `ShortenerApi` parsing and `ShortenerClient`.
#[derive(Debug, Error)]
pub enum ShortenError {
    /// The input is not an absolute http(s) URL. No request was made.
    #[error("invalid URL")]
    Validation,

    /// The API answered but refused or gave an unusable response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never completed.
    #[error(transparent)]
    Network(#[from] TransportError),

    /// The configured endpoint is not a usable base URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ShortenError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ShortenError::Api {
            status,
            message: message.into(),
        }
    }

    /// Text suitable for the `Error` UI state.
    pub fn user_message(&self) -> String {
        match self {
            ShortenError::Validation => "invalid URL".to_string(),
            ShortenError::Api { message, .. } => message.clone(),
            ShortenError::Network(_) => GENERIC_NETWORK_FAILURE.to_string(),
            ShortenError::InvalidEndpoint(_) | ShortenError::Serialization(_) => GENERIC_API_FAILURE.to_string(),
        }
    }
}

/// Failure to complete an HTTP round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, refused or reset connections, TLS, body read errors.
    #[error("transport failure: {0}")]
    Connection(String),
}

/// Failure of a copy-to-clipboard action.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("nothing to copy yet")]
    NothingToCopy,

    #[error("clipboard unavailable: {0}")]
    Denied(String),
}
