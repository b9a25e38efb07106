//! The seam between a shortener service's wire format and the rest of the
//! client.
//!
//! # Design
//! A `ShortenerApi` is a pure codec: it turns a `ShortenRequest` into an
//! `HttpRequest` and an `HttpResponse` into a `ShortenResult`. Adding a new
//! service means adding one implementation; the flow and transport don't
//! change.

use serde_json::Value;

use crate::error::{ShortenError, GENERIC_API_FAILURE};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{ShortenRequest, ShortenResult};

/// Message used when a 2xx body has no usable identifier.
pub const MISSING_IDENTIFIER: &str = "shortened link not found in response";

/// Request builder and response parser for one shortener service.
pub trait ShortenerApi {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn build_shorten(&self, request: &ShortenRequest) -> Result<HttpRequest, ShortenError>;

    fn parse_shorten(&self, response: HttpResponse) -> Result<ShortenResult, ShortenError>;
}

impl<A: ShortenerApi + ?Sized> ShortenerApi for Box<A> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn build_shorten(&self, request: &ShortenRequest) -> Result<HttpRequest, ShortenError> {
        (**self).build_shorten(request)
    }

    fn parse_shorten(&self, response: HttpResponse) -> Result<ShortenResult, ShortenError> {
        (**self).parse_shorten(response)
    }
}

/// Map a non-2xx response to `ShortenError::Api`, keeping the body's own
/// explanation when it has one.
pub(crate) fn ensure_success(response: &HttpResponse, fallback: &str) -> Result<(), ShortenError> {
    if response.is_success() {
        return Ok(());
    }
    let message = body_message(&response.body).unwrap_or_else(|| fallback.to_string());
    Err(ShortenError::api(response.status, message))
}

/// Pull a human-readable reason out of a JSON error body.
///
/// Looks at `message` first, then `error`. Non-JSON bodies yield `None`.
pub(crate) fn body_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

pub(crate) fn generic_failure(status: u16) -> ShortenError {
    ShortenError::api(status, GENERIC_API_FAILURE)
}

pub(crate) fn missing_identifier(status: u16) -> ShortenError {
    ShortenError::api(status, MISSING_IDENTIFIER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        assert_eq!(
            body_message(r#"{"message":"rate limited","error":"other"}"#).as_deref(),
            Some("rate limited")
        );
    }

    #[test]
    fn error_field_is_a_fallback() {
        assert_eq!(body_message(r#"{"ok":false,"error":"bad url"}"#).as_deref(), Some("bad url"));
    }

    #[test]
    fn unusable_bodies_have_no_message() {
        assert!(body_message("").is_none());
        assert!(body_message("<html>502 Bad Gateway</html>").is_none());
        assert!(body_message(r#"{"message":42}"#).is_none());
        assert!(body_message(r#"{"message":"   "}"#).is_none());
    }

    #[test]
    fn ensure_success_uses_fallback_without_body_message() {
        let err = ensure_success(&HttpResponse::new(500, "oops"), GENERIC_API_FAILURE).unwrap_err();
        match err {
            ShortenError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, GENERIC_API_FAILURE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ensure_success_passes_2xx() {
        assert!(ensure_success(&HttpResponse::new(201, ""), GENERIC_API_FAILURE).is_ok());
    }
}
