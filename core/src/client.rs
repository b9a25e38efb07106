//! Shortener client: one API codec plus one transport.
//!
//! # Design
//! `ShortenerClient` glues a `ShortenerApi` (what to send, how to read the
//! answer) to a `Transport` (how to send it) and owns the timeout. It holds
//! no state between calls.

use std::time::Duration;

use tracing::{debug, warn};

use crate::api::ShortenerApi;
use crate::error::{ShortenError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::owo::OwoApi;
use crate::transport::{Transport, UreqTransport};
use crate::types::{LinkInfo, ShortenRequest, ShortenResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ShortenerClient<A, T> {
    api: A,
    transport: T,
    timeout: Duration,
}

impl<A: ShortenerApi> ShortenerClient<A, UreqTransport> {
    /// Client over real HTTP with the given timeout.
    pub fn over_http(api: A, timeout: Duration) -> Self {
        Self::new(api, UreqTransport::new(timeout)).with_timeout(timeout)
    }
}

impl<A: ShortenerApi, T: Transport> ShortenerClient<A, T> {
    pub fn new(api: A, transport: T) -> Self {
        Self {
            api,
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Shorten one URL with a single round trip.
    pub async fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResult, ShortenError> {
        let http_request = self.api.build_shorten(request)?;
        debug!(api = self.api.name(), url = %http_request.url, "shortening");
        let response = self.round_trip(http_request).await?;
        let result = self.api.parse_shorten(response);
        match &result {
            Ok(shortened) => debug!(api = self.api.name(), short_url = shortened.short_url(), "shortened"),
            Err(err) => warn!(api = self.api.name(), error = %err, "shortener rejected request"),
        }
        result
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ShortenError> {
        match tokio::time::timeout(self.timeout, self.transport.execute(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => {
                warn!(error = %err, "request failed");
                Err(err.into())
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "request timed out");
                Err(TransportError::Timeout(self.timeout).into())
            }
        }
    }
}

impl<T: Transport> ShortenerClient<OwoApi, T> {
    /// Look up what the owo API knows about an existing short link.
    pub async fn link_info(&self, link: &str) -> Result<LinkInfo, ShortenError> {
        let request = self.api.build_link_info(link)?;
        let response = self.round_trip(request).await?;
        self.api.parse_link_info(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::error::GENERIC_NETWORK_FAILURE;
    use crate::types::ShortenOptions;

    /// Answers every request with a canned response and records what it saw.
    struct Canned {
        response: Result<(u16, &'static str), &'static str>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn ok(status: u16, body: &'static str) -> Self {
            Self {
                response: Ok((status, body)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(reason: &'static str) -> Self {
            Self {
                response: Err(reason),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            match self.response {
                Ok((status, body)) => Ok(HttpResponse::new(status, body)),
                Err(reason) => Err(TransportError::Connection(reason.to_string())),
            }
        }
    }

    struct Stalled {
        calls: AtomicUsize,
    }

    impl Transport for Stalled {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(HttpResponse::new(200, r#"{"id":"late.ly/x"}"#))
        }
    }

    fn request() -> ShortenRequest {
        ShortenRequest::new("https://example.com", ShortenOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn shorten_sends_one_request_and_normalizes() {
        let client = ShortenerClient::new(OwoApi::new("http://mock"), Canned::ok(200, r#"{"id":"abc.ly/xyz"}"#));
        let result = client.shorten(&request()).await.unwrap();
        assert_eq!(result.short_url(), "https://abc.ly/xyz");

        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "http://mock/api/v2/link");
    }

    #[tokio::test]
    async fn transport_failure_is_a_network_error() {
        let client = ShortenerClient::new(OwoApi::new("http://mock"), Canned::failing("connection refused"));
        let err = client.shorten(&request()).await.unwrap_err();
        assert!(matches!(err, ShortenError::Network(TransportError::Connection(_))));
        assert_eq!(err.user_message(), GENERIC_NETWORK_FAILURE);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_transport_times_out() {
        let transport = Stalled {
            calls: AtomicUsize::new(0),
        };
        let client = ShortenerClient::new(OwoApi::new("http://mock"), transport).with_timeout(Duration::from_secs(2));
        let err = client.shorten(&request()).await.unwrap_err();
        assert!(matches!(err, ShortenError::Network(TransportError::Timeout(d)) if d == Duration::from_secs(2)));
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bad_endpoint_fails_before_sending() {
        let client = ShortenerClient::new(OwoApi::new("nope"), Canned::ok(200, "{}"));
        let err = client.shorten(&request()).await.unwrap_err();
        assert!(matches!(err, ShortenError::InvalidEndpoint(_)));
        assert!(client.transport().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn link_info_round_trip() {
        let body = r#"{"id":"owo.vc/abc","destination":"https://example.com","visits":7}"#;
        let client = ShortenerClient::new(OwoApi::new("http://mock"), Canned::ok(200, body));
        let info = client.link_info("https://owo.vc/abc").await.unwrap();
        assert_eq!(info.visits, Some(7));
        assert_eq!(
            client.transport().seen.lock().unwrap()[0].url,
            "http://mock/api/v2/link/owo.vc%2Fabc"
        );
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        let client = ShortenerClient::new(OwoApi::default(), Canned::ok(200, "{}"));
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }
}
