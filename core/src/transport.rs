//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only place that does I/O. The production
//! implementation drives a blocking `ureq` agent on tokio's blocking pool;
//! tests swap in in-memory fakes. Non-2xx statuses are data, not errors:
//! status interpretation belongs to the `ShortenerApi`.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// One HTTP round trip.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// `ureq`-backed transport.
///
/// The agent's global timeout matches the client timeout so an abandoned
/// blocking call doesn't linger past it.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    fn execute_blocking(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        debug!(method = method.as_str(), %url, "sending request");

        let result = match method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&url);
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&url);
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response.body_mut().read_to_string().map_err(|e| self.map_error(e))?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse { status, headers, body })
    }

    fn map_error(&self, err: ureq::Error) -> TransportError {
        match err {
            ureq::Error::Timeout(_) => TransportError::Timeout(self.timeout),
            other => TransportError::Connection(other.to_string()),
        }
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let transport = self.clone();
        tokio::task::spawn_blocking(move || transport.execute_blocking(request))
            .await
            .map_err(|e| TransportError::Connection(format!("transport worker failed: {e}")))?
    }
}
