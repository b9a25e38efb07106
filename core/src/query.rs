//! GET API that takes the long URL as a query parameter.
//!
//! `GET {endpoint}?url=<percent-encoded>` answers with
//! `{"ok": true, "result": {"code", "short_link", "full_short_link"}}`.
//! Failures come back as `{"ok": false, "error": "..."}`, sometimes with a
//! 2xx status.

use serde::Deserialize;
use url::Url;

use crate::api::{body_message, ensure_success, generic_failure, missing_identifier, ShortenerApi};
use crate::error::{ShortenError, GENERIC_API_FAILURE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ShortenRequest, ShortenResult};

#[derive(Deserialize)]
struct Reply {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    result: Option<ReplyResult>,
}

#[derive(Deserialize)]
struct ReplyResult {
    #[serde(default)]
    full_short_link: Option<String>,
    #[serde(default)]
    short_link: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Stateless codec for query-parameter shorteners.
#[derive(Debug, Clone)]
pub struct QueryApi {
    endpoint: String,
    link_base: Option<String>,
}

impl QueryApi {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim().to_string(),
            link_base: None,
        }
    }

    /// Domain that bare codes are appended to. Defaults to the endpoint's
    /// host.
    pub fn with_link_base(mut self, link_base: &str) -> Self {
        self.link_base = Some(link_base.trim().trim_end_matches('/').to_string());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn code_base(&self) -> Option<String> {
        if let Some(base) = &self.link_base {
            return Some(base.clone());
        }
        let url = Url::parse(&self.endpoint).ok()?;
        let host = url.host_str()?;
        Some(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }

    fn identifier(&self, result: ReplyResult) -> Option<String> {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        non_empty(&result.full_short_link)
            .or_else(|| non_empty(&result.short_link))
            .or_else(|| {
                let code = non_empty(&result.code)?;
                Some(format!("{}/{code}", self.code_base()?))
            })
    }
}

impl ShortenerApi for QueryApi {
    fn name(&self) -> &'static str {
        "query"
    }

    fn build_shorten(&self, request: &ShortenRequest) -> Result<HttpRequest, ShortenError> {
        let url = Url::parse_with_params(&self.endpoint, &[("url", request.original_url())])
            .map_err(|e| ShortenError::InvalidEndpoint(format!("{}: {e}", self.endpoint)))?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        })
    }

    fn parse_shorten(&self, response: HttpResponse) -> Result<ShortenResult, ShortenError> {
        ensure_success(&response, GENERIC_API_FAILURE)?;
        let reply: Reply = serde_json::from_str(&response.body).map_err(|_| missing_identifier(response.status))?;
        if reply.ok == Some(false) {
            return Err(match body_message(&response.body) {
                Some(message) => ShortenError::api(response.status, message),
                None => generic_failure(response.status),
            });
        }
        reply
            .result
            .and_then(|result| self.identifier(result))
            .as_deref()
            .and_then(ShortenResult::from_identifier)
            .ok_or_else(|| missing_identifier(response.status))
    }
}
