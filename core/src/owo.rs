//! JSON POST API in the style of owo.vc.
//!
//! `POST {base}/api/v2/link` with `{link, generator, metadata}` answers with
//! the created link, whose `id` is the short URL without its scheme.
//! `GET {base}/api/v2/link/{id}` returns the same record.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::api::{ensure_success, missing_identifier, ShortenerApi};
use crate::error::{ShortenError, GENERIC_API_FAILURE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Generator, LinkInfo, Metadata, ShortenRequest, ShortenResult};

pub const DEFAULT_OWO_BASE: &str = "https://owo.vc";

const LINK_NOT_FOUND: &str = "link not found";

#[derive(Serialize)]
struct CreateLink<'a> {
    link: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    generator: Option<Generator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

#[derive(Deserialize)]
struct CreatedLink {
    #[serde(default)]
    id: Option<String>,
}

/// Stateless codec for the owo link API. Holds only `base_url`.
#[derive(Debug, Clone)]
pub struct OwoApi {
    base_url: String,
}

impl Default for OwoApi {
    fn default() -> Self {
        Self::new(DEFAULT_OWO_BASE)
    }
}

impl OwoApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/api/v2/link`, optionally followed by `id` percent-encoded as a
    /// single path segment.
    fn link_url(&self, id: Option<&str>) -> Result<Url, ShortenError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ShortenError::InvalidEndpoint(format!("{}: {e}", self.base_url)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ShortenError::InvalidEndpoint(format!("{} cannot be a base URL", self.base_url)))?;
            segments.pop_if_empty().extend(["api", "v2", "link"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Build the lookup request for an existing short link.
    ///
    /// Accepts either the bare id (`owo.vc/abc`) or the full short URL; the
    /// scheme is stripped before encoding.
    pub fn build_link_info(&self, link: &str) -> Result<HttpRequest, ShortenError> {
        let id = strip_scheme(link.trim());
        if id.is_empty() {
            return Err(ShortenError::Validation);
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.link_url(Some(id))?.to_string(),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn parse_link_info(&self, response: HttpResponse) -> Result<LinkInfo, ShortenError> {
        let fallback = if response.status == 404 { LINK_NOT_FOUND } else { GENERIC_API_FAILURE };
        ensure_success(&response, fallback)?;
        serde_json::from_str(&response.body).map_err(|e| {
            debug!(error = %e, "link info body did not decode");
            missing_identifier(response.status)
        })
    }
}

impl ShortenerApi for OwoApi {
    fn name(&self) -> &'static str {
        "owo"
    }

    fn build_shorten(&self, request: &ShortenRequest) -> Result<HttpRequest, ShortenError> {
        let payload = CreateLink {
            link: request.original_url(),
            generator: request.generator(),
            metadata: request.metadata(),
        };
        let body = serde_json::to_string(&payload).map_err(|e| ShortenError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.link_url(None)?.to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    fn parse_shorten(&self, response: HttpResponse) -> Result<ShortenResult, ShortenError> {
        ensure_success(&response, GENERIC_API_FAILURE)?;
        let created: CreatedLink =
            serde_json::from_str(&response.body).map_err(|_| missing_identifier(response.status))?;
        created
            .id
            .as_deref()
            .and_then(ShortenResult::from_identifier)
            .ok_or_else(|| missing_identifier(response.status))
    }
}

fn strip_scheme(link: &str) -> &str {
    link.strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
        .unwrap_or(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShortenOptions;

    fn api() -> OwoApi {
        OwoApi::new("http://localhost:3000")
    }

    fn request(options: ShortenOptions) -> ShortenRequest {
        ShortenRequest::new("https://example.com/long/path", options).unwrap()
    }

    #[test]
    fn build_shorten_posts_json() {
        let options = ShortenOptions {
            generator: Some(Generator::Gay),
            metadata: Some(Metadata::Ignore),
        };
        let req = api().build_shorten(&request(options)).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/v2/link");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["link"], "https://example.com/long/path");
        assert_eq!(body["generator"], "gay");
        assert_eq!(body["metadata"], "IGNORE");
    }

    #[test]
    fn unset_options_are_omitted() {
        let req = api().build_shorten(&request(ShortenOptions::default())).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body.get("generator").is_none());
        assert!(body.get("metadata").is_none());
    }

    #[test]
    fn base_path_is_preserved() {
        let api = OwoApi::new("http://localhost:3000/proxy/");
        let req = api.build_shorten(&request(ShortenOptions::default())).unwrap();
        assert_eq!(req.url, "http://localhost:3000/proxy/api/v2/link");
    }

    #[test]
    fn bad_base_url_is_reported() {
        let err = OwoApi::new("not a base").build_shorten(&request(ShortenOptions::default())).unwrap_err();
        assert!(matches!(err, ShortenError::InvalidEndpoint(_)));
    }

    #[test]
    fn default_base_is_owo_vc() {
        let req = OwoApi::default().build_shorten(&request(ShortenOptions::default())).unwrap();
        assert_eq!(req.url, "https://owo.vc/api/v2/link");
    }

    #[test]
    fn parse_shorten_prepends_scheme() {
        let response = HttpResponse::new(200, r#"{"id":"abc.ly/xyz","destination":"https://example.com"}"#);
        let result = api().parse_shorten(response).unwrap();
        assert_eq!(result.short_url(), "https://abc.ly/xyz");
    }

    #[test]
    fn parse_shorten_keeps_existing_scheme() {
        let response = HttpResponse::new(200, r#"{"id":"https://abc.ly/xyz"}"#);
        let result = api().parse_shorten(response).unwrap();
        assert_eq!(result.short_url(), "https://abc.ly/xyz");
    }

    #[test]
    fn parse_shorten_error_body_message() {
        let response = HttpResponse::new(429, r#"{"message":"rate limited"}"#);
        let err = api().parse_shorten(response).unwrap_err();
        assert!(matches!(err, ShortenError::Api { status: 429, ref message } if message == "rate limited"));
    }

    #[test]
    fn parse_shorten_error_without_body() {
        let err = api().parse_shorten(HttpResponse::new(503, "")).unwrap_err();
        assert_eq!(err.user_message(), GENERIC_API_FAILURE);
    }

    #[test]
    fn parse_shorten_missing_id() {
        let err = api().parse_shorten(HttpResponse::new(200, r#"{"destination":"x"}"#)).unwrap_err();
        assert_eq!(err.user_message(), crate::api::MISSING_IDENTIFIER);
        let err = api().parse_shorten(HttpResponse::new(200, "not json")).unwrap_err();
        assert_eq!(err.user_message(), crate::api::MISSING_IDENTIFIER);
        let err = api().parse_shorten(HttpResponse::new(200, r#"{"id":""}"#)).unwrap_err();
        assert_eq!(err.user_message(), crate::api::MISSING_IDENTIFIER);
    }

    #[test]
    fn link_info_encodes_the_id_as_one_segment() {
        let req = api().build_link_info("https://owo.vc/abc").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/v2/link/owo.vc%2Fabc");
        assert!(req.body.is_none());

        let bare = api().build_link_info("owo.vc/abc").unwrap();
        assert_eq!(bare.url, req.url);
    }

    #[test]
    fn link_info_rejects_empty_link() {
        assert!(matches!(api().build_link_info("https://"), Err(ShortenError::Validation)));
    }

    #[test]
    fn parse_link_info_not_found() {
        let err = api().parse_link_info(HttpResponse::new(404, "")).unwrap_err();
        assert_eq!(err.user_message(), "link not found");
    }

    #[test]
    fn parse_link_info_success() {
        let body = r#"{"id":"owo.vc/abc","destination":"https://example.com","method":"OWO_VC","metadata":"OWOIFY","visits":3}"#;
        let info = api().parse_link_info(HttpResponse::new(200, body)).unwrap();
        assert_eq!(info.destination, "https://example.com");
        assert_eq!(info.visits, Some(3));
    }
}
