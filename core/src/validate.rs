//! URL validation for submissions.

use url::Url;

/// Returns true when `raw` is an absolute `http` or `https` URL with a host.
///
/// Other schemes (`ftp`, `mailto`, `file`, ...) are rejected, as is input
/// the parser would silently rewrite: surrounding whitespace or an embedded
/// tab, carriage return or newline.
pub fn validate(raw: &str) -> bool {
    parse_http_url(raw).is_some()
}

pub(crate) fn parse_http_url(raw: &str) -> Option<Url> {
    if raw.trim() != raw || raw.contains(['\t', '\r', '\n']) {
        return None;
    }
    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().filter(|host| !host.is_empty())?;
    Some(url)
}
