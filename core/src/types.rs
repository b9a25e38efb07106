//! Domain types shared by every shortener API.
//!
//! # Design
//! `ShortenRequest` and `ShortenResult` can only be built through
//! constructors that uphold their invariants: a request always holds a
//! validated http(s) URL, and a result always holds a non-empty,
//! scheme-prefixed short URL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ShortenError;
use crate::validate::parse_http_url;

/// Short-code style requested from the owo API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    Owo,
    Gay,
    Zws,
    Sketchy,
}

/// How the owo API treats link previews for the short URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Metadata {
    Owoify,
    Proxy,
    Ignore,
}

#[derive(Debug, Error)]
#[error("unknown {kind} `{value}`, expected one of: {expected}")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl Generator {
    pub const ALL: [Generator; 4] = [Generator::Owo, Generator::Gay, Generator::Zws, Generator::Sketchy];

    pub fn as_str(self) -> &'static str {
        match self {
            Generator::Owo => "owo",
            Generator::Gay => "gay",
            Generator::Zws => "zws",
            Generator::Sketchy => "sketchy",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Generator {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Generator::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOption {
                kind: "generator",
                value: s.to_string(),
                expected: "owo, gay, zws, sketchy",
            })
    }
}

impl Metadata {
    pub const ALL: [Metadata; 3] = [Metadata::Owoify, Metadata::Proxy, Metadata::Ignore];

    pub fn as_str(self) -> &'static str {
        match self {
            Metadata::Owoify => "OWOIFY",
            Metadata::Proxy => "PROXY",
            Metadata::Ignore => "IGNORE",
        }
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metadata {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metadata::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOption {
                kind: "metadata",
                value: s.to_string(),
                expected: "owoify, proxy, ignore",
            })
    }
}

/// Optional knobs of a submission. APIs that don't support an option ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortenOptions {
    pub generator: Option<Generator>,
    pub metadata: Option<Metadata>,
}

/// A validated request to shorten one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenRequest {
    original_url: String,
    options: ShortenOptions,
}

impl ShortenRequest {
    /// Validates `raw` and builds a request.
    ///
    /// The URL is kept exactly as given; the API sees what the user typed.
    pub fn new(raw: &str, options: ShortenOptions) -> Result<Self, ShortenError> {
        parse_http_url(raw).ok_or(ShortenError::Validation)?;
        Ok(Self {
            original_url: raw.to_string(),
            options,
        })
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn generator(&self) -> Option<Generator> {
        self.options.generator
    }

    pub fn metadata(&self) -> Option<Metadata> {
        self.options.metadata
    }
}

/// A shortened link ready for display or copying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortenResult {
    short_url: String,
}

impl ShortenResult {
    /// Normalizes an identifier returned by an API into an absolute URL.
    ///
    /// `https://` is prepended unless the identifier already starts with
    /// `http://` or `https://`. Returns `None` for a blank identifier.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        let short_url = if has_http_scheme(identifier) {
            identifier.to_string()
        } else {
            format!("https://{identifier}")
        };
        Some(Self { short_url })
    }

    pub fn short_url(&self) -> &str {
        &self.short_url
    }
}

impl fmt::Display for ShortenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_url)
    }
}

pub(crate) fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Details the owo API keeps about an existing short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub id: String,
    pub destination: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub visits: Option<u64>,
    #[serde(default)]
    pub scrapes: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}
