//! Command-line configuration.
//!
//! Every global flag can also come from the environment:
//!
//! - `SNIP_API` - `owo` (default) or `query`
//! - `SNIP_ENDPOINT` - API base URL (owo) or full endpoint (query)
//! - `SNIP_LINK_BASE` - domain bare codes are appended to (query only)
//! - `SNIP_TIMEOUT` - request timeout in seconds (default: 10)
//! - `SNIP_LOG_FORMAT` - `text` (default) or `json`
//! - `RUST_LOG` - log filter (default: `warn`)

use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use snip_core::owo::DEFAULT_OWO_BASE;
use snip_core::{Generator, Metadata, OwoApi, QueryApi, ShortenOptions, ShortenerApi};

pub type DynApi = Box<dyn ShortenerApi + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApiKind {
    /// JSON POST API in the style of owo.vc
    Owo,
    /// GET API taking the URL as a `url` query parameter
    Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "snip", version, about = "Shorten URLs through a third-party shortener API")]
pub struct Cli {
    #[arg(long, value_enum, env = "SNIP_API", default_value_t = ApiKind::Owo, global = true)]
    pub api: ApiKind,

    #[arg(long, env = "SNIP_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    #[arg(long, env = "SNIP_LINK_BASE", global = true)]
    pub link_base: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "SNIP_TIMEOUT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout: u64,

    #[arg(long, value_enum, env = "SNIP_LOG_FORMAT", default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Short-code style (owo, gay, zws, sketchy)
    #[arg(short, long, global = true)]
    pub generator: Option<Generator>,

    /// Link preview handling (owoify, proxy, ignore)
    #[arg(short, long, global = true)]
    pub metadata: Option<Metadata>,

    /// Without a subcommand, URLs are read from stdin one per line.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a single URL and print the result
    Shorten {
        url: String,
        /// Copy the short URL to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Show what the owo API knows about a short link
    Info { link: String },
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn options(&self) -> ShortenOptions {
        ShortenOptions {
            generator: self.generator,
            metadata: self.metadata,
        }
    }

    pub fn owo_api(&self) -> OwoApi {
        OwoApi::new(self.endpoint.as_deref().unwrap_or(DEFAULT_OWO_BASE))
    }

    /// The API selected by `--api`, configured from the remaining flags.
    pub fn api(&self) -> Result<DynApi> {
        match self.api {
            ApiKind::Owo => Ok(Box::new(self.owo_api())),
            ApiKind::Query => {
                let Some(endpoint) = self.endpoint.as_deref() else {
                    bail!("--endpoint (or SNIP_ENDPOINT) is required for the query API");
                };
                let api = QueryApi::new(endpoint);
                Ok(Box::new(match self.link_base.as_deref() {
                    Some(base) => api.with_link_base(base),
                    None => api,
                }))
            }
        }
    }
}
