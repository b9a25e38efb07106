//! Client core for third-party URL shorteners.
//!
//! # Overview
//! Validates a URL, shortens it with one call to a shortener API and tracks
//! the outcome as a small UI state machine with copy-to-clipboard support.
//!
//! # Design
//! - `ShortenerApi` implementations (`OwoApi`, `QueryApi`) only build
//!   `HttpRequest` values and parse `HttpResponse` values; they never touch
//!   the network.
//! - `Transport` executes the round trip. `UreqTransport` is the real one;
//!   tests plug in fakes.
//! - `ShortenerClient` combines the two and enforces the timeout.
//! - `ShortenRequestFlow` owns the `UiState` and reports transitions to a
//!   `View`; the clipboard sits behind the `Clipboard` trait.

pub mod api;
pub mod client;
pub mod error;
pub mod flow;
pub mod http;
pub mod owo;
pub mod query;
pub mod transport;
pub mod types;
pub mod validate;

pub use api::ShortenerApi;
pub use client::{ShortenerClient, DEFAULT_TIMEOUT};
pub use error::{ClipboardError, ShortenError, TransportError};
pub use flow::{Clipboard, ShortenRequestFlow, UiState, View};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use owo::OwoApi;
pub use query::QueryApi;
pub use transport::{Transport, UreqTransport};
pub use types::{Generator, LinkInfo, Metadata, ShortenOptions, ShortenRequest, ShortenResult};
pub use validate::validate;
