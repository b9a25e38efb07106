//! The submit → loading → success/error cycle behind a shorten form.
//!
//! # Design
//! `ShortenRequestFlow` owns the single `UiState` and pushes every transition
//! to a `View`. Presentation lives entirely behind that trait, so the same
//! flow drives a terminal, a GUI or a test recorder.
//!
//! `submit` borrows the flow mutably for the whole round trip, so two
//! submissions can never overlap. If a `submit` future is dropped while the
//! request is in flight, the flow is left in `Loading`; the next `submit`
//! replaces the abandoned one and its result is never observed.

use tracing::{debug, info};

use crate::api::ShortenerApi;
use crate::client::ShortenerClient;
use crate::error::{ClipboardError, ShortenError};
use crate::transport::Transport;
use crate::types::{ShortenOptions, ShortenRequest, ShortenResult};

/// Presentation state of the flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(ShortenResult),
    Error(String),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    /// The short URL when the last submission succeeded.
    pub fn short_url(&self) -> Option<&str> {
        match self {
            UiState::Success(result) => Some(result.short_url()),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Loading => "loading",
            UiState::Success(_) => "success",
            UiState::Error(_) => "error",
        }
    }
}

/// Where the flow shows its state.
pub trait View {
    fn render(&mut self, state: &UiState);

    /// Transient message that doesn't change the state, e.g. "copied".
    fn notify(&mut self, _message: &str) {}
}

/// Platform clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

pub struct ShortenRequestFlow<A, T, V> {
    client: ShortenerClient<A, T>,
    view: V,
    state: UiState,
}

impl<A: ShortenerApi, T: Transport, V: View> ShortenRequestFlow<A, T, V> {
    /// Builds the flow in `Idle` and renders it once.
    pub fn new(client: ShortenerClient<A, T>, view: V) -> Self {
        let mut flow = Self {
            client,
            view,
            state: UiState::Idle,
        };
        flow.view.render(&flow.state);
        flow
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn client(&self) -> &ShortenerClient<A, T> {
        &self.client
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Validate `raw`, shorten it and land in `Success` or `Error`.
    ///
    /// Invalid input goes straight to `Error("invalid URL")` without a
    /// request. Returns the state the flow ended in.
    pub async fn submit(&mut self, raw: &str, options: ShortenOptions) -> &UiState {
        if self.state.is_loading() {
            debug!("replacing an abandoned submission");
        }
        let request = match ShortenRequest::new(raw.trim(), options) {
            Ok(request) => request,
            Err(err) => {
                self.fail(&err);
                return &self.state;
            }
        };

        self.transition(UiState::Loading);
        match self.client.shorten(&request).await {
            Ok(result) => {
                info!(original = request.original_url(), short_url = result.short_url(), "link shortened");
                self.transition(UiState::Success(result));
            }
            Err(err) => self.fail(&err),
        }
        &self.state
    }

    /// Copy the current short URL. Failures are reported through
    /// `View::notify` and never change the state.
    pub fn copy_result<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C) -> Result<(), ClipboardError> {
        let outcome = match &self.state {
            UiState::Success(result) => clipboard.write_text(result.short_url()),
            _ => Err(ClipboardError::NothingToCopy),
        };
        match &outcome {
            Ok(()) => self.view.notify("copied to clipboard"),
            Err(err) => {
                debug!(error = %err, "copy failed");
                self.view.notify(&err.to_string());
            }
        }
        outcome
    }

    /// Back to `Idle`, discarding any result or error.
    pub fn reset(&mut self) {
        self.transition(UiState::Idle);
    }

    fn fail(&mut self, err: &ShortenError) {
        self.transition(UiState::Error(err.user_message()));
    }

    fn transition(&mut self, next: UiState) {
        debug!(from = self.state.label(), to = next.label(), "state transition");
        self.state = next;
        self.view.render(&self.state);
    }
}
