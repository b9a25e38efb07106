//! Terminal rendering of the flow state.
//!
//! Results go to `out` (stdout), everything else to `err` (stderr), so the
//! short URL can be piped into other tools.

use std::io::{self, Write};

use snip_core::{UiState, View};

pub struct TerminalView<O, E> {
    out: O,
    err: E,
}

impl TerminalView<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalView<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> View for TerminalView<O, E> {
    fn render(&mut self, state: &UiState) {
        // A closed pipe is not worth aborting over.
        let _ = match state {
            UiState::Idle => Ok(()),
            UiState::Loading => writeln!(self.err, "shortening..."),
            UiState::Success(result) => writeln!(self.out, "{result}"),
            UiState::Error(message) => writeln!(self.err, "error: {message}"),
        };
    }

    fn notify(&mut self, message: &str) {
        let _ = writeln!(self.err, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use snip_core::ShortenResult;

    use super::*;

    fn render_all(states: &[UiState]) -> (String, String) {
        let mut view = TerminalView::new(Vec::new(), Vec::new());
        for state in states {
            view.render(state);
        }
        let (out, err) = view.into_parts();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn success_goes_to_stdout_only() {
        let result = ShortenResult::from_identifier("abc.ly/xyz").unwrap();
        let (out, err) = render_all(&[UiState::Idle, UiState::Loading, UiState::Success(result)]);
        assert_eq!(out, "https://abc.ly/xyz\n");
        assert_eq!(err, "shortening...\n");
    }

    #[test]
    fn errors_go_to_stderr() {
        let (out, err) = render_all(&[UiState::Error("invalid URL".to_string())]);
        assert!(out.is_empty());
        assert_eq!(err, "error: invalid URL\n");
    }

    #[test]
    fn notifications_go_to_stderr() {
        let mut view = TerminalView::new(Vec::new(), Vec::new());
        view.notify("copied to clipboard");
        let (out, err) = view.into_parts();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "copied to clipboard\n");
    }
}
