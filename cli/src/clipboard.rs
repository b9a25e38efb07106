//! Clipboard access through the platform's copy utility.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use snip_core::{Clipboard, ClipboardError};
use tracing::debug;

const DEFAULT_PROGRAMS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

/// Pipes text into the first copy utility that accepts it.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    programs: Vec<(String, Vec<String>)>,
}

impl Default for CommandClipboard {
    fn default() -> Self {
        Self {
            programs: DEFAULT_PROGRAMS
                .iter()
                .map(|(program, args)| (program.to_string(), args.iter().map(|a| a.to_string()).collect()))
                .collect(),
        }
    }
}

impl CommandClipboard {
    #[cfg(test)]
    pub fn with_programs(programs: Vec<(String, Vec<String>)>) -> Self {
        Self { programs }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut last_error = None;
        for (program, args) in &self.programs {
            match pipe_into(program, args, text) {
                Ok(()) => {
                    debug!(program = program.as_str(), "copied to clipboard");
                    return Ok(());
                }
                Err(err) => {
                    debug!(program = program.as_str(), error = %err, "clipboard utility failed");
                    last_error = Some(format!("{program}: {err}"));
                }
            }
        }
        Err(ClipboardError::Denied(
            last_error.unwrap_or_else(|| "no clipboard utility available".to_string()),
        ))
    }
}

fn pipe_into(program: &str, args: &[String], text: &str) -> io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    // The child is reaped even when the write fails.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Err(io::Error::other("stdin not captured")),
    };
    let status = child.wait()?;
    written?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("exited with {status}")))
    }
}
