//! Progress reporting on a terminal.

use std::io::Write;

use nu_ansi_term::{Color, Style};
use playground_editor::EditorView;

/// Shows worker progress on a writer, stderr by default.
///
/// The formatted document is kept rather than printed so the caller can
/// send it to stdout on its own.
pub struct TerminalView<W: Write> {
    out: W,
    color: bool,
    output: String,
}

impl TerminalView<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr(), true)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            output: String::new(),
        }
    }

    /// The latest accepted result.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, style: Style, text: &str) {
        let result = if self.color {
            writeln!(self.out, "{}", style.paint(text))
        } else {
            writeln!(self.out, "{}", text)
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "cannot write progress");
        }
    }
}

impl<W: Write> EditorView for TerminalView<W> {
    fn push_status(&mut self, line: &str) {
        self.line(Style::new().fg(Color::DarkGray), line);
    }

    fn set_version(&mut self, version: &str) {
        self.line(Style::new().fg(Color::Cyan), version);
    }

    fn set_output(&mut self, text: &str) {
        self.output = text.to_owned();
    }

    fn show_settings(&mut self) {}

    fn worker_failed(&mut self, reason: &str) {
        self.line(Style::new().bold().fg(Color::Red), reason);
    }
}
