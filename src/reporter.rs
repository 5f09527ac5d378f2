//! Human-facing progress output.
//!
//! Diagnostics go through `tracing` to stderr; the [`Reporter`] owns the
//! lines a user reads on stdout. It is passed explicitly to every component
//! that reports progress, and a buffered reporter captures output in tests.

use std::sync::Mutex;

use console::{Style, Term};

use crate::error::OptionalStepWarning;
use crate::scaffold::Stage;

enum Sink {
    Stdout(Term),
    Buffer(Mutex<Vec<String>>),
}

/// Writes progress lines, optionally styled.
pub struct Reporter {
    sink: Sink,
    color: bool,
    quiet: bool,
}

impl Reporter {
    /// A reporter writing to stdout.
    ///
    /// `quiet` suppresses everything except warnings.
    #[must_use]
    pub fn stdout(color: bool, quiet: bool) -> Self {
        Self {
            sink: Sink::Stdout(Term::stdout()),
            color,
            quiet,
        }
    }

    /// A reporter that keeps unstyled lines in memory.
    #[must_use]
    pub fn buffered() -> Self {
        Self {
            sink: Sink::Buffer(Mutex::new(Vec::new())),
            color: false,
            quiet: false,
        }
    }

    /// Lines captured by a buffered reporter.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Buffer(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            Sink::Stdout(_) => Vec::new(),
        }
    }

    /// Announces the start of a pipeline stage.
    pub fn stage(&self, stage: Stage) {
        let style = match stage {
            Stage::Done => Style::new().green().bold(),
            Stage::Failed => Style::new().red().bold(),
            _ => Style::new().cyan().bold(),
        };
        let marker = self.paint(&style, "==>");
        self.progress(&format!("{marker} {}", stage.headline()));
    }

    /// A plain progress line.
    pub fn info(&self, message: &str) {
        self.progress(&format!("    {message}"));
    }

    /// A completed step.
    pub fn success(&self, message: &str) {
        let mark = self.paint(&Style::new().green(), "ok");
        self.progress(&format!("    {mark} {message}"));
    }

    /// A non-fatal problem. Shown even when quiet.
    pub fn warn(&self, message: &str) {
        let mark = self.paint(&Style::new().yellow(), "warning:");
        self.emit(&format!("    {mark} {message}"));
    }

    /// Prints collected warnings as a closing summary.
    pub fn warnings(&self, warnings: &[OptionalStepWarning]) {
        if warnings.is_empty() {
            return;
        }
        let heading = self.paint(
            &Style::new().yellow().bold(),
            &format!("{} optional step(s) did not complete:", warnings.len()),
        );
        self.emit(&heading);
        for warning in warnings {
            self.emit(&format!("  - {warning}"));
        }
    }

    /// Raw block of text, such as a dry-run plan.
    pub fn block(&self, text: &str) {
        for line in text.lines() {
            self.progress(line);
        }
    }

    fn paint(&self, style: &Style, text: &str) -> String {
        if self.color {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn progress(&self, line: &str) {
        if !self.quiet {
            self.emit(line);
        }
    }

    fn emit(&self, line: &str) {
        match &self.sink {
            Sink::Stdout(term) => {
                let _ = term.write_line(line);
            }
            Sink::Buffer(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line.to_string());
                }
            }
        }
    }
}
