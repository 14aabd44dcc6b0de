//! The error sink: where failures and warnings are reported
//!
//! The evaluator unwinds with `Result`; before each error starts
//! propagating it is reported here exactly once, together with the call
//! stack at the point of failure. Console formatting lives behind the
//! trait so hosts can substitute their own sink.

use std::fmt::Write as _;

use crate::environment::Frame;
use crate::syntax::ast::Span;

/// Receiver for evaluation failures and warnings.
pub trait DiagnosticSink {
    /// Report a failure. `trace` is the call stack, outermost first.
    fn fail(&mut self, span: Option<Span>, message: &str, trace: &[Frame]);

    /// Report a warning. Warnings carry no stack trace.
    fn warn(&mut self, span: Option<Span>, message: &str);
}

/// Render a failure in the user-visible shape: severity, message,
/// `line:col in <origin>`, then the call stack innermost-first as
/// `> in <frame-name>` lines.
pub fn render_failure(origin: &str, span: Option<Span>, message: &str, trace: &[Frame]) -> String {
    let mut out = render_line("ERROR", origin, span, message);
    for frame in trace.iter().rev() {
        let _ = write!(out, "\n> in {}", frame.name);
    }
    out
}

/// Render a warning: same shape as a failure, no stack.
pub fn render_warning(origin: &str, span: Option<Span>, message: &str) -> String {
    render_line("WARNING", origin, span, message)
}

fn render_line(severity: &str, origin: &str, span: Option<Span>, message: &str) -> String {
    match span {
        Some(span) => format!(
            "{severity}: {message} at {} in {origin}",
            span.start
        ),
        None => format!("{severity}: {message} in {origin}"),
    }
}

/// Sink that writes to standard error.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    origin: String,
}

impl ConsoleSink {
    /// Create a console sink labelling messages with the given origin,
    /// typically a file name.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new("<input>")
    }
}

impl DiagnosticSink for ConsoleSink {
    fn fail(&mut self, span: Option<Span>, message: &str, trace: &[Frame]) {
        eprintln!("{}", render_failure(&self.origin, span, message, trace));
    }

    fn warn(&mut self, span: Option<Span>, message: &str) {
        eprintln!("{}", render_warning(&self.origin, span, message));
    }
}

/// Sink that records rendered messages, for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    /// Rendered failures, in report order
    pub failures: Vec<String>,
    /// Rendered warnings, in report order
    pub warnings: Vec<String>,
    origin: String,
}

impl BufferSink {
    /// Create a buffering sink with the given origin label.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            failures: Vec::new(),
            warnings: Vec::new(),
            origin: origin.into(),
        }
    }
}

impl DiagnosticSink for BufferSink {
    fn fail(&mut self, span: Option<Span>, message: &str, trace: &[Frame]) {
        self.failures
            .push(render_failure(&self.origin, span, message, trace));
    }

    fn warn(&mut self, span: Option<Span>, message: &str) {
        self.warnings
            .push(render_warning(&self.origin, span, message));
    }
}
