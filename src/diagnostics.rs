//! Structured diagnostics and the injected sink that receives them.
//!
//! spec.md §9 leaves the diagnostic channel as an open question ("the
//! source writes directly to standard output with no severity levels").
//! SPEC_FULL.md §6 resolves it: a `Diagnostic` record plus a
//! `DiagnosticSink` trait the caller supplies, so the parser never hard
//! codes its destination.

use std::io::Write;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, line: u32, severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            file: file.into(),
            line,
            severity,
            message: message.into(),
        }
    }
}

/// Receiver for diagnostics emitted during a parse. The parser never writes
/// to a fixed destination; it only ever goes through a sink the caller
/// supplies.
pub trait DiagnosticSink {
    fn report(&mut self, diag: Diagnostic);
}

/// Collects diagnostics in memory, the default sink for library callers and
/// tests.
#[derive(Debug, Default)]
pub struct VecSink(pub Vec<Diagnostic>);

impl VecSink {
    pub fn new() -> Self {
        VecSink(Vec::new())
    }
}

impl DiagnosticSink for VecSink {
    fn report(&mut self, diag: Diagnostic) {
        self.0.push(diag);
    }
}

/// Prints diagnostics to stderr, colorized by severity. Used by the CLI.
pub struct TermSink {
    stream: StandardStream,
}

impl TermSink {
    pub fn new() -> Self {
        TermSink {
            stream: StandardStream::stderr(termcolor::ColorChoice::Auto),
        }
    }
}

impl Default for TermSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for TermSink {
    fn report(&mut self, diag: Diagnostic) {
        let color = match diag.severity {
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        };
        let label = match diag.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        let _ = self.stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(self.stream, "{label}");
        let _ = self.stream.reset();
        let _ = writeln!(self.stream, ": {}:{}: {}", diag.file, diag.line, diag.message);
    }
}
