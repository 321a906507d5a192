//! Diagnostic reporting.
//!
//! spec.md §7 is explicit about the wire format and the recovery model:
//! every error is terminal. There is no warning accumulation, no
//! "continue and report more errors" pass — the first error a phase hits
//! is printed and the whole compilation aborts. That keeps this module
//! small: a [`Diagnostic`] names *what* went wrong and *where*; [`Handler`]
//! renders it against a [`crate::SourceMap`] into exactly
//!
//! ```text
//! file:line error: message
//! <source line, verbatim>
//! ```
//!
//! and the driver (`orangec-drv`) is the only place that turns that into a
//! process exit code.

mod codes;

pub use codes::DiagnosticCode;

use crate::span::{SourceMap, Span};
use std::fmt;

/// Severity of a diagnostic. Orange's core never emits anything but
/// [`Level::Error`] (spec.md §7: "all errors are terminal") — `Warning` and
/// `Note` exist so [`Handler::render`] has a uniform format to grow into,
/// should a future pass ever need to distinguish them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A single diagnostic: severity, code, message, and the span it points at.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            level: Level::Error,
            code,
            message: message.into(),
            span,
        }
    }
}

/// Renders diagnostics against a [`SourceMap`]. Stateless beyond the map
/// itself: there is nothing to accumulate because the core never recovers
/// from an error (spec.md §7).
pub struct Handler<'a> {
    sources: &'a SourceMap,
}

impl<'a> Handler<'a> {
    pub fn new(sources: &'a SourceMap) -> Self {
        Handler { sources }
    }

    /// Render a diagnostic as `file:line level: message` followed by the
    /// offending source line, verbatim (spec.md §7).
    pub fn render(&self, diag: &Diagnostic) -> String {
        let file = self.sources.get(diag.span.file_id);
        let (file_name, line_text) = match &file {
            Some(f) => (
                f.name().to_string(),
                f.line_at(diag.span.line as usize)
                    .unwrap_or("")
                    .to_string(),
            ),
            None => ("<unknown>".to_string(), String::new()),
        };
        format!(
            "{}:{} {}: {}\n{}",
            file_name, diag.span.line, diag.level, diag.message, line_text
        )
    }

    /// Render and print to stderr. Used by the driver right before exiting.
    pub fn emit(&self, diag: &Diagnostic) {
        eprintln!("{}", self.render(diag));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_file_line_and_source_text() {
        let mut sources = SourceMap::new();
        let file_id = sources.add_file("main.orange", "Main {\n  bad\n}\n");
        let span = Span::with_file(0, 0, file_id, 2, 3);
        let diag = Diagnostic::error(DiagnosticCode::E_PARSE_UNEXPECTED_TOKEN, "unexpected token", span);

        let handler = Handler::new(&sources);
        let rendered = handler.render(&diag);

        assert!(rendered.starts_with("main.orange:2 error: unexpected token"));
        assert!(rendered.contains("  bad"));
    }
}
