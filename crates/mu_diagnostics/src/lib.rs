//! mu_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Diagnostics are the only way problems in user documents leave the
//! compiler. They carry a code, a category, a resolved message and the
//! locations involved, and are accumulated rather than thrown so that one
//! run reports every problem it can find.

use mu_core::text::{LineAndCharacter, TextSpan};
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1001, 2300).
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// Where a diagnostic points: a document, and optionally a span inside it.
///
/// Document-level locations have no span; consumers must not assume one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The document path as it was loaded.
    pub file: String,
    pub span: Option<TextSpan>,
    /// Line/character of `span.start`, when the span is known.
    pub position: Option<LineAndCharacter>,
}

impl Location {
    /// A location covering a whole document.
    pub fn document(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            span: None,
            position: None,
        }
    }

    pub fn span(file: impl Into<String>, span: TextSpan, position: LineAndCharacter) -> Self {
        Self {
            file: file.into(),
            span: Some(span),
            position: Some(position),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(position) = self.position {
            write!(f, "({})", position)?;
        }
        Ok(())
    }
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where this diagnostic occurred, if anywhere.
    pub location: Option<Location>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    /// Secondary locations, e.g. the earlier definition of a duplicate.
    pub related_information: Vec<Diagnostic>,
}

impl Diagnostic {
    /// Create a new diagnostic without location info (global diagnostic).
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            location: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            related_information: Vec::new(),
        }
    }

    pub fn with_location(location: Location, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            location: Some(location),
            ..Self::new(message, args)
        }
    }

    /// Add related diagnostic information.
    pub fn with_related(mut self, related: Diagnostic) -> Self {
        self.related_information.push(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    pub fn file(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.file.as_str())
    }

    pub fn span(&self) -> Option<TextSpan> {
        self.location.as_ref().and_then(|l| l.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref location) = self.location {
            write!(f, "{}: ", location)?;
        }
        write!(f, "{} MU{}: {}", self.category, self.code, self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
///
/// The template is read once, left to right. Argument text is copied as is,
/// so an argument that itself looks like `{1}` is never substituted again.
/// Placeholders without a matching argument are kept literally.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after
            .find('}')
            .and_then(|close| Some((close, after[..close].parse::<usize>().ok()?)))
            .and_then(|(close, index)| Some((close, *args.get(index)?)));
        match arg {
            Some((close, arg)) => {
                result.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// Append-only destination for diagnostics.
///
/// Passes report into a sink they borrow; whoever owns the sink decides what
/// to do with the result.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// A collection of diagnostics accumulated during compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort diagnostics by file and position. The sort is stable, so
    /// diagnostics at the same place keep their report order.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.file()
                .cmp(&b.file())
                .then_with(|| a.span().cmp(&b.span()))
        });
    }
}

impl DiagnosticSink for DiagnosticCollection {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
        ($code:expr, Message, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Message, message: $msg }
        };
    }

    // ========================================================================
    // Document loading (1000-1099)
    // ========================================================================
    pub const DOCUMENT_0_IS_NOT_A_VALID_MANIFEST_1: DiagnosticMessage = diag!(1001, Error, "Document '{0}' is not a valid manifest: {1}");

    // ========================================================================
    // Binding (2300-2399)
    // ========================================================================
    pub const DUPLICATE_0_1: DiagnosticMessage = diag!(2300, Error, "Duplicate {0} '{1}'.");
    pub const _0_WAS_FIRST_DECLARED_HERE_AS_A_1: DiagnosticMessage = diag!(2301, Message, "'{0}' was first declared here as a {1}.");
}
