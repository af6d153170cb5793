//! Text model primitives shared across Aula crates: source locations,
//! spans, and compiler diagnostics.
//!
//! Everything here is 1-based (the first character of a document is
//! line 1, column 1), matching what external compilers report and what
//! editors display. Span ends are exclusive: a span covering a single
//! character at line 1, column 1 ends at line 1, column 2.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 1-based line/column position within a source document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The start of a document.
    #[inline]
    pub const fn start_of_document() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A region of a source document, `start..end` in document order.
///
/// `start <= end` always holds for spans produced by this workspace;
/// [`SourceSpan::new`] debug-asserts it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    #[inline]
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }

    /// A zero-width span at `location`.
    #[inline]
    pub const fn point(location: SourceLocation) -> Self {
        Self {
            start: location,
            end: location,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `location` falls inside this span (start inclusive, end
    /// exclusive). Zero-width spans contain nothing.
    pub fn contains(&self, location: SourceLocation) -> bool {
        self.start <= location && location < self.end
    }

    /// Whether `other` is entirely inside this span.
    pub fn contains_span(&self, other: &SourceSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// A diagnostic reported by an external compiler, in the shape Aula's
/// annotation layer consumes: a source range plus message and severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: SourceSpan,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}
