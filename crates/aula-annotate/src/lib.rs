//! Maps compiler diagnostics back onto the tokens and structural spans
//! that should visually carry them.
//!
//! Compilers report positions against their own idea of the source; an
//! editor has to turn `(line, column)` ranges into something it can
//! highlight. The mapping fails open: a diagnostic that cannot be
//! placed is dropped with a log line, never surfaced as an error of its
//! own.

use aula_core::{Diagnostic, SourceLocation, SourceSpan};
use aula_syntax::{StructuralNode, Token, TokenKind};

/// How a token relates to a diagnostic's range, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Token ends at or before the range starts.
    Before,
    /// Token overlaps or contains the range. A zero-width range at the
    /// token's first column counts — a "missing expression" diagnostic
    /// lands on the token after the gap.
    Overlaps,
    /// Token starts after the range ends.
    After,
    /// Token cannot carry an annotation at all (whitespace, the
    /// end-of-input marker).
    CannotShow,
}

/// Whether a token of this kind can visually carry an error marker.
fn can_show(kind: TokenKind) -> bool {
    !matches!(kind, TokenKind::Whitespace | TokenKind::Eof)
}

/// Relate `token` to a diagnostic range.
pub fn relate(token: &Token, range: &SourceSpan) -> Relation {
    if !can_show(token.kind) {
        return Relation::CannotShow;
    }
    if token.end <= range.start {
        return Relation::Before;
    }
    if token.start > range.end {
        return Relation::After;
    }
    Relation::Overlaps
}

/// Locates the token that should display a given diagnostic.
///
/// Tokens are bucketed by their start line; lookup scans the reported
/// line's bucket in document order.
pub struct ErrorSpanLocator {
    lines: Vec<Vec<Token>>,
}

impl ErrorSpanLocator {
    /// Build a locator from a lexed token sequence. Multi-line tokens
    /// live in the bucket of the line they start on. The zero-width
    /// end-of-input marker is not a real line occupant and is left out.
    pub fn new(tokens: &[Token]) -> Self {
        let mut lines: Vec<Vec<Token>> = Vec::new();
        for token in tokens {
            if token.kind == TokenKind::Eof {
                continue;
            }
            let line = token.start.line as usize;
            if lines.len() < line {
                lines.resize_with(line, Vec::new);
            }
            lines[line - 1].push(token.clone());
        }
        Self { lines }
    }

    fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Find the most specific token for `diagnostic`.
    ///
    /// The first overlapping token on the reported line wins. A range
    /// that sits between two tokens resolves to the token before the
    /// gap. A line one past the end of the document retries against the
    /// last line (compilers report errors against the position just
    /// after the final token). With `force`, a diagnostic whose line is
    /// entirely out of range falls back to the last token in the
    /// document capable of showing it.
    pub fn locate(&self, diagnostic: &Diagnostic, force: bool) -> Option<&Token> {
        let range = normalized(diagnostic.span);
        let mut line = range.start.line;

        if line == self.line_count() + 1 {
            line = self.line_count();
        }
        if line < 1 || line > self.line_count() {
            if !force {
                return None;
            }
            // Show on the very last token we can find.
            for bucket in self.lines.iter().rev() {
                for token in bucket.iter().rev() {
                    if can_show(token.kind) {
                        return Some(token);
                    }
                }
            }
            tracing::warn!(
                message = %diagnostic.message,
                "no token capable of showing diagnostic"
            );
            return None;
        }

        let mut last: Option<&Token> = None;
        for token in &self.lines[line as usize - 1] {
            match relate(token, &range) {
                Relation::CannotShow => continue,
                Relation::Overlaps => return Some(token),
                // The range ended before this token: the previous
                // showable token (if any) hosts it; otherwise the range
                // precedes everything on the line and the first token
                // will do.
                Relation::After => return Some(last.unwrap_or(token)),
                Relation::Before => last = Some(token),
            }
        }
        if last.is_some() {
            return last;
        }
        tracing::warn!(
            line,
            message = %diagnostic.message,
            "no token found to carry diagnostic"
        );
        None
    }
}

/// Innermost structural node whose span contains `location`.
pub fn enclosing_structure<'a>(
    root: &'a StructuralNode,
    location: SourceLocation,
) -> Option<&'a StructuralNode> {
    if !root.span.contains(location) {
        return None;
    }
    for child in &root.children {
        if let Some(node) = enclosing_structure(child, location) {
            return Some(node);
        }
    }
    Some(root)
}

/// Compilers occasionally emit inverted ranges; treat them as the
/// zero-width point at the start.
fn normalized(span: SourceSpan) -> SourceSpan {
    if span.end < span.start {
        SourceSpan::point(span.start)
    } else {
        span
    }
}
