//! Pull-based token stream with look-ahead and backtracking.

use aula_core::SourceLocation;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// A resumption point returned by [`TokenStream::mark`].
///
/// Marks index the absolute token sequence, so a stale mark (one from
/// another stream, or used after a later `reset` already rewound past
/// it) is detectable and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Wraps a [`Lexer`] into a stream with look-ahead and `mark`/`reset`.
///
/// Without an outstanding mark the stream holds only the small
/// look-ahead buffer; while a mark is outstanding, consumed tokens are
/// retained so a structural parse can scan ahead, classify what it is
/// looking at, and rewind.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    /// Fetched-but-unconsumed (plus retained-for-replay) tokens.
    buf: Vec<Token>,
    /// Index into `buf` of the next token to hand out.
    pos: usize,
    /// Count of tokens consumed and discarded before `buf[0]`.
    discarded: usize,
    /// Outstanding marks, oldest first.
    marks: Vec<usize>,
}

impl<'a> TokenStream<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::from_lexer(Lexer::new(text))
    }

    pub fn from_lexer(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            buf: Vec::new(),
            pos: 0,
            discarded: 0,
            marks: Vec::new(),
        }
    }

    /// Consume and return the next token. Past end of input this keeps
    /// returning the `Eof` token.
    pub fn next(&mut self) -> Token {
        self.fill_to(self.pos);
        let token = self.buf[self.pos].clone();
        self.pos += 1;
        self.compact();
        token
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> &Token {
        self.peek_nth(0)
    }

    /// Look `n` tokens ahead (`peek_nth(0)` == `peek`).
    pub fn peek_nth(&mut self, n: usize) -> &Token {
        self.fill_to(self.pos + n);
        &self.buf[self.pos + n]
    }

    /// Source location of the next token's first character.
    pub fn location(&mut self) -> SourceLocation {
        self.peek().start
    }

    pub fn at_eof(&mut self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Begin retaining consumed tokens so [`TokenStream::reset`] can
    /// rewind to this point.
    pub fn mark(&mut self) -> Mark {
        let mark = Mark(self.discarded + self.pos);
        self.marks.push(mark.0);
        mark
    }

    /// Rewind to `mark` and release it (and any marks taken after it).
    ///
    /// # Panics
    ///
    /// Panics if `mark` was not produced by this stream or was already
    /// invalidated — a caller contract violation, not an input error.
    pub fn reset(&mut self, mark: Mark) {
        let position = self
            .marks
            .iter()
            .rposition(|&m| m == mark.0)
            .expect("reset with a stale or foreign mark");
        self.marks.truncate(position);
        assert!(mark.0 >= self.discarded, "mark points at discarded tokens");
        self.pos = mark.0 - self.discarded;
        self.compact();
    }

    /// Release `mark` without rewinding, allowing the retained tokens
    /// to be discarded.
    pub fn release(&mut self, mark: Mark) {
        if let Some(position) = self.marks.iter().rposition(|&m| m == mark.0) {
            self.marks.truncate(position);
        }
        self.compact();
    }

    fn fill_to(&mut self, index: usize) {
        while self.buf.len() <= index {
            let token = self.lexer.next_token();
            self.buf.push(token);
        }
    }

    /// Drop consumed tokens that no outstanding mark can still reach.
    fn compact(&mut self) {
        let keep_from = match self.marks.first() {
            Some(&oldest) => oldest - self.discarded,
            None => self.pos,
        };
        if keep_from > 0 {
            self.buf.drain(..keep_from);
            self.discarded += keep_from;
            self.pos -= keep_from;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn peek_does_not_consume() {
        let mut stream = TokenStream::new("int x;");
        assert_eq!(stream.peek().kind, TokenKind::IntKw);
        assert_eq!(stream.peek().kind, TokenKind::IntKw);
        assert_eq!(stream.next().kind, TokenKind::IntKw);
        assert_eq!(stream.peek().kind, TokenKind::Whitespace);
    }

    #[test]
    fn peeking_past_the_end_repeats_eof() {
        let mut stream = TokenStream::new(";");
        assert_eq!(stream.peek_nth(3).kind, TokenKind::Eof);
        assert_eq!(stream.next().kind, TokenKind::Semicolon);
        assert_eq!(stream.next().kind, TokenKind::Eof);
        assert_eq!(stream.next().kind, TokenKind::Eof);
    }

    #[test]
    fn mark_and_reset_replays_tokens() {
        let mut stream = TokenStream::new("a b c");
        let mark = stream.mark();
        assert_eq!(stream.next().text, "a");
        assert_eq!(stream.next().kind, TokenKind::Whitespace);
        assert_eq!(stream.next().text, "b");
        stream.reset(mark);
        assert_eq!(stream.next().text, "a");
        assert_eq!(stream.next().kind, TokenKind::Whitespace);
        assert_eq!(stream.next().text, "b");
    }

    #[test]
    fn nested_marks_rewind_independently() {
        let mut stream = TokenStream::new("a b c d");
        let outer = stream.mark();
        stream.next(); // a
        let inner = stream.mark();
        stream.next(); // whitespace
        stream.next(); // b
        stream.reset(inner);
        assert_eq!(stream.next().kind, TokenKind::Whitespace);
        stream.reset(outer);
        assert_eq!(stream.next().text, "a");
    }

    #[test]
    fn location_reports_next_token_start() {
        let mut stream = TokenStream::new("int x");
        assert_eq!(stream.location().column, 1);
        stream.next();
        stream.next();
        assert_eq!(stream.location().column, 5);
    }

    #[test]
    #[should_panic(expected = "stale or foreign mark")]
    fn resetting_a_released_mark_panics() {
        let mut stream = TokenStream::new("a b");
        let mark = stream.mark();
        stream.release(mark);
        stream.reset(mark);
    }
}
