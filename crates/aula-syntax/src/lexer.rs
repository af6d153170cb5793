//! Pull-model Java lexer.
//!
//! One token per [`Lexer::next_token`] call; the whole token list is
//! never materialized up front, so a host editor can lex only as far as
//! it needs. All cross-call state lives in an explicit [`LexerState`]
//! value, which can be captured and later fed to [`Lexer::resume`] to
//! restart lexing mid-buffer.
//!
//! The lexer fails soft: content problems (malformed escapes,
//! unrecognized operator runs) surface as [`LexError`]s and
//! [`TokenKind::Invalid`] tokens, never as aborted lexing. Code being
//! typed is almost always momentarily invalid.

use aula_core::SourceLocation;
use smol_str::SmolStr;

use crate::reader::{Decoded, EscapedReader, LexError};
use crate::token::{Token, TokenKind};

/// Named compatibility switches for column-arithmetic behaviors carried
/// over from the legacy lexer this one replaces. Both default to the
/// corrected behavior; flip them only to reproduce legacy positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// Advance the column by 1 for a decoded `\uXXXX` escape instead of
    /// by its raw source width of 6.
    pub single_column_unicode_escapes: bool,
    /// Swallow the single space that terminates a token instead of
    /// emitting it inside a [`TokenKind::Whitespace`] token. The
    /// terminating space never widens the token's reported end column
    /// in either mode; with this set, round-tripping token texts drops
    /// those spaces. Runs of more than one space still produce
    /// whitespace tokens.
    pub fold_trailing_space: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// Columns per tab stop.
    pub tab_size: u32,
    pub quirks: Quirks,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            tab_size: 8,
            quirks: Quirks::default(),
        }
    }
}

/// A decoded look-ahead character the lexer has read but not consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    pub ch: char,
    pub escaped: bool,
}

/// The complete cross-call state of a [`Lexer`].
///
/// `tab`/`newline` are the deferred position adjustments set when a
/// token classifies as one of the two-character escape forms `\t`/`\n`;
/// they apply to position bookkeeping at the end of the token that set
/// them (and, after a [`Lexer::resume`], to the first token lexed).
/// Capture this between `next_token` calls, not mid-call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerState {
    /// Raw byte offset of the next unread source character.
    pub offset: usize,
    pub line: u32,
    pub column: u32,
    pub pending: Option<Pending>,
    pub tab: bool,
    pub newline: bool,
}

impl LexerState {
    pub fn initial() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
            pending: None,
            tab: false,
            newline: false,
        }
    }
}

impl Default for LexerState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Character class used by the completion tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharCategory {
    Letter,
    Digit,
    Other,
}

pub(crate) fn categorize(c: char) -> CharCategory {
    if c.is_ascii_digit() {
        CharCategory::Digit
    } else if unicode_ident::is_xid_start(c) {
        CharCategory::Letter
    } else {
        CharCategory::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    Complete,
}

/// Symbols that always stand alone; the scanner never glues a following
/// character run onto them.
fn is_standalone(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | '(' | ')')
}

fn is_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c')
}

/// Decide whether the token accumulated so far completes before `next`.
///
/// A change of character category usually ends a token, but not always:
/// `an_identifier99` crosses Letter/Other/Digit boundaries and stays one
/// token, while `1+value` splits at every boundary. This is the full
/// tie-break table, checked in priority order.
pub(crate) fn completion(
    prev_category: CharCategory,
    prev: char,
    next_category: CharCategory,
    next: char,
    inside_comment: bool,
) -> Step {
    use CharCategory::{Digit, Letter, Other};

    // An open comment consumes everything until its terminator.
    if inside_comment {
        return Step::Continue;
    }
    // `_` joins identifiers without being its own character class.
    if prev_category == Letter && next == '_' {
        return Step::Continue;
    }
    if next_category == Letter && prev == '_' {
        return Step::Continue;
    }
    // Identifiers may contain trailing digits: `x99`.
    if prev_category == Letter && next_category == Digit {
        return Step::Continue;
    }
    // Multi-digit literals.
    if prev_category == Digit && next_category == Digit {
        return Step::Continue;
    }
    // Numeric literal suffixes.
    if prev_category == Digit && matches!(next, 'f' | 'd' | 'l' | 'F' | 'D' | 'L') {
        return Step::Continue;
    }
    // Decimal literals, on either side of the dot.
    if prev_category == Digit && next == '.' {
        return Step::Continue;
    }
    if prev == '.' && next_category == Digit {
        return Step::Continue;
    }
    // Quotes adjacent to letters stay glued to their literal text.
    if prev == '"' && next_category == Letter {
        return Step::Continue;
    }
    if next == '"' && prev_category == Letter {
        return Step::Continue;
    }
    if prev == '\'' && next_category == Letter {
        return Step::Continue;
    }
    if next == '\'' && prev_category == Letter {
        return Step::Continue;
    }
    if prev_category != next_category || (next_category == Other && is_standalone(next)) {
        return Step::Complete;
    }
    Step::Continue
}

/// Tracks comment-openness of the text accumulated for one token, with
/// substring semantics: a block comment is open once the text contains
/// `/*` with no `*/` anywhere, a line comment once it contains `//`
/// with no newline yet. (`/*/` therefore counts as closed.)
#[derive(Debug, Default)]
struct CommentTracker {
    prev: Option<char>,
    block_opened: bool,
    block_closed: bool,
    line_opened: bool,
    line_broken: bool,
}

impl CommentTracker {
    fn push(&mut self, c: char) {
        if let Some(prev) = self.prev {
            if prev == '/' && c == '/' {
                self.line_opened = true;
            }
            if prev == '/' && c == '*' {
                self.block_opened = true;
            }
            if prev == '*' && c == '/' {
                self.block_closed = true;
            }
        }
        if c == '\n' {
            self.line_broken = true;
        }
        self.prev = Some(c);
    }

    fn inside_comment(&self) -> bool {
        (self.block_opened && !self.block_closed) || (self.line_opened && !self.line_broken)
    }
}

/// Deferred position adjustments requested by token classification.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Deferred {
    pub newline: bool,
    pub tab: bool,
}

/// Determine the concrete kind of an accumulated token text.
///
/// Word buffers go through the keyword table; digit-leading buffers are
/// classified by trailing suffix; operator buffers are matched by
/// length and leading character against the fixed operator grammar,
/// with unrecognized runs classified [`TokenKind::Invalid`].
pub(crate) fn classify(text: &str) -> (TokenKind, Deferred) {
    let mut deferred = Deferred::default();
    let Some(first) = text.chars().next() else {
        return (TokenKind::Invalid, deferred);
    };

    if categorize(first) == CharCategory::Letter {
        let kind = TokenKind::from_keyword(text).unwrap_or(TokenKind::Identifier);
        return (kind, deferred);
    }
    if first.is_ascii_digit() {
        return (number_kind(text), deferred);
    }

    let kind = match first {
        '"' => TokenKind::StringLiteral,
        '\'' => TokenKind::CharLiteral,
        '\\' => match text {
            // Two-character escape forms carry a deferred position fix.
            "\\n" => {
                deferred.newline = true;
                TokenKind::CharLiteral
            }
            "\\t" => {
                deferred.tab = true;
                TokenKind::CharLiteral
            }
            _ => TokenKind::Invalid,
        },

        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        ';' => TokenKind::Semicolon,
        ',' => TokenKind::Comma,
        '@' => TokenKind::At,
        '?' => TokenKind::Question,
        '~' => TokenKind::Tilde,

        ':' => match text {
            ":" => TokenKind::Colon,
            "::" => TokenKind::DoubleColon,
            _ => TokenKind::Invalid,
        },
        '.' => match text {
            "." => TokenKind::Dot,
            "..." => TokenKind::Ellipsis,
            // `.5f`-style leading-dot decimals.
            _ => number_kind(text),
        },

        '^' => by_second(text, TokenKind::Caret, &[('=', TokenKind::CaretEq)]),
        '&' => by_second(
            text,
            TokenKind::Amp,
            &[('=', TokenKind::AmpEq), ('&', TokenKind::AmpAmp)],
        ),
        '|' => by_second(
            text,
            TokenKind::Pipe,
            &[('=', TokenKind::PipeEq), ('|', TokenKind::PipePipe)],
        ),
        '+' => by_second(
            text,
            TokenKind::Plus,
            &[('=', TokenKind::PlusEq), ('+', TokenKind::PlusPlus)],
        ),
        '-' => by_second(
            text,
            TokenKind::Minus,
            &[
                ('=', TokenKind::MinusEq),
                ('-', TokenKind::MinusMinus),
                ('>', TokenKind::Arrow),
            ],
        ),
        '=' => by_second(text, TokenKind::Eq, &[('=', TokenKind::EqEq)]),
        '!' => by_second(text, TokenKind::Bang, &[('=', TokenKind::BangEq)]),
        '%' => by_second(text, TokenKind::Percent, &[('=', TokenKind::PercentEq)]),
        // A stray `*/` keeps its comment classification so editors color
        // the dangling close like the comment it escaped from.
        '*' => by_second(
            text,
            TokenKind::Star,
            &[('=', TokenKind::StarEq), ('/', TokenKind::BlockComment)],
        ),
        '/' => by_second(
            text,
            TokenKind::Slash,
            &[
                ('/', TokenKind::LineComment),
                ('*', TokenKind::BlockComment),
                ('=', TokenKind::SlashEq),
            ],
        ),

        '<' => match text {
            "<" => TokenKind::Less,
            "<=" => TokenKind::LessEq,
            "<<" => TokenKind::LeftShift,
            "<<=" => TokenKind::LeftShiftEq,
            _ => TokenKind::Invalid,
        },
        '>' => match text {
            ">" => TokenKind::Greater,
            ">=" => TokenKind::GreaterEq,
            ">>" => TokenKind::RightShift,
            ">>=" => TokenKind::RightShiftEq,
            ">>>" => TokenKind::UnsignedRightShift,
            ">>>=" => TokenKind::UnsignedRightShiftEq,
            _ => TokenKind::Invalid,
        },

        _ => TokenKind::Invalid,
    };
    (kind, deferred)
}

/// Family dispatch on the second character; single-character buffers get
/// `single`. Characters past the second do not change the family.
fn by_second(text: &str, single: TokenKind, table: &[(char, TokenKind)]) -> TokenKind {
    let mut chars = text.chars();
    chars.next();
    match chars.next() {
        None => single,
        Some(second) => table
            .iter()
            .find(|(c, _)| *c == second)
            .map(|(_, kind)| *kind)
            .unwrap_or(TokenKind::Invalid),
    }
}

fn number_kind(text: &str) -> TokenKind {
    match text.chars().last() {
        Some('f' | 'F') => TokenKind::FloatLiteral,
        Some('l' | 'L') => TokenKind::LongLiteral,
        Some('d' | 'D') => TokenKind::DoubleLiteral,
        _ if text.contains('.') => TokenKind::DoubleLiteral,
        _ => TokenKind::IntLiteral,
    }
}

pub struct Lexer<'a> {
    reader: EscapedReader<'a>,
    config: LexerConfig,
    line: u32,
    column: u32,
    pending: Option<Pending>,
    tab: bool,
    newline: bool,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_config(text, LexerConfig::default())
    }

    pub fn with_config(text: &'a str, config: LexerConfig) -> Self {
        Self::resume(text, LexerState::initial(), config)
    }

    /// Restart lexing of `text` from a previously captured state.
    pub fn resume(text: &'a str, state: LexerState, config: LexerConfig) -> Self {
        Self {
            reader: EscapedReader::new(text, state.offset),
            config,
            line: state.line,
            column: state.column,
            pending: state.pending,
            tab: state.tab,
            newline: state.newline,
            done: false,
        }
    }

    /// Snapshot of the cross-call state, valid between `next_token`
    /// calls.
    pub fn state(&self) -> LexerState {
        LexerState {
            offset: self.reader.offset(),
            line: self.line,
            column: self.column,
            pending: self.pending,
            tab: self.tab,
            newline: self.newline,
        }
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Drain the recoverable errors accumulated so far.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        self.reader.take_errors()
    }

    /// Produce the next token. At end of input this returns (and keeps
    /// returning) a zero-width [`TokenKind::Eof`] token whose text is
    /// the literal marker `"EOF"`.
    pub fn next_token(&mut self) -> Token {
        let first = match self.pending.take() {
            Some(pending) => Decoded {
                ch: pending.ch,
                escaped: pending.escaped,
            },
            None => match self.read() {
                Some(decoded) => decoded,
                None => return self.eof_token(),
            },
        };

        if is_whitespace_char(first.ch) {
            return self.whitespace_token(first);
        }

        let start = SourceLocation::new(self.line, self.column);
        let mut text = String::new();
        let mut tracker = CommentTracker::default();
        let mut folded_space = false;
        let mut cur = first;

        loop {
            let prev_category = categorize(cur.ch);
            let prev_char = cur.ch;
            text.push(cur.ch);
            tracker.push(cur.ch);
            self.advance(cur);

            let Some(next) = self.read() else {
                break;
            };

            if is_whitespace_char(next.ch) && !tracker.inside_comment() {
                if self.config.quirks.fold_trailing_space && next.ch == ' ' {
                    // Legacy behavior: the terminating space is swallowed
                    // and excluded from the reported end column.
                    self.column += 1;
                    folded_space = true;
                } else {
                    self.pending = Some(Pending {
                        ch: next.ch,
                        escaped: next.escaped,
                    });
                }
                break;
            }

            match completion(
                prev_category,
                prev_char,
                categorize(next.ch),
                next.ch,
                tracker.inside_comment(),
            ) {
                Step::Complete => {
                    self.pending = Some(Pending {
                        ch: next.ch,
                        escaped: next.escaped,
                    });
                    break;
                }
                Step::Continue => cur = next,
            }
        }

        let (kind, deferred) = classify(&text);
        if deferred.newline {
            self.newline = true;
        }
        if deferred.tab {
            self.tab = true;
        }
        self.apply_deferred();

        let mut end = SourceLocation::new(self.line, self.column);
        if folded_space {
            end.column -= 1;
        }
        Token {
            kind,
            text: SmolStr::from(text),
            start,
            end,
        }
    }

    fn whitespace_token(&mut self, first: Decoded) -> Token {
        let start = SourceLocation::new(self.line, self.column);
        let mut text = String::new();
        let mut cur = first;
        loop {
            text.push(cur.ch);
            self.advance(cur);
            match self.read() {
                Some(next) if is_whitespace_char(next.ch) => cur = next,
                Some(next) => {
                    self.pending = Some(Pending {
                        ch: next.ch,
                        escaped: next.escaped,
                    });
                    break;
                }
                None => break,
            }
        }
        self.apply_deferred();
        Token {
            kind: TokenKind::Whitespace,
            text: SmolStr::from(text),
            start,
            end: SourceLocation::new(self.line, self.column),
        }
    }

    fn eof_token(&mut self) -> Token {
        let at = SourceLocation::new(self.line, self.column);
        Token {
            kind: TokenKind::Eof,
            text: SmolStr::new_inline("EOF"),
            start: at,
            end: at,
        }
    }

    fn read(&mut self) -> Option<Decoded> {
        self.reader.next(self.line, self.column)
    }

    /// Position bookkeeping for one consumed character. Escapes advance
    /// by their raw width and never act as line terminators, keeping
    /// columns aligned with the raw source line.
    fn advance(&mut self, decoded: Decoded) {
        if decoded.escaped {
            self.column += if self.config.quirks.single_column_unicode_escapes {
                1
            } else {
                6
            };
        } else if decoded.ch == '\t' {
            self.column += self.config.tab_size;
        } else if decoded.ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Apply and clear the deferred `tab`/`newline` adjustments.
    fn apply_deferred(&mut self) {
        if self.tab {
            self.column = self.column - 1 + self.config.tab_size;
            self.tab = false;
        }
        if self.newline {
            self.line += 1;
            self.newline = false;
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(token)
    }
}

/// Lex `text` to completion. The final element is the `Eof` token.
pub fn lex(text: &str) -> Vec<Token> {
    Lexer::new(text).collect()
}

pub fn lex_with_config(text: &str, config: LexerConfig) -> Vec<Token> {
    Lexer::with_config(text, config).collect()
}

/// Lex `text` to completion, also returning the recoverable errors.
pub fn lex_with_errors(text: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::new(text);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    let errors = lexer.take_errors();
    (tokens, errors)
}
