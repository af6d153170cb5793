//! Unicode-escape-transparent character reading.
//!
//! Java source may spell any character as a `\uXXXX` escape. The reader
//! resolves those before the lexer ever sees them, so the rest of the
//! pipeline deals in logical characters only.

/// A recoverable lexing problem. The lexer never aborts on these; they
/// accumulate and are handed back alongside the token stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("malformed unicode escape `{text}` at {line}:{column}")]
    MalformedEscape {
        /// The offending source text, `\u` plus whatever followed it.
        text: String,
        line: u32,
        column: u32,
    },
}

/// A logical character, flagged when it came from a `\uXXXX` escape
/// (six source characters rather than one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decoded {
    pub ch: char,
    pub escaped: bool,
}

/// Decodes `\uXXXX` escapes out of a raw character stream.
///
/// The reader owns a monotonically advancing byte cursor into the
/// source text; [`EscapedReader::offset`] exposes it so lexing can be
/// suspended and resumed at an exact raw position.
pub(crate) struct EscapedReader<'a> {
    text: &'a str,
    offset: usize,
    errors: Vec<LexError>,
}

impl<'a> EscapedReader<'a> {
    pub(crate) fn new(text: &'a str, offset: usize) -> Self {
        debug_assert!(text.is_char_boundary(offset.min(text.len())));
        Self {
            text,
            offset: offset.min(text.len()),
            errors: Vec::new(),
        }
    }

    /// Raw byte offset of the next unread character.
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Read the next logical character, decoding a `\uXXXX` escape if
    /// one starts at the cursor. `line`/`column` are only used to
    /// position malformed-escape errors.
    pub(crate) fn next(&mut self, line: u32, column: u32) -> Option<Decoded> {
        let rest = &self.text[self.offset..];
        let mut chars = rest.chars();
        let ch = chars.next()?;

        if ch == '\\' && rest[1..].starts_with('u') {
            if let Some(decoded) = decode_escape(&rest[2..]) {
                self.offset += 6;
                return Some(Decoded {
                    ch: decoded,
                    escaped: true,
                });
            }
            // Malformed: report it, emit the raw backslash, and keep
            // going so the rest of the buffer still lexes.
            let bad_len = rest[2..]
                .chars()
                .take(4)
                .take_while(|c| c.is_ascii_hexdigit())
                .count();
            self.errors.push(LexError::MalformedEscape {
                text: rest[..2 + bad_len].to_string(),
                line,
                column,
            });
            self.offset += 1;
            return Some(Decoded {
                ch: '\\',
                escaped: false,
            });
        }

        self.offset += ch.len_utf8();
        Some(Decoded { ch, escaped: false })
    }
}

/// Decode exactly four hex digits into a character. Surrogate code
/// units have no `char` representation and count as malformed.
fn decode_escape(hex: &str) -> Option<char> {
    let digits = hex.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    char::from_u32(value)
}
