use aula_core::{SourceLocation, SourceSpan};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use smol_str::SmolStr;

/// Lexical token kind.
///
/// This enum is intentionally closed: every character of a Java source
/// buffer lands in a token of exactly one of these kinds (whitespace and
/// comments included), which is what keeps editor column math exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize_repr, Deserialize_repr,
)]
#[repr(u16)]
pub enum TokenKind {
    // --- Trivia ---
    Whitespace,
    LineComment,
    BlockComment,

    // --- Identifiers & literals ---
    Identifier,
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,

    // --- Keywords (reserved) ---
    AbstractKw,
    AssertKw,
    BooleanKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DefaultKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    ExtendsKw,
    FinalKw,
    FinallyKw,
    FloatKw,
    ForKw,
    GotoKw,
    IfKw,
    ImplementsKw,
    ImportKw,
    InstanceofKw,
    IntKw,
    InterfaceKw,
    LongKw,
    NativeKw,
    NewKw,
    PackageKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReturnKw,
    ShortKw,
    StaticKw,
    StrictfpKw,
    SuperKw,
    SwitchKw,
    SynchronizedKw,
    ThisKw,
    ThrowKw,
    ThrowsKw,
    TransientKw,
    TryKw,
    VoidKw,
    VolatileKw,
    WhileKw,

    // Literal keywords.
    TrueKw,
    FalseKw,
    NullKw,

    // --- Separators ---
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    DoubleColon,
    Arrow,
    Question,
    Colon,

    // --- Operators ---
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Tilde,
    Bang,

    Eq,
    EqEq,
    BangEq,

    Less,
    LessEq,
    Greater,
    GreaterEq,

    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,

    PlusPlus,
    MinusMinus,

    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    LeftShift,
    RightShift,
    UnsignedRightShift,
    LeftShiftEq,
    RightShiftEq,
    UnsignedRightShiftEq,

    // --- Special ---
    Invalid,
    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Reserved words, including `const`/`goto` and the literal keywords
    /// `true`/`false`/`null`.
    pub fn is_keyword(self) -> bool {
        let raw = self as u16;
        raw >= TokenKind::AbstractKw as u16 && raw <= TokenKind::NullKw as u16
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::LongLiteral
                | TokenKind::FloatLiteral
                | TokenKind::DoubleLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
        )
    }

    /// Keywords that open a type declaration.
    pub fn is_type_declarator(self) -> bool {
        matches!(
            self,
            TokenKind::ClassKw | TokenKind::InterfaceKw | TokenKind::EnumKw
        )
    }

    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "abstract" => TokenKind::AbstractKw,
            "assert" => TokenKind::AssertKw,
            "boolean" => TokenKind::BooleanKw,
            "break" => TokenKind::BreakKw,
            "byte" => TokenKind::ByteKw,
            "case" => TokenKind::CaseKw,
            "catch" => TokenKind::CatchKw,
            "char" => TokenKind::CharKw,
            "class" => TokenKind::ClassKw,
            "const" => TokenKind::ConstKw,
            "continue" => TokenKind::ContinueKw,
            "default" => TokenKind::DefaultKw,
            "do" => TokenKind::DoKw,
            "double" => TokenKind::DoubleKw,
            "else" => TokenKind::ElseKw,
            "enum" => TokenKind::EnumKw,
            "extends" => TokenKind::ExtendsKw,
            "final" => TokenKind::FinalKw,
            "finally" => TokenKind::FinallyKw,
            "float" => TokenKind::FloatKw,
            "for" => TokenKind::ForKw,
            "goto" => TokenKind::GotoKw,
            "if" => TokenKind::IfKw,
            "implements" => TokenKind::ImplementsKw,
            "import" => TokenKind::ImportKw,
            "instanceof" => TokenKind::InstanceofKw,
            "int" => TokenKind::IntKw,
            "interface" => TokenKind::InterfaceKw,
            "long" => TokenKind::LongKw,
            "native" => TokenKind::NativeKw,
            "new" => TokenKind::NewKw,
            "package" => TokenKind::PackageKw,
            "private" => TokenKind::PrivateKw,
            "protected" => TokenKind::ProtectedKw,
            "public" => TokenKind::PublicKw,
            "return" => TokenKind::ReturnKw,
            "short" => TokenKind::ShortKw,
            "static" => TokenKind::StaticKw,
            "strictfp" => TokenKind::StrictfpKw,
            "super" => TokenKind::SuperKw,
            "switch" => TokenKind::SwitchKw,
            "synchronized" => TokenKind::SynchronizedKw,
            "this" => TokenKind::ThisKw,
            "throw" => TokenKind::ThrowKw,
            "throws" => TokenKind::ThrowsKw,
            "transient" => TokenKind::TransientKw,
            "try" => TokenKind::TryKw,
            "void" => TokenKind::VoidKw,
            "volatile" => TokenKind::VolatileKw,
            "while" => TokenKind::WhileKw,

            "true" => TokenKind::TrueKw,
            "false" => TokenKind::FalseKw,
            "null" => TokenKind::NullKw,

            _ => return None,
        })
    }
}

/// A lexical token with its text and 1-based source positions.
///
/// `end` points one column past the last character, so for adjacent
/// tokens `prev.end == next.start`. Tokens are immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl Token {
    pub fn span(&self) -> SourceSpan {
        SourceSpan::new(self.start, self.end)
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}
