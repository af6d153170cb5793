//! Java lexing and structural parsing primitives for live,
//! syntax-aware editing.
//!
//! This crate provides three complementary entry points:
//! - [`lex`] / [`Lexer`]: a pull-model tokenizer with exact 1-based
//!   source positions, transparent `\uXXXX` decoding, and soft failure
//!   on the invalid code an editor sees mid-keystroke.
//! - [`TokenStream`]: look-ahead and `mark`/`reset` backtracking over
//!   the lexer, for recursive structural parsing.
//! - [`parse_structure`]: brace-depth recognition of class, method and
//!   field spans — enough structure for folding, navigation, and error
//!   annotation without a full Java grammar.
//!
//! [`UnitTestAnalysis`] layers the scaffolding queries used for
//! unit-test classes on top of the structural parse.

mod lexer;
mod reader;
mod stream;
mod structure;
mod token;

pub use lexer::{
    lex, lex_with_config, lex_with_errors, Lexer, LexerConfig, LexerState, Pending, Quirks,
};
pub use reader::LexError;
pub use stream::{Mark, TokenStream};
pub use structure::{parse_structure, StructuralKind, StructuralNode};
pub use token::{Token, TokenKind};
pub use unit_test::UnitTestAnalysis;
