//! Coarse structural parsing: class/interface/enum bodies, method and
//! constructor bodies, and field declarations, recognized by brace-depth
//! tracking over the token stream.
//!
//! This is deliberately not a grammar. It exists to give an editor
//! stable spans for folding, navigation, and annotation placement, and
//! it must produce a usable tree for code that is mid-edit. It never
//! fails: unclosed constructs are padded with a synthetic close at end
//! of input.

use aula_core::{SourceLocation, SourceSpan};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::stream::TokenStream;
use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralKind {
    CompilationUnit,
    Class,
    Interface,
    Enum,
    Method,
    Field,
}

/// A node in the structural span tree.
///
/// Rebuilt wholesale on every parse; spans nest strictly (a method span
/// inside its class span) and siblings appear in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralNode {
    pub kind: StructuralKind,
    /// Declared name; `None` for the compilation unit and for
    /// constructs whose name could not be recovered.
    pub name: Option<SmolStr>,
    pub span: SourceSpan,
    /// The `{`..`}` of the body, both braces included (exclusive end).
    /// Present for type bodies and method bodies; a synthesized close
    /// makes the span end at end of input.
    pub body_span: Option<SourceSpan>,
    /// Declared parameter count, methods only.
    pub arity: Option<u32>,
    pub children: Vec<StructuralNode>,
}

impl StructuralNode {
    pub fn methods(&self) -> impl Iterator<Item = &StructuralNode> {
        self.children
            .iter()
            .filter(|child| child.kind == StructuralKind::Method)
    }

    pub fn fields(&self) -> impl Iterator<Item = &StructuralNode> {
        self.children
            .iter()
            .filter(|child| child.kind == StructuralKind::Field)
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = &StructuralNode> {
        self.children.iter().filter(|child| {
            matches!(
                child.kind,
                StructuralKind::Class | StructuralKind::Interface | StructuralKind::Enum
            )
        })
    }
}

/// Parse one compilation unit into its structural span tree.
///
/// Never fails; malformed input yields the best partial tree with every
/// opened span closed (synthetically at end of input if need be).
pub fn parse_structure(text: &str) -> StructuralNode {
    Parser {
        stream: TokenStream::new(text),
    }
    .parse_unit()
}

struct Parser<'a> {
    stream: TokenStream<'a>,
}

/// Outcome of scanning one class-body member.
enum MemberScan {
    /// The run turned out to be a nested type declaration; rewind and
    /// reparse it as one. Carries the declaring keyword.
    Type(TokenKind),
    Node(StructuralNode),
    /// Initializer block or stray tokens that produce no node.
    Skip,
}

/// How a balanced-brace skip ended.
struct BalancedClose {
    end: SourceLocation,
    /// No closing brace existed; the close is the end of input.
    synthesized: bool,
    /// The closing token had a `;` glued onto it (`};`), which also
    /// terminates the surrounding declaration.
    trailing_semi: bool,
}

impl Parser<'_> {
    fn next_significant(&mut self) -> crate::Token {
        loop {
            let token = self.stream.next();
            if !token.kind.is_trivia() {
                return token;
            }
        }
    }

    /// Peek the next non-trivia token, consuming any trivia in the way.
    fn peek_significant(&mut self) -> &crate::Token {
        while self.stream.peek().kind.is_trivia() {
            self.stream.next();
        }
        self.stream.peek()
    }

    fn parse_unit(mut self) -> StructuralNode {
        let start = SourceLocation::start_of_document();
        let mut children = Vec::new();
        let mut run_start: Option<SourceLocation> = None;
        let end;
        loop {
            let token = self.next_significant();
            match token.kind {
                TokenKind::Eof => {
                    end = token.start;
                    break;
                }
                // `package`/`import` statements and stray closers end any
                // pending declaration run.
                TokenKind::Semicolon | TokenKind::RBrace => run_start = None,
                TokenKind::LBrace => {
                    self.skip_balanced();
                    run_start = None;
                }
                kind if kind.is_type_declarator() => {
                    let decl_start = run_start.take().unwrap_or(token.start);
                    children.push(self.parse_type_decl(decl_start, kind));
                }
                _ => {
                    run_start.get_or_insert(token.start);
                }
            }
        }
        StructuralNode {
            kind: StructuralKind::CompilationUnit,
            name: None,
            span: SourceSpan::new(start, end.max(start)),
            body_span: None,
            arity: None,
            children,
        }
    }

    /// Parse a type declaration whose declaring keyword was just
    /// consumed. `start` is the location of the declaration's first
    /// token (modifiers and annotations included).
    fn parse_type_decl(&mut self, start: SourceLocation, declarator: TokenKind) -> StructuralNode {
        let kind = match declarator {
            TokenKind::ClassKw => StructuralKind::Class,
            TokenKind::InterfaceKw => StructuralKind::Interface,
            TokenKind::EnumKw => StructuralKind::Enum,
            _ => unreachable!("not a type declarator: {declarator:?}"),
        };
        let mut name: Option<SmolStr> = None;
        loop {
            let token = self.next_significant();
            match token.kind {
                TokenKind::Identifier if name.is_none() => name = Some(token.text.clone()),
                TokenKind::LBrace => {
                    return self.parse_type_body(start, kind, name, token.start)
                }
                TokenKind::Semicolon | TokenKind::Eof => {
                    // Header with no body; close the node where it stops.
                    return StructuralNode {
                        kind,
                        name,
                        span: SourceSpan::new(start, token.end),
                        body_span: None,
                        arity: None,
                        children: Vec::new(),
                    };
                }
                _ => {}
            }
        }
    }

    fn parse_type_body(
        &mut self,
        start: SourceLocation,
        kind: StructuralKind,
        name: Option<SmolStr>,
        body_start: SourceLocation,
    ) -> StructuralNode {
        let mut children = Vec::new();
        loop {
            let peeked = self.peek_significant();
            match peeked.kind {
                TokenKind::Eof => {
                    let end = peeked.start;
                    tracing::debug!(
                        line = end.line,
                        "unbalanced type body, synthesizing close at end of input"
                    );
                    return StructuralNode {
                        kind,
                        name,
                        span: SourceSpan::new(start, end),
                        body_span: Some(SourceSpan::new(body_start, end)),
                        arity: None,
                        children,
                    };
                }
                TokenKind::RBrace => {
                    let rbrace = self.next_significant();
                    return StructuralNode {
                        kind,
                        name,
                        span: SourceSpan::new(start, rbrace.end),
                        body_span: Some(SourceSpan::new(body_start, rbrace.end)),
                        arity: None,
                        children,
                    };
                }
                TokenKind::Semicolon => {
                    self.next_significant();
                }
                TokenKind::LBrace => {
                    // Instance initializer with no leading modifiers.
                    self.next_significant();
                    self.skip_balanced();
                }
                declarator if declarator.is_type_declarator() => {
                    let token = self.next_significant();
                    let declarator = token.kind;
                    children.push(self.parse_type_decl(token.start, declarator));
                }
                _ => {
                    if let Some(node) = self.parse_member() {
                        children.push(node);
                    }
                }
            }
        }
    }

    /// Parse one class-body member (method, constructor, field, nested
    /// type, or initializer block).
    ///
    /// The member's shape is only known once its header has been
    /// scanned, so this marks the stream, scans ahead, and rewinds when
    /// the run turns out to be a nested type declaration that must be
    /// reparsed from its first modifier.
    fn parse_member(&mut self) -> Option<StructuralNode> {
        let start = self.peek_significant().start;
        let mark = self.stream.mark();
        match self.scan_member(start) {
            MemberScan::Type(declarator) => {
                self.stream.reset(mark);
                loop {
                    let token = self.next_significant();
                    if token.kind == declarator {
                        break;
                    }
                }
                Some(self.parse_type_decl(start, declarator))
            }
            MemberScan::Node(node) => {
                self.stream.release(mark);
                Some(node)
            }
            MemberScan::Skip => {
                self.stream.release(mark);
                None
            }
        }
    }

    /// Walk one member's tokens and build its node.
    ///
    /// A member is a method when a matched `(`..`)` pair shows up in its
    /// header before the terminating `{`, `;`, or `=`; the `=` cut keeps
    /// initializer calls (`int x = f();`) classified as fields. The
    /// enclosing body's `}` (and EOF) are never consumed.
    ///
    /// The lexer glues same-category punctuation runs into one token
    /// (`);` is a single token of kind `RParen`), so the terminating
    /// semicolon is recognized by trailing token text, not by kind.
    fn scan_member(&mut self, start: SourceLocation) -> MemberScan {
        let mut paren_depth = 0u32;
        let mut seen_eq = false;
        let mut matched_parens = false;
        let mut in_signature_group = false;
        let mut params_empty = true;
        let mut commas = 0u32;
        let mut comma_cut = false;
        let mut last_ident: Option<SmolStr> = None;
        let mut name: Option<SmolStr> = None;
        let mut end = start;

        loop {
            if matches!(
                self.peek_significant().kind,
                TokenKind::RBrace | TokenKind::Eof
            ) {
                // Unterminated member; emit what we have.
                break;
            }
            let token = self.next_significant();
            end = token.end;
            match token.kind {
                kind if kind.is_type_declarator() && paren_depth == 0 && !seen_eq => {
                    return MemberScan::Type(kind);
                }
                TokenKind::Eq if paren_depth == 0 => seen_eq = true,
                TokenKind::LParen => {
                    if paren_depth == 0 && !seen_eq {
                        // A new candidate signature group; the identifier
                        // just before it names the method.
                        name = last_ident.clone();
                        in_signature_group = true;
                        params_empty = true;
                        commas = 0;
                    } else if in_signature_group {
                        params_empty = false;
                    }
                    paren_depth += 1;
                }
                TokenKind::RParen => {
                    if paren_depth > 0 {
                        paren_depth -= 1;
                        if paren_depth == 0 && in_signature_group {
                            matched_parens = true;
                            in_signature_group = false;
                        }
                    }
                }
                TokenKind::LBrace if paren_depth == 0 => {
                    if seen_eq {
                        // Array initializer; balanced-skip and keep going
                        // to the terminating `;`.
                        let close = self.skip_balanced();
                        end = close.end;
                        if close.trailing_semi {
                            return MemberScan::Node(self.member_node(
                                start,
                                close.end,
                                matched_parens,
                                name.or(last_ident),
                                params_empty,
                                commas,
                                None,
                            ));
                        }
                    } else if matched_parens {
                        let close = self.skip_balanced();
                        if close.synthesized {
                            tracing::debug!(
                                line = close.end.line,
                                "unbalanced method body, synthesizing close at end of input"
                            );
                        }
                        return MemberScan::Node(self.member_node(
                            start,
                            close.end,
                            true,
                            name,
                            params_empty,
                            commas,
                            Some(SourceSpan::new(token.start, close.end)),
                        ));
                    } else {
                        // `static { .. }` / instance initializer.
                        self.skip_balanced();
                        return MemberScan::Skip;
                    }
                }
                TokenKind::LBrace => {
                    // Brace inside parentheses (lambda argument); it is
                    // balanced, so skip it wholesale.
                    self.skip_balanced();
                }
                TokenKind::Identifier => {
                    if paren_depth == 0 && !seen_eq && !comma_cut {
                        last_ident = Some(token.text.clone());
                    } else if in_signature_group {
                        params_empty = false;
                    }
                }
                TokenKind::Comma if paren_depth == 0 => {
                    // Multi-declarator field: the name is the first
                    // declarator's, so stop tracking identifiers.
                    comma_cut = true;
                }
                _ => {
                    if in_signature_group && paren_depth >= 1 {
                        params_empty = false;
                        if token.kind == TokenKind::Comma && paren_depth == 1 {
                            commas += 1;
                        }
                    }
                }
            }

            if paren_depth == 0 && token.text.ends_with(';') {
                return MemberScan::Node(self.member_node(
                    start,
                    token.end,
                    matched_parens,
                    name.or(last_ident),
                    params_empty,
                    commas,
                    None,
                ));
            }
        }

        MemberScan::Node(self.member_node(
            start,
            end,
            matched_parens,
            name.or(last_ident),
            params_empty,
            commas,
            None,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn member_node(
        &self,
        start: SourceLocation,
        end: SourceLocation,
        is_method: bool,
        name: Option<SmolStr>,
        params_empty: bool,
        commas: u32,
        body_span: Option<SourceSpan>,
    ) -> StructuralNode {
        if is_method {
            StructuralNode {
                kind: StructuralKind::Method,
                name,
                span: SourceSpan::new(start, end),
                body_span,
                arity: Some(if params_empty { 0 } else { commas + 1 }),
                children: Vec::new(),
            }
        } else {
            StructuralNode {
                kind: StructuralKind::Field,
                name,
                span: SourceSpan::new(start, end),
                body_span: None,
                arity: None,
                children: Vec::new(),
            }
        }
    }

    /// Consume tokens until the brace opened just before this call is
    /// closed (or end of input forces a synthesized close).
    fn skip_balanced(&mut self) -> BalancedClose {
        let mut depth = 1u32;
        loop {
            let token = self.next_significant();
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return BalancedClose {
                            end: token.end,
                            synthesized: false,
                            trailing_semi: token.text.ends_with(';'),
                        };
                    }
                }
                TokenKind::Eof => {
                    return BalancedClose {
                        end: token.start,
                        synthesized: true,
                        trailing_semi: false,
                    }
                }
                _ => {}
            }
        }
    }
}
