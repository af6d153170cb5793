#![no_main]

use libfuzzer_sys::fuzz_target;

mod utils;

fn check_tree(node: &aula_syntax::StructuralNode) {
    assert!(node.span.start <= node.span.end);
    if let Some(body) = node.body_span {
        assert!(node.span.contains_span(&body), "body escapes its node");
    }
    for child in &node.children {
        assert!(node.span.contains_span(&child.span), "child escapes parent");
        check_tree(child);
    }
}

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    // Structural parsing must never fail on malformed input; every
    // opened span must come back closed and properly nested.
    let root = aula_syntax::parse_structure(text);
    check_tree(&root);

    // The annotation mapping must also hold up against arbitrary text.
    let tokens = aula_syntax::lex(text);
    let locator = aula_annotate::ErrorSpanLocator::new(&tokens);
    let diagnostic = aula_core::Diagnostic::error(
        aula_core::SourceSpan::point(aula_core::SourceLocation::new(1, 1)),
        "fuzz probe",
    );
    let _ = locator.locate(&diagnostic, true);
});
