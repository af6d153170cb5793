#![no_main]

use libfuzzer_sys::fuzz_target;

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    // The goal is "never panic / never hang" on arbitrary input, plus
    // two cheap oracles: positions stay monotone, and for inputs with
    // no escape sequences the token texts reproduce the input.
    let (tokens, _errors) = aula_syntax::lex_with_errors(text);

    for pair in tokens.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "token positions went backwards: {:?} then {:?}",
            pair[0],
            pair[1]
        );
    }

    if !text.contains('\\') {
        let rejoined: String = tokens
            .iter()
            .filter(|t| t.kind != aula_syntax::TokenKind::Eof)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(rejoined, text, "token texts must reproduce the input");
    }
});
