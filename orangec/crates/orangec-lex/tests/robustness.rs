//! Lexing never panics or hangs, even on arbitrary input (spec.md §4.1:
//! the lexer has no failure mode of its own).

use orangec_util::FileId;
use proptest::prelude::*;

proptest! {
    #[test]
    fn never_panics_on_arbitrary_text(source in ".{0,200}") {
        let _ = orangec_lex::lex(&source, FileId(0));
    }

    #[test]
    fn always_ends_in_exactly_one_eof(source in "[a-zA-Z0-9_ \\n(){}\\[\\];,.+\\-*/<>=!&|'\"]{0,100}") {
        let tokens = orangec_lex::lex(&source, FileId(0));
        let eof_count = tokens.iter().filter(|t| t.kind == orangec_lex::TokenKind::Eof).count();
        prop_assert_eq!(eof_count, 1);
        prop_assert_eq!(tokens.last().unwrap().kind, orangec_lex::TokenKind::Eof);
    }
}
