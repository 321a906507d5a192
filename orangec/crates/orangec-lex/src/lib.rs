//! Lexing: source text to a flat [`Token`] stream.
//!
//! [`lex`] runs the raw scanning automaton (spec.md §4.1) and then the
//! pre-processor (spec.md §4.2), so callers always get a stream with
//! comments already stripped and array brackets already coalesced into
//! their owning identifier.

pub mod cursor;
pub mod keyword;
pub mod number;
pub mod preprocess;
pub mod string;
pub mod token;

mod core;

pub use token::{Token, TokenKind};

/// Lexes one source file into its final token stream: scan, then
/// pre-process. The last token is always `Eof`.
pub fn lex(source: &str, file: orangec_util::FileId) -> Vec<Token> {
    preprocess::preprocess(core::lex(source, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orangec_util::FileId;

    #[test]
    fn end_to_end_strips_comments_and_coalesces_arrays() {
        let toks = lex("int main (int args []) /* entry */ {}", FileId(0));
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        use TokenKind::*;
        assert_eq!(
            kinds,
            vec![
                Identifier, Identifier, LParen, Identifier, Identifier, RParen, LBrace, RBrace, Eof,
            ]
        );
        assert_eq!(toks[4].text, "args array");
    }
}
