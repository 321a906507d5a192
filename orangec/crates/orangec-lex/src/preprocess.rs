//! Pre-processing pass (spec.md §4.2): strips comments out of a raw token
//! stream and coalesces an identifier immediately followed by `[]` into a
//! single identifier token whose text gains a `" array"` suffix.
//!
//! This runs as a second pass over the whole token stream rather than being
//! folded into [`crate::core::lex`] — the lexer proper has no notion of
//! comments at all; it just tokenizes whatever characters sit between the
//! `/*`/`*/`/`//` delimiters like any other code, exactly as spec.md
//! describes the two stages being separable.

use crate::token::{Token, TokenKind};

/// Removes block (`/* ... */`) and line (`// ...`) comments from a token
/// stream. A block comment runs from `LBlock` through the next `RBlock`,
/// inclusive. A line comment runs from `DSlash` through the last token on
/// that source line (or end of stream).
fn strip_comments(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(tok) = iter.next() {
        match tok.kind {
            TokenKind::LBlock => {
                for inner in iter.by_ref() {
                    if inner.kind == TokenKind::RBlock {
                        break;
                    }
                }
            }
            TokenKind::DSlash => {
                let comment_line = tok.line;
                while let Some(peeked) = iter.peek() {
                    if peeked.line != comment_line || peeked.kind == TokenKind::Eof {
                        break;
                    }
                    iter.next();
                }
            }
            _ => out.push(tok),
        }
    }

    out
}

/// Coalesces `IDENT [ ]` into a single `Identifier` token whose text is
/// `"<name> array"` (spec.md §4.2, §3.4's array-type spelling convention).
/// Repeats for every consecutive `[]` pair so stacked arrays (`int[][]`,
/// spelled `"int array array"` per spec.md §3.4) collapse fully rather than
/// leaving a trailing bracket pair unmerged.
fn coalesce_arrays(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(tok) = iter.next() {
        if tok.kind == TokenKind::Identifier {
            let mut merged = tok;
            loop {
                let is_array = {
                    let mut lookahead = iter.clone();
                    matches!(lookahead.next(), Some(t) if t.kind == TokenKind::LSquare)
                        && matches!(lookahead.next(), Some(t) if t.kind == TokenKind::RSquare)
                };
                if !is_array {
                    break;
                }
                iter.next();
                iter.next();
                merged.text = format!("{} array", merged.text);
            }
            out.push(merged);
            continue;
        }
        out.push(tok);
    }

    out
}

/// Runs both pre-processing passes over a raw token stream.
pub fn preprocess(tokens: Vec<Token>) -> Vec<Token> {
    coalesce_arrays(strip_comments(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lex;
    use orangec_util::FileId;

    fn f() -> FileId {
        FileId(0)
    }

    #[test]
    fn strips_block_comment() {
        let toks = preprocess(lex("a /* b c */ d", f()));
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn strips_line_comment_to_end_of_line() {
        let toks = preprocess(lex("a // comment here\nb", f()));
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(toks[1].text, "b");
    }

    #[test]
    fn coalesces_array_brackets_into_identifier_text() {
        let toks = preprocess(lex("int arr []", f()));
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(toks[1].text, "arr array");
    }

    #[test]
    fn stacked_brackets_coalesce_into_repeated_array_suffix() {
        let toks = preprocess(lex("int arr [][]", f()));
        assert_eq!(toks[1].text, "arr array array");
    }

    #[test]
    fn leaves_plain_identifier_untouched() {
        let toks = preprocess(lex("int x;", f()));
        assert_eq!(toks[1].text, "x");
    }
}
