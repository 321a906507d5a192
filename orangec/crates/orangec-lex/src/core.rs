//! The core scanning automaton (spec.md §4.1): one token at a time, off a
//! single [`Cursor`]. Identifiers, numbers, and quoted literals each have
//! their own state; everything else falls through to the punctuation table.

use crate::cursor::Cursor;
use crate::keyword;
use crate::number;
use crate::string;
use crate::token::{Token, TokenKind};
use orangec_util::FileId;

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn scan_identifier(cursor: &mut Cursor) -> String {
    let mut text = String::new();
    while is_ident_continue(cursor.current_char()) {
        text.push(cursor.current_char());
        cursor.advance();
    }
    text
}

/// Single-character tokens that always terminate immediately, with no
/// lookahead (spec.md §4.1).
fn single_char_kind(c: char) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match c {
        '(' => LParen,
        ')' => RParen,
        '[' => LSquare,
        ']' => RSquare,
        '{' => LBrace,
        '}' => RBrace,
        ',' => Comma,
        '.' => Dot,
        ';' => Semicolon,
        '~' => Tilde,
        ':' => Colon,
        '+' => Plus,
        '-' => Minus,
        _ => return None,
    })
}

/// Scans one token starting at the cursor's current (non-whitespace)
/// position. Returns `None` only at end of source.
fn scan_one(cursor: &mut Cursor, file: FileId) -> Option<Token> {
    cursor.skip_whitespace();
    if cursor.is_at_end() {
        return None;
    }

    let line = cursor.line() - 1; // Token::line is 0-based (spec.md §3.1)
    let c = cursor.current_char();

    if is_ident_start(c) {
        let text = scan_identifier(cursor);
        let kind = keyword::lookup(&text).unwrap_or(TokenKind::Identifier);
        return Some(Token::new(kind, text, file, line));
    }

    if c.is_ascii_digit() {
        let (text, kind) = number::scan(cursor);
        return Some(Token::new(kind, text, file, line));
    }

    if c == '\'' {
        cursor.advance();
        let text = string::scan_char(cursor);
        return Some(Token::new(TokenKind::CharLiteral, text, file, line));
    }

    if c == '"' {
        cursor.advance();
        let text = string::scan_string(cursor);
        return Some(Token::new(TokenKind::StringLiteral, text, file, line));
    }

    if let Some(kind) = single_char_kind(c) {
        cursor.advance();
        return Some(Token::new(kind, c.to_string(), file, line));
    }

    // Multi-character punctuation: <, >, =, &, |, !, /, * each either stand
    // alone or extend with one more character (spec.md §4.1, §6.1).
    use TokenKind::*;
    let kind = match c {
        '=' => {
            cursor.advance();
            if cursor.match_char('=') {
                Is
            } else {
                Equals
            }
        }
        '!' => {
            cursor.advance();
            if cursor.match_char('=') {
                Isnt
            } else {
                Unknown
            }
        }
        '<' => {
            cursor.advance();
            if cursor.match_char('=') {
                LesserEqual
            } else {
                Lesser
            }
        }
        '>' => {
            cursor.advance();
            if cursor.match_char('=') {
                GreaterEqual
            } else {
                Greater
            }
        }
        '&' => {
            cursor.advance();
            if cursor.match_char('&') {
                And
            } else {
                Unknown
            }
        }
        '|' => {
            cursor.advance();
            if cursor.match_char('|') {
                Or
            } else {
                Unknown
            }
        }
        '/' => {
            cursor.advance();
            if cursor.match_char('*') {
                LBlock
            } else if cursor.match_char('/') {
                DSlash
            } else {
                Slash
            }
        }
        '*' => {
            cursor.advance();
            if cursor.match_char('/') {
                RBlock
            } else {
                Star
            }
        }
        other => {
            cursor.advance();
            let _ = other;
            Unknown
        }
    };

    Some(Token::new(kind, c.to_string(), file, line))
}

/// Lexes an entire source file into a flat token stream, terminated by a
/// single `Eof` token. This is the raw scan only — comment stripping and
/// array-bracket coalescing happen in [`crate::preprocess`].
pub fn lex(source: &str, file: FileId) -> Vec<Token> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    while let Some(tok) = scan_one(&mut cursor, file) {
        tokens.push(tok);
    }

    let eof_line = cursor.line() - 1;
    tokens.push(Token::new(TokenKind::Eof, "", file, eof_line));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use orangec_util::FileId;

    fn f() -> FileId {
        FileId(0)
    }

    #[test]
    fn lexes_simple_declaration() {
        let toks = lex("int x = 5;", f());
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::IntLiteral,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn both_equality_spellings_produce_is() {
        let a = lex("a == b", f());
        let b_src = lex("a is b", f());
        assert_eq!(a[1].kind, TokenKind::Is);
        assert_eq!(b_src[1].kind, TokenKind::Is);
    }

    #[test]
    fn double_ampersand_and_pipe_are_boolean_ops() {
        let toks = lex("a && b || c", f());
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::And,
                TokenKind::Identifier,
                TokenKind::Or,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newline_bumps_line_without_emitting_a_token() {
        let toks = lex("a\nb", f());
        assert_eq!(toks[0].line, 0);
        assert_eq!(toks[1].line, 1);
    }

    #[test]
    fn block_and_line_comment_delimiters_are_emitted_as_tokens() {
        let toks = lex("/* x */ a // y", f());
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LBlock,
                TokenKind::Identifier,
                TokenKind::RBlock,
                TokenKind::Identifier,
                TokenKind::DSlash,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn empty_source_is_just_eof() {
        let toks = lex("", f());
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Eof);
    }
}
