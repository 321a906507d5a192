//! Integer and real literal scanning (spec.md §4.1: "an integer literal
//! becomes a real literal upon encountering `.`").

use crate::cursor::Cursor;
use crate::token::TokenKind;

/// Scans a numeric literal starting at the cursor's current digit.
/// Returns the literal's spelling and whether it turned out to be a
/// `RealLiteral` (a `.` was seen) or stayed an `IntLiteral`.
pub fn scan(cursor: &mut Cursor) -> (String, TokenKind) {
    let mut text = String::new();

    while cursor.current_char().is_ascii_digit() {
        text.push(cursor.current_char());
        cursor.advance();
    }

    if cursor.current_char() == '.' && cursor.peek_char(1) != '.' {
        text.push('.');
        cursor.advance();
        while cursor.current_char().is_ascii_digit() {
            text.push(cursor.current_char());
            cursor.advance();
        }
        return (text, TokenKind::RealLiteral);
    }

    (text, TokenKind::IntLiteral)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_digits_are_an_int_literal() {
        let mut cursor = Cursor::new("42;");
        let (text, kind) = scan(&mut cursor);
        assert_eq!(text, "42");
        assert_eq!(kind, TokenKind::IntLiteral);
        assert_eq!(cursor.current_char(), ';');
    }

    #[test]
    fn a_dot_promotes_to_real_literal() {
        let mut cursor = Cursor::new("3.14;");
        let (text, kind) = scan(&mut cursor);
        assert_eq!(text, "3.14");
        assert_eq!(kind, TokenKind::RealLiteral);
    }

    #[test]
    fn trailing_dot_with_no_fraction_is_still_real() {
        let mut cursor = Cursor::new("3.");
        let (text, kind) = scan(&mut cursor);
        assert_eq!(text, "3.");
        assert_eq!(kind, TokenKind::RealLiteral);
    }
}
