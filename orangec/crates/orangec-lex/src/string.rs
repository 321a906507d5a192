//! Char and string literal scanning (spec.md §4.1: "consume until the
//! matching quote, honoring one-character backslash escapes").

use crate::cursor::Cursor;

fn escape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

/// Scans a `'`-delimited char literal. The opening quote must already be
/// consumed by the caller. Returns the single (possibly escaped) character
/// as a one-character string.
pub fn scan_char(cursor: &mut Cursor) -> String {
    let c = if cursor.current_char() == '\\' {
        cursor.advance();
        let escaped = escape(cursor.current_char());
        cursor.advance();
        escaped
    } else {
        let c = cursor.current_char();
        cursor.advance();
        c
    };

    cursor.match_char('\'');
    c.to_string()
}

/// Scans a `"`-delimited string literal. The opening quote must already be
/// consumed by the caller. Stops at the closing quote or at end of source,
/// whichever comes first; an unterminated string is not a lexer failure
/// (spec.md §4.1 leaves malformed-token recovery to the parser).
pub fn scan_string(cursor: &mut Cursor) -> String {
    let mut text = String::new();

    while !cursor.is_at_end() && cursor.current_char() != '"' {
        if cursor.current_char() == '\\' {
            cursor.advance();
            text.push(escape(cursor.current_char()));
            cursor.advance();
        } else {
            text.push(cursor.current_char());
            cursor.advance();
        }
    }

    cursor.match_char('"');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_char_literal() {
        let mut cursor = Cursor::new("a';");
        assert_eq!(scan_char(&mut cursor), "a");
        assert_eq!(cursor.current_char(), ';');
    }

    #[test]
    fn escaped_newline_char_literal() {
        let mut cursor = Cursor::new("\\n';");
        assert_eq!(scan_char(&mut cursor), "\n");
    }

    #[test]
    fn plain_string_literal() {
        let mut cursor = Cursor::new("hello\";");
        assert_eq!(scan_string(&mut cursor), "hello");
        assert_eq!(cursor.current_char(), ';');
    }

    #[test]
    fn string_literal_with_escapes() {
        let mut cursor = Cursor::new("a\\tb\\\"c\";");
        assert_eq!(scan_string(&mut cursor), "a\tb\"c");
    }

    #[test]
    fn unterminated_string_consumes_to_eof_without_panicking() {
        let mut cursor = Cursor::new("oops");
        assert_eq!(scan_string(&mut cursor), "oops");
        assert!(cursor.is_at_end());
    }
}
