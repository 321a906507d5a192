//! Standalone infix→postfix conversion (spec.md §4.3 step 3, §6.3) kept as
//! a pure token-level utility so spec.md §8's round-trip property
//! (`infix_to_postfix(simplify(tokens))`) is directly testable without
//! building real ASTs. The parser itself (`expr.rs`) builds ASTs directly
//! with a precedence-climbing recursive descent over the same table —
//! an equivalent, more idiomatic way to implement the same grammar, not a
//! second source of truth for precedence (see DESIGN.md).

use orangec_lex::{Token, TokenKind};

/// Precedence of a binary operator token, per spec.md §6.3 (higher binds
/// tighter). `None` for anything that isn't a binary operator at this level
/// (grouping, literals, identifiers).
pub fn precedence(kind: TokenKind) -> Option<u8> {
    use TokenKind::*;
    match kind {
        Equals => Some(1),
        Or => Some(2),
        And => Some(3),
        Is | Isnt => Some(4),
        Greater | Lesser | GreaterEqual | LesserEqual => Some(5),
        Plus | Minus => Some(6),
        Star | Slash => Some(7),
        _ => None,
    }
}

fn is_operand(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Identifier
            | IntLiteral
            | RealLiteral
            | CharLiteral
            | StringLiteral
            | True
            | False
            | Null
            | Call
            | Index
            | Verbatim
    )
}

/// Converts a flat, already-simplified (spec.md §4.2/§4.3 step 2)
/// expression's tokens from infix to postfix order via the textbook
/// shunting-yard algorithm.
pub fn infix_to_postfix(tokens: &[Token]) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token> = Vec::new();

    for tok in tokens {
        if is_operand(tok.kind) {
            output.push(tok.clone());
        } else if tok.kind == TokenKind::LParen {
            ops.push(tok.clone());
        } else if tok.kind == TokenKind::RParen {
            while let Some(top) = ops.last() {
                if top.kind == TokenKind::LParen {
                    ops.pop();
                    break;
                }
                output.push(ops.pop().unwrap());
            }
        } else if let Some(prec) = precedence(tok.kind) {
            while let Some(top) = ops.last() {
                if top.kind == TokenKind::LParen {
                    break;
                }
                match precedence(top.kind) {
                    Some(top_prec) if top_prec >= prec => output.push(ops.pop().unwrap()),
                    _ => break,
                }
            }
            ops.push(tok.clone());
        }
    }

    while let Some(op) = ops.pop() {
        output.push(op);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use orangec_util::FileId;

    fn f() -> FileId {
        FileId(0)
    }

    #[test]
    fn simple_precedence_respected() {
        // 1 + 2 * 3 -> 1 2 3 * +
        let toks = orangec_lex::lex("1 + 2 * 3", f());
        let postfix = infix_to_postfix(&toks[..toks.len() - 1]); // drop EOF
        let kinds: Vec<_> = postfix.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::Star,
                TokenKind::Plus,
            ]
        );
    }

    #[test]
    fn parens_override_precedence() {
        // (1 + 2) * 3 -> 1 2 + 3 *
        let toks = orangec_lex::lex("(1 + 2) * 3", f());
        let postfix = infix_to_postfix(&toks[..toks.len() - 1]);
        let kinds: Vec<_> = postfix.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::Plus,
                TokenKind::IntLiteral,
                TokenKind::Star,
            ]
        );
    }

    fn operand_operator_counts(tokens: &[Token]) -> (usize, usize) {
        let operands = tokens.iter().filter(|t| is_operand(t.kind)).count();
        let operators = tokens
            .iter()
            .filter(|t| precedence(t.kind).is_some())
            .count();
        (operands, operators)
    }

    #[quickcheck_macros::quickcheck]
    fn round_trip_preserves_operand_and_operator_counts(a: i32, b: i32, c: i32) -> bool {
        let source = format!("{} + {} * {}", a, b, c);
        let toks = orangec_lex::lex(&source, f());
        let infix = &toks[..toks.len() - 1];
        let postfix = infix_to_postfix(infix);
        let (in_operands, in_operators) = operand_operator_counts(infix);
        let (out_operands, out_operators) = operand_operator_counts(&postfix);
        in_operands == out_operands && in_operators == out_operators
    }
}
