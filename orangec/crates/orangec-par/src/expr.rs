//! Expression parsing (spec.md §4.3, §6.3): precedence-climbing recursive
//! descent that builds [`AstNode`]s directly, honoring the right-then-left
//! operand order spec.md §8 requires of every binary node (`children[0]` is
//! the right operand, `children[1]` is the left one).

use crate::ast::{AstId, AstKind, AstTree, Payload};
use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use orangec_lex::TokenKind;

const PREC_ASSIGN: u8 = 1;
const PREC_OR: u8 = 2;
const PREC_AND: u8 = 3;
const PREC_EQUALITY: u8 = 4;
const PREC_COMPARE: u8 = 5;
const PREC_ADDITIVE: u8 = 6;
const PREC_MULTIPLICATIVE: u8 = 7;
const PREC_NEW_FREE: u8 = 8;
const PREC_CAST: u8 = 9;

fn binop_kind(kind: TokenKind) -> Option<(AstKind, u8, bool)> {
    use TokenKind::*;
    Some(match kind {
        Equals => (AstKind::Assign, PREC_ASSIGN, true),
        Or => (AstKind::Or, PREC_OR, false),
        And => (AstKind::And, PREC_AND, false),
        Is => (AstKind::Is, PREC_EQUALITY, false),
        Isnt => (AstKind::Isnt, PREC_EQUALITY, false),
        Greater => (AstKind::Greater, PREC_COMPARE, false),
        Lesser => (AstKind::Lesser, PREC_COMPARE, false),
        GreaterEqual => (AstKind::GreaterEqual, PREC_COMPARE, false),
        LesserEqual => (AstKind::LesserEqual, PREC_COMPARE, false),
        Plus => (AstKind::Add, PREC_ADDITIVE, false),
        Minus => (AstKind::Sub, PREC_ADDITIVE, false),
        Star => (AstKind::Mul, PREC_MULTIPLICATIVE, false),
        Slash => (AstKind::Div, PREC_MULTIPLICATIVE, false),
        _ => return None,
    })
}

impl Parser {
    /// Parses a full expression down to (but not below) `min_prec`.
    pub(crate) fn parse_expr(&mut self, ast: &mut AstTree, min_prec: u8) -> ParseResult<AstId> {
        let mut left = self.parse_unary(ast)?;
        loop {
            let Some((kind, prec, right_assoc)) = binop_kind(self.peek_kind()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            let op_span = self.peek().span();
            self.advance();
            let next_min = if right_assoc { prec } else { prec + 1 };
            let right = self.parse_expr(ast, next_min)?;
            left = ast.push(kind, Payload::None, vec![right, left], self.current_scope, op_span);
        }
        Ok(left)
    }

    fn parse_unary(&mut self, ast: &mut AstTree) -> ParseResult<AstId> {
        match self.peek_kind() {
            TokenKind::New => {
                let span = self.peek().span();
                self.advance();
                let operand = self.parse_expr(ast, PREC_NEW_FREE)?;
                Ok(ast.push(AstKind::New, Payload::None, vec![operand], self.current_scope, span))
            }
            TokenKind::Free => {
                let span = self.peek().span();
                self.advance();
                let operand = self.parse_expr(ast, PREC_NEW_FREE)?;
                Ok(ast.push(AstKind::Free, Payload::None, vec![operand], self.current_scope, span))
            }
            TokenKind::Cast => {
                let span = self.peek().span();
                self.advance();
                self.expect(TokenKind::LParen)?;
                let target = self.parse_type_name()?;
                self.expect(TokenKind::RParen)?;
                let operand = self.parse_expr(ast, PREC_CAST)?;
                Ok(ast.push(AstKind::Cast, Payload::Str(target), vec![operand], self.current_scope, span))
            }
            _ => self.parse_postfix(ast),
        }
    }

    fn parse_postfix(&mut self, ast: &mut AstTree) -> ParseResult<AstId> {
        let mut left = self.parse_primary(ast)?;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    let span = self.peek().span();
                    self.advance();
                    let field_tok = self.expect(TokenKind::Identifier)?;
                    let field = ast.push(
                        AstKind::Var,
                        Payload::Sym(field_tok.symbol()),
                        vec![],
                        self.current_scope,
                        field_tok.span(),
                    );
                    left = ast.push(AstKind::Dot, Payload::None, vec![field, left], self.current_scope, span);
                }
                TokenKind::Colon => {
                    let span = self.peek().span();
                    self.advance();
                    let member = if self.peek_kind() == TokenKind::Identifier
                        && self.peek_at(1) == TokenKind::LParen
                    {
                        self.parse_call(ast)?
                    } else {
                        let name_tok = self.expect(TokenKind::Identifier)?;
                        ast.push(
                            AstKind::Var,
                            Payload::Sym(name_tok.symbol()),
                            vec![],
                            self.current_scope,
                            name_tok.span(),
                        )
                    };
                    left = ast.push(AstKind::ModuleAccess, Payload::None, vec![member, left], self.current_scope, span);
                }
                TokenKind::LSquare => {
                    let span = self.peek().span();
                    self.advance();
                    let index = self.parse_expr(ast, 0)?;
                    self.expect(TokenKind::RSquare)?;
                    left = ast.push(AstKind::Index, Payload::None, vec![index, left], self.current_scope, span);
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_primary(&mut self, ast: &mut AstTree) -> ParseResult<AstId> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::IntLiteral => {
                self.advance();
                let value: i64 = tok.text.parse().unwrap_or(0);
                Ok(ast.push(AstKind::IntLiteral, Payload::Int(value), vec![], self.current_scope, tok.span()))
            }
            TokenKind::RealLiteral => {
                self.advance();
                let value: f64 = tok.text.parse().unwrap_or(0.0);
                Ok(ast.push(AstKind::RealLiteral, Payload::Float(value), vec![], self.current_scope, tok.span()))
            }
            TokenKind::CharLiteral => {
                self.advance();
                Ok(ast.push(AstKind::CharLiteral, Payload::Str(tok.text.clone()), vec![], self.current_scope, tok.span()))
            }
            TokenKind::StringLiteral => {
                self.advance();
                Ok(ast.push(AstKind::StringLiteral, Payload::Str(tok.text.clone()), vec![], self.current_scope, tok.span()))
            }
            TokenKind::True => {
                self.advance();
                Ok(ast.push(AstKind::True, Payload::None, vec![], self.current_scope, tok.span()))
            }
            TokenKind::False => {
                self.advance();
                Ok(ast.push(AstKind::False, Payload::None, vec![], self.current_scope, tok.span()))
            }
            TokenKind::Null => {
                self.advance();
                Ok(ast.push(AstKind::Null, Payload::None, vec![], self.current_scope, tok.span()))
            }
            TokenKind::Verbatim => self.parse_verbatim(ast),
            TokenKind::Identifier => {
                if self.peek_at(1) == TokenKind::LParen {
                    self.parse_call(ast)
                } else {
                    self.advance();
                    Ok(ast.push(AstKind::Var, Payload::Sym(tok.symbol()), vec![], self.current_scope, tok.span()))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr(ast, 0)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(ParseError::UnexpectedToken {
                found: tok.text.clone(),
                span: tok.span(),
            }),
        }
    }

    fn parse_call(&mut self, ast: &mut AstTree) -> ParseResult<AstId> {
        let name_tok = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::LParen)?;
        let args = self.parse_arg_list(ast)?;
        Ok(ast.push(AstKind::Call, Payload::Sym(name_tok.symbol()), args, self.current_scope, name_tok.span()))
    }

    fn parse_verbatim(&mut self, ast: &mut AstTree) -> ParseResult<AstId> {
        let tok = self.expect(TokenKind::Verbatim)?;
        self.expect(TokenKind::LParen)?;
        let args = self.parse_arg_list(ast)?;
        Ok(ast.push(AstKind::Verbatim, Payload::None, args, self.current_scope, tok.span()))
    }

    /// Parses a comma-separated argument list up to and including the
    /// closing `)`. Assumes the opening `(` has already been consumed.
    fn parse_arg_list(&mut self, ast: &mut AstTree) -> ParseResult<Vec<AstId>> {
        let mut args = Vec::new();
        if self.peek_kind() != TokenKind::RParen {
            loop {
                args.push(self.parse_expr(ast, 0)?);
                if self.peek_kind() == TokenKind::Comma {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// Parses a type name: a bare identifier (possibly already
    /// array-suffixed by the pre-processor) or a qualified `Mod:Type` form,
    /// returned in spec.md §3.4's `Mod$Type` pre-resolution shape.
    pub(crate) fn parse_type_name(&mut self) -> ParseResult<String> {
        let first = self.expect(TokenKind::Identifier)?;
        if self.peek_kind() == TokenKind::Colon {
            self.advance();
            let second = self.expect(TokenKind::Identifier)?;
            Ok(format!("{}${}", first.text, second.text))
        } else {
            Ok(first.text.clone())
        }
    }
}
