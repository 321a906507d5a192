//! Recursive-descent parsing of symbols and statements (spec.md §4.3, §6.2).
//!
//! Surface grammar for `if`/`while` conditions (parenthesized, C-shaped) is
//! not pinned down by spec.md beyond the AST kinds it produces; this is a
//! parser-level decision recorded in DESIGN.md, not a restatement of a
//! missing rule.

use crate::ast::{AstId, AstKind, AstTree, Payload};
use crate::error::{ParseError, ParseResult};
use crate::tree::{SymId, SymKind, SymbolTree};
use orangec_lex::{Token, TokenKind};
use orangec_util::Symbol;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    pub tree: SymbolTree,
    pub(crate) current_scope: Option<SymId>,
    block_counter: u32,
}

fn dup_name(name: Symbol, span: orangec_util::Span) -> ParseError {
    ParseError::DuplicateName {
        name: name.as_str().to_string(),
        span,
    }
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            tree: SymbolTree::new(),
            current_scope: None,
            block_counter: 0,
        }
    }

    fn fresh_block_name(&mut self) -> String {
        let name = format!("_block{}", self.block_counter);
        self.block_counter += 1;
        name
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    pub(crate) fn peek_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.peek_kind() == kind {
            Ok(self.advance())
        } else {
            let tok = self.peek().clone();
            Err(ParseError::UnexpectedToken {
                found: tok.text.clone(),
                span: tok.span(),
            })
        }
    }

    fn consume_modifiers(&mut self) -> (bool, bool, bool) {
        let mut is_private = false;
        let mut is_static = false;
        let mut is_const = false;
        loop {
            match self.peek_kind() {
                TokenKind::Private => {
                    is_private = true;
                    self.advance();
                }
                TokenKind::Static => {
                    is_static = true;
                    self.advance();
                }
                TokenKind::Const => {
                    is_const = true;
                    self.advance();
                }
                _ => break,
            }
        }
        (is_private, is_static, is_const)
    }

    pub fn parse_program(&mut self) -> ParseResult<()> {
        while self.peek_kind() != TokenKind::Eof {
            let (_, is_static, _) = self.consume_modifiers();
            self.parse_module(is_static)?;
        }
        Ok(())
    }

    fn parse_module(&mut self, is_static: bool) -> ParseResult<SymId> {
        let name_tok = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::LBrace)?;
        let module_id = self
            .tree
            .insert(
                self.tree.root,
                SymKind::Module,
                name_tok.symbol(),
                String::new(),
                false,
                is_static,
                false,
                name_tok.span(),
            )
            .map_err(|n| dup_name(n, name_tok.span()))?;
        while self.peek_kind() != TokenKind::RBrace {
            self.parse_module_member(module_id)?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(module_id)
    }

    fn parse_module_member(&mut self, module_id: SymId) -> ParseResult<()> {
        let (is_private, is_static, is_const) = self.consume_modifiers();
        match self.peek_kind() {
            TokenKind::Struct => {
                self.parse_struct(module_id, is_private)?;
            }
            TokenKind::Enum => {
                self.parse_enum(module_id, is_private)?;
            }
            _ => {
                self.parse_var_or_function(module_id, is_private, is_static, is_const)?;
            }
        }
        Ok(())
    }

    fn parse_struct(&mut self, parent: SymId, is_private: bool) -> ParseResult<SymId> {
        self.expect(TokenKind::Struct)?;
        let name_tok = self.expect(TokenKind::Identifier)?;
        let struct_id = self
            .tree
            .insert(
                parent,
                SymKind::Struct,
                name_tok.symbol(),
                String::new(),
                is_private,
                false,
                false,
                name_tok.span(),
            )
            .map_err(|n| dup_name(n, name_tok.span()))?;
        self.expect(TokenKind::LParen)?;
        self.parse_params(struct_id)?;
        Ok(struct_id)
    }

    fn parse_enum(&mut self, parent: SymId, is_private: bool) -> ParseResult<SymId> {
        self.expect(TokenKind::Enum)?;
        let name_tok = self.expect(TokenKind::Identifier)?;
        let enum_id = self
            .tree
            .insert(
                parent,
                SymKind::Enum,
                name_tok.symbol(),
                String::new(),
                is_private,
                false,
                false,
                name_tok.span(),
            )
            .map_err(|n| dup_name(n, name_tok.span()))?;
        let canonical = self.tree.canonical_type_of(enum_id);
        self.expect(TokenKind::LParen)?;
        if self.peek_kind() != TokenKind::RParen {
            loop {
                let variant_tok = self.expect(TokenKind::Identifier)?;
                self.tree
                    .insert(
                        enum_id,
                        SymKind::Variable,
                        variant_tok.symbol(),
                        canonical.clone(),
                        false,
                        false,
                        true,
                        variant_tok.span(),
                    )
                    .map_err(|n| dup_name(n, variant_tok.span()))?;
                if self.peek_kind() == TokenKind::Comma {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(enum_id)
    }

    /// Parses `type name, type name, ...` up to and including the closing
    /// `)`. Assumes the opening `(` has already been consumed. Each
    /// parameter becomes a `Variable` child of `parent` (spec.md §4.3
    /// "Parameters").
    fn parse_params(&mut self, parent: SymId) -> ParseResult<Vec<SymId>> {
        let mut params = Vec::new();
        if self.peek_kind() != TokenKind::RParen {
            loop {
                let ty = self.parse_type_name()?;
                let name_tok = self.expect(TokenKind::Identifier)?;
                let id = self
                    .tree
                    .insert(
                        parent,
                        SymKind::Variable,
                        name_tok.symbol(),
                        ty,
                        false,
                        false,
                        false,
                        name_tok.span(),
                    )
                    .map_err(|n| ParseError::DuplicateParam {
                        name: n.as_str().to_string(),
                        span: name_tok.span(),
                    })?;
                params.push(id);
                if self.peek_kind() == TokenKind::Comma {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_var_or_function(
        &mut self,
        parent: SymId,
        is_private: bool,
        is_static: bool,
        is_const: bool,
    ) -> ParseResult<SymId> {
        let ty = self.parse_type_name()?;
        let name_tok = self.expect(TokenKind::Identifier)?;
        match self.peek_kind() {
            TokenKind::LParen => self.parse_function(parent, ty, name_tok, is_private, is_static),
            TokenKind::Equals => {
                self.parse_var_def(parent, ty, name_tok, is_private, is_static, is_const)
            }
            TokenKind::Semicolon => {
                self.parse_var_decl(parent, ty, name_tok, is_private, is_static, is_const)
            }
            _ => {
                let tok = self.peek().clone();
                Err(ParseError::UnexpectedToken {
                    found: tok.text.clone(),
                    span: tok.span(),
                })
            }
        }
    }

    fn parse_var_decl(
        &mut self,
        parent: SymId,
        ty: String,
        name_tok: Token,
        is_private: bool,
        is_static: bool,
        is_const: bool,
    ) -> ParseResult<SymId> {
        self.expect(TokenKind::Semicolon)?;
        self.tree
            .insert(
                parent,
                SymKind::Variable,
                name_tok.symbol(),
                ty,
                is_private,
                is_static,
                is_const,
                name_tok.span(),
            )
            .map_err(|n| dup_name(n, name_tok.span()))
    }

    fn parse_var_def(
        &mut self,
        parent: SymId,
        ty: String,
        name_tok: Token,
        is_private: bool,
        is_static: bool,
        is_const: bool,
    ) -> ParseResult<SymId> {
        self.expect(TokenKind::Equals)?;
        let var_id = self
            .tree
            .insert(
                parent,
                SymKind::Variable,
                name_tok.symbol(),
                ty,
                is_private,
                is_static,
                is_const,
                name_tok.span(),
            )
            .map_err(|n| dup_name(n, name_tok.span()))?;
        let saved_scope = self.current_scope;
        self.current_scope = Some(parent);
        let mut init_ast = AstTree::new();
        let root = self.parse_expr(&mut init_ast, 0)?;
        init_ast.set_root(root);
        self.current_scope = saved_scope;
        self.expect(TokenKind::Semicolon)?;
        self.tree.get_mut(var_id).code = Some(init_ast);
        Ok(var_id)
    }

    fn parse_function(
        &mut self,
        parent: SymId,
        ty: String,
        name_tok: Token,
        is_private: bool,
        is_static: bool,
    ) -> ParseResult<SymId> {
        let func_id = self
            .tree
            .insert(
                parent,
                SymKind::Function,
                name_tok.symbol(),
                ty,
                is_private,
                is_static,
                false,
                name_tok.span(),
            )
            .map_err(|n| dup_name(n, name_tok.span()))?;
        self.expect(TokenKind::LParen)?;
        self.parse_params(func_id)?;
        match self.peek_kind() {
            TokenKind::LBrace => {
                let saved = self.current_scope;
                self.current_scope = Some(func_id);
                let mut ast = AstTree::new();
                let root = self.parse_block(func_id, &mut ast)?;
                ast.set_root(root);
                self.current_scope = saved;
                self.tree.get_mut(func_id).code = Some(ast);
            }
            TokenKind::Equals => {
                self.advance();
                let saved = self.current_scope;
                self.current_scope = Some(func_id);
                let mut ast = AstTree::new();
                let span = self.peek().span();
                let value = self.parse_expr(&mut ast, 0)?;
                let ret = ast.push(AstKind::Return, Payload::None, vec![value], self.current_scope, span);
                ast.set_root(ret);
                self.current_scope = saved;
                self.expect(TokenKind::Semicolon)?;
                let block_name = self.fresh_block_name();
                self.tree
                    .insert(
                        func_id,
                        SymKind::Block,
                        Symbol::intern(&block_name),
                        String::new(),
                        false,
                        false,
                        false,
                        span,
                    )
                    .map_err(|n| dup_name(n, span))?;
                self.tree.get_mut(func_id).code = Some(ast);
            }
            TokenKind::Semicolon => {
                let span = self.peek().span();
                self.advance();
                self.tree.get_mut(func_id).kind = SymKind::FunctionPointer;
                let block_name = self.fresh_block_name();
                self.tree
                    .insert(
                        func_id,
                        SymKind::Block,
                        Symbol::intern(&block_name),
                        String::new(),
                        false,
                        false,
                        false,
                        span,
                    )
                    .map_err(|n| dup_name(n, span))?;
            }
            _ => {
                let tok = self.peek().clone();
                return Err(ParseError::ExpectedBlock {
                    keyword: name_tok.text.clone(),
                    span: tok.span(),
                });
            }
        }
        Ok(func_id)
    }

    fn parse_block(&mut self, parent_scope: SymId, ast: &mut AstTree) -> ParseResult<AstId> {
        let open = self.expect(TokenKind::LBrace)?;
        let block_name = self.fresh_block_name();
        let block_id = self
            .tree
            .insert(
                parent_scope,
                SymKind::Block,
                Symbol::intern(&block_name),
                String::new(),
                false,
                false,
                false,
                open.span(),
            )
            .map_err(|n| dup_name(n, open.span()))?;
        let saved_scope = self.current_scope;
        self.current_scope = Some(block_id);
        let mut stmts = Vec::new();
        while self.peek_kind() != TokenKind::RBrace {
            stmts.push(self.parse_stmt(block_id, ast)?);
        }
        let close = self.expect(TokenKind::RBrace)?;
        self.current_scope = saved_scope;
        Ok(ast.push(AstKind::Block, Payload::None, stmts, Some(block_id), open.span().merge(close.span())))
    }

    fn looks_like_local_decl(&self) -> bool {
        if self.peek_kind() != TokenKind::Identifier {
            return false;
        }
        match self.peek_at(1) {
            TokenKind::Identifier => true,
            TokenKind::Colon => {
                self.peek_at(2) == TokenKind::Identifier && self.peek_at(3) == TokenKind::Identifier
            }
            _ => false,
        }
    }

    fn parse_stmt(&mut self, scope: SymId, ast: &mut AstTree) -> ParseResult<AstId> {
        match self.peek_kind() {
            TokenKind::LBrace => self.parse_block(scope, ast),
            TokenKind::If => self.parse_if(scope, ast),
            TokenKind::While => self.parse_while(scope, ast),
            TokenKind::Return => self.parse_return(scope, ast),
            TokenKind::Static | TokenKind::Const | TokenKind::Private => {
                self.parse_local_decl(scope, ast)
            }
            _ if self.looks_like_local_decl() => self.parse_local_decl(scope, ast),
            _ => {
                let expr = self.parse_expr(ast, 0)?;
                self.expect(TokenKind::Semicolon)?;
                Ok(expr)
            }
        }
    }

    fn parse_local_decl(&mut self, scope: SymId, ast: &mut AstTree) -> ParseResult<AstId> {
        let (is_private, is_static, is_const) = self.consume_modifiers();
        let ty = self.parse_type_name()?;
        let name_tok = self.expect(TokenKind::Identifier)?;
        let var_id = self
            .tree
            .insert(
                scope,
                SymKind::Variable,
                name_tok.symbol(),
                ty,
                is_private,
                is_static,
                is_const,
                name_tok.span(),
            )
            .map_err(|n| dup_name(n, name_tok.span()))?;
        if self.peek_kind() == TokenKind::Equals {
            self.advance();
            let saved = self.current_scope;
            self.current_scope = Some(scope);
            let mut init_ast = AstTree::new();
            let root = self.parse_expr(&mut init_ast, 0)?;
            init_ast.set_root(root);
            self.current_scope = saved;
            self.tree.get_mut(var_id).code = Some(init_ast);
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(ast.push(
            AstKind::SymbolDefine,
            Payload::Sym(name_tok.symbol()),
            vec![],
            Some(scope),
            name_tok.span(),
        ))
    }

    fn parse_if(&mut self, scope: SymId, ast: &mut AstTree) -> ParseResult<AstId> {
        let kw = self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr(ast, 0)?;
        self.expect(TokenKind::RParen)?;
        let then_branch = self.parse_block(scope, ast)?;
        if self.peek_kind() == TokenKind::Else {
            self.advance();
            let else_branch = if self.peek_kind() == TokenKind::If {
                self.parse_if(scope, ast)?
            } else {
                self.parse_block(scope, ast)?
            };
            Ok(ast.push(
                AstKind::IfElse,
                Payload::None,
                vec![cond, then_branch, else_branch],
                Some(scope),
                kw.span(),
            ))
        } else {
            Ok(ast.push(AstKind::If, Payload::None, vec![cond, then_branch], Some(scope), kw.span()))
        }
    }

    fn parse_while(&mut self, scope: SymId, ast: &mut AstTree) -> ParseResult<AstId> {
        let kw = self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr(ast, 0)?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block(scope, ast)?;
        Ok(ast.push(AstKind::While, Payload::None, vec![cond, body], Some(scope), kw.span()))
    }

    fn parse_return(&mut self, scope: SymId, ast: &mut AstTree) -> ParseResult<AstId> {
        let kw = self.expect(TokenKind::Return)?;
        let value = if self.peek_kind() == TokenKind::Semicolon {
            ast.push(AstKind::Nop, Payload::None, vec![], Some(scope), kw.span())
        } else {
            self.parse_expr(ast, 0)?
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(ast.push(AstKind::Return, Payload::None, vec![value], Some(scope), kw.span()))
    }
}

/// Parses a pre-processed token stream into a [`SymbolTree`] (spec.md §4.3).
pub fn parse(tokens: Vec<Token>) -> ParseResult<SymbolTree> {
    let mut parser = Parser::new(tokens);
    parser.parse_program()?;
    Ok(parser.tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstKind;

    fn lex_and_parse(source: &str) -> ParseResult<SymbolTree> {
        let tokens = orangec_lex::lex(source, orangec_util::FileId(0));
        parse(tokens)
    }

    #[test]
    fn parses_simple_arithmetic_scenario() {
        let tree = lex_and_parse("Main { void start() { int x = 1 + 2 * 3; } }").unwrap();
        let main = tree.get(tree.root).children.get(&Symbol::intern("Main")).copied().unwrap();
        let start = tree.get(main).children.get(&Symbol::intern("start")).copied().unwrap();
        assert_eq!(tree.get(start).kind, SymKind::Function);
    }

    #[test]
    fn struct_fields_use_paren_param_list() {
        let tree = lex_and_parse("A { struct Pt(int x, int y) }").unwrap();
        let a = tree.get(tree.root).children.get(&Symbol::intern("A")).copied().unwrap();
        let pt = tree.get(a).children.get(&Symbol::intern("Pt")).copied().unwrap();
        assert_eq!(tree.get(pt).children.len(), 2);
    }

    #[test]
    fn enum_variants_are_constant_children() {
        let tree = lex_and_parse("A { enum Color(Red, Green, Blue) }").unwrap();
        let a = tree.get(tree.root).children.get(&Symbol::intern("A")).copied().unwrap();
        let color = tree.get(a).children.get(&Symbol::intern("Color")).copied().unwrap();
        let red = tree.get(color).children.get(&Symbol::intern("Red")).copied().unwrap();
        assert!(tree.get(red).is_constant);
    }

    #[test]
    fn arithmetic_builds_right_then_left_children() {
        let tree = lex_and_parse("Main { void start() { int x = 1 + 2; } }").unwrap();
        let main = tree.get(tree.root).children.get(&Symbol::intern("Main")).copied().unwrap();
        let start = tree.get(main).children.get(&Symbol::intern("start")).copied().unwrap();
        let ast = tree.get(start).code.as_ref().unwrap();
        let block = ast.get(ast.root.unwrap());
        let define = ast.get(block.children[0]);
        assert_eq!(define.kind, AstKind::SymbolDefine);
        let x_sym = tree.get(start).children.get(&Symbol::intern("_block0")).unwrap();
        let x_var = tree.get(*x_sym).children.get(&Symbol::intern("x")).copied().unwrap();
        let init = tree.get(x_var).code.as_ref().unwrap();
        let add = init.get(init.root.unwrap());
        assert_eq!(add.kind, AstKind::Add);
        assert_eq!(add.children.len(), 2);
    }

    #[test]
    fn bodyless_function_becomes_function_pointer() {
        let tree = lex_and_parse("A { int f(int a, int b); }").unwrap();
        let a = tree.get(tree.root).children.get(&Symbol::intern("A")).copied().unwrap();
        let f = tree.get(a).children.get(&Symbol::intern("f")).copied().unwrap();
        assert_eq!(tree.get(f).kind, SymKind::FunctionPointer);
    }

    #[test]
    fn duplicate_parameter_name_is_rejected() {
        let err = lex_and_parse("A { int f(int a, int a) {} }").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateParam { .. }));
    }

    #[test]
    fn qualified_type_parses_as_dollar_form() {
        let tree = lex_and_parse("A { struct Pt(int x) } B { A:Pt p; }").unwrap();
        let b = tree.get(tree.root).children.get(&Symbol::intern("B")).copied().unwrap();
        let p = tree.get(b).children.get(&Symbol::intern("p")).copied().unwrap();
        assert_eq!(tree.get(p).ty, "A$Pt");
    }
}
