//! # gmsl parser
//!
//! Recursive-descent parser with two-token lookahead, producing the AST
//! defined in [`ast`]. Expression parsing delegates to [`expr_tree`], the
//! left-growing tree builder that gives every binary operator equal,
//! left-associative precedence.
//!
//! Statement dispatch uses two-token lookahead to disambiguate `IDENT =`,
//! `IDENT :=`, and `IDENT .` as three different statement forms. An
//! unexpected token is always fatal: parsing aborts with a diagnostic naming
//! the actual token and, when known, the expected kind.

pub mod ast;
mod expr_tree;

#[cfg(test)]
mod tests;

use crate::error::{ParseError, Span};
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::Lexer;
use ast::{
    ArgumentDeclaration, BinOp, Class, Expr, FunctionDeclaration, Ident, Import, Stmt, TypeName,
};
use expr_tree::ExpressionTree;

pub struct Parser {
    lexer: Lexer,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Self { lexer }
    }

    fn peek(&self) -> &Token {
        self.lexer.peek()
    }

    fn peek_n(&self, k: usize) -> &Token {
        self.lexer.peek_n(k)
    }

    fn advance(&mut self) -> Token {
        self.lexer.next()
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> PResult<Token> {
        if std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind) {
            Ok(self.advance())
        } else {
            self.unexpected(expected)
        }
    }

    fn expect_ident(&mut self) -> PResult<Ident> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                let span = self.peek().span;
                self.advance();
                Ok(Ident { name, span })
            }
            _ => self.unexpected("identifier"),
        }
    }

    fn expect_type(&mut self) -> PResult<TypeName> {
        match self.peek().kind.clone() {
            TokenKind::Type(name) => {
                let span = self.peek().span;
                self.advance();
                Ok(TypeName { name, span })
            }
            _ => self.unexpected("type name"),
        }
    }

    fn expect_string(&mut self) -> PResult<(String, Span)> {
        match self.peek().kind.clone() {
            TokenKind::StringLiteral(raw) => {
                let span = self.peek().span;
                self.advance();
                Ok((Token::decode_string_escapes(&raw), span))
            }
            _ => self.unexpected("string literal"),
        }
    }

    fn unexpected<T>(&self, expected: &str) -> PResult<T> {
        let tok = self.peek();
        if tok.kind == TokenKind::Eof {
            Err(ParseError::UnexpectedEof {
                span: tok.span,
                expected: expected.to_string(),
            })
        } else {
            Err(ParseError::UnexpectedToken {
                span: tok.span,
                found: tok.kind.describe(),
                expected: expected.to_string(),
            })
        }
    }

    /// `class := 'package' IDENT (import | func)* EOF`
    pub fn parse_class(&mut self) -> PResult<Class> {
        self.expect(&TokenKind::Package, "'package'")?;
        let name = self.expect_ident()?;

        let mut imports = Vec::new();
        let mut functions = Vec::new();

        loop {
            match self.peek().kind {
                TokenKind::Import => imports.push(self.parse_import()?),
                TokenKind::Func => functions.push(self.parse_function()?),
                TokenKind::Eof => break,
                _ => return self.unexpected("'import' or 'func'"),
            }
        }

        Ok(Class {
            name,
            imports,
            functions,
        })
    }

    /// `import := 'import' (STRING | '(' STRING* ')')`
    fn parse_import(&mut self) -> PResult<Import> {
        self.expect(&TokenKind::Import, "'import'")?;
        if self.peek().kind == TokenKind::LParen {
            self.advance();
            let mut names = Vec::new();
            while let TokenKind::StringLiteral(_) = self.peek().kind {
                let (value, span) = self.expect_string()?;
                names.push(Ident { name: value, span });
            }
            self.expect(&TokenKind::RParen, "')'")?;
            Ok(Import::List(names))
        } else {
            let (value, span) = self.expect_string()?;
            Ok(Import::Single(Ident { name: value, span }))
        }
    }

    /// `func := 'func' IDENT '(' arg* ')' type? '{' stmt* '}'`
    fn parse_function(&mut self) -> PResult<FunctionDeclaration> {
        self.expect(&TokenKind::Func, "'func'")?;
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LParen, "'('")?;

        let mut arguments = Vec::new();
        while let TokenKind::Ident(_) = self.peek().kind {
            let arg_name = self.expect_ident()?;
            let arg_ty = self.expect_type()?;
            arguments.push(ArgumentDeclaration {
                name: arg_name,
                ty: arg_ty,
            });
        }
        self.expect(&TokenKind::RParen, "')'")?;

        let mut return_types = Vec::new();
        if let TokenKind::Type(_) = self.peek().kind {
            return_types.push(self.expect_type()?);
        }

        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            statements.push(self.parse_statement()?);
        }
        self.expect(&TokenKind::RBrace, "'}'")?;

        Ok(FunctionDeclaration {
            name,
            arguments,
            return_types,
            statements,
        })
    }

    /// `stmt := var-decl | var-assign | var-create | expr-stmt | if | return`
    ///
    /// `IDENT =`, `IDENT :=`, and a bare `IDENT`/`STRING`/`NUMBER` expression
    /// are disambiguated with two-token lookahead.
    fn parse_statement(&mut self) -> PResult<Stmt> {
        match &self.peek().kind {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::If => self.parse_if(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Ident(_) => match &self.peek_n(1).kind {
                TokenKind::Eq => self.parse_var_assign(),
                TokenKind::ColonEq => self.parse_var_create(),
                _ => Ok(Stmt::Expr(self.parse_expr()?)),
            },
            _ => Ok(Stmt::Expr(self.parse_expr()?)),
        }
    }

    /// `var-decl := 'var' IDENT type`
    fn parse_var_decl(&mut self) -> PResult<Stmt> {
        self.expect(&TokenKind::Var, "'var'")?;
        let name = self.expect_ident()?;
        let ty = self.expect_type()?;
        Ok(Stmt::VarDecl { name, ty })
    }

    /// `var-assign := IDENT '=' expr`
    fn parse_var_assign(&mut self) -> PResult<Stmt> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Eq, "'='")?;
        let value = self.parse_expr()?;
        Ok(Stmt::VarAssign { name, value })
    }

    /// `var-create := IDENT ':=' expr`
    fn parse_var_create(&mut self) -> PResult<Stmt> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::ColonEq, "':='")?;
        let value = self.parse_expr()?;
        Ok(Stmt::VarCreate { name, value })
    }

    /// `if := 'if' expr '{' stmt* '}' ('else' '{' stmt* '}')?`
    fn parse_if(&mut self) -> PResult<Stmt> {
        let span = self.peek().span;
        self.advance();
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut then_block = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            then_block.push(self.parse_statement()?);
        }
        self.expect(&TokenKind::RBrace, "'}'")?;

        let else_block = if self.peek().kind == TokenKind::Else {
            self.advance();
            self.expect(&TokenKind::LBrace, "'{'")?;
            let mut stmts = Vec::new();
            while self.peek().kind != TokenKind::RBrace {
                stmts.push(self.parse_statement()?);
            }
            self.expect(&TokenKind::RBrace, "'}'")?;
            Some(stmts)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
            span,
        })
    }

    /// `return := 'return' expr`
    fn parse_return(&mut self) -> PResult<Stmt> {
        let span = self.peek().span;
        self.advance();
        let value = self.parse_expr()?;
        Ok(Stmt::Return { value, span })
    }

    fn binop_at(kind: &TokenKind) -> Option<BinOp> {
        match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::Percent => Some(BinOp::Mod),
            TokenKind::EqEq => Some(BinOp::Eq),
            _ => None,
        }
    }

    fn leaf_can_start(kind: &TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Ident(_)
                | TokenKind::StringLiteral(_)
                | TokenKind::Number(_)
                | TokenKind::LParen
        )
    }

    /// `expr := leaf (op leaf)*`, built by alternating "accept leaf" and
    /// "accept operator" states until neither fits the next token.
    fn parse_expr(&mut self) -> PResult<Expr> {
        let mut tree = ExpressionTree::new();

        loop {
            if tree.can_add_leaf() {
                if Self::leaf_can_start(&self.peek().kind) {
                    let leaf = self.parse_leaf()?;
                    tree.add_leaf(leaf);
                    continue;
                }
                if !tree.can_add_operator() {
                    return self.unexpected("expression");
                }
            }
            if tree.can_add_operator() {
                if let Some(op) = Self::binop_at(&self.peek().kind) {
                    let span = self.peek().span;
                    self.advance();
                    tree.add_operator(op, span);
                    continue;
                }
            }
            break;
        }

        tree.into_expression()
            .ok_or_else(|| match self.peek().kind {
                TokenKind::Eof => ParseError::UnexpectedEof {
                    span: self.peek().span,
                    expected: "expression".into(),
                },
                _ => ParseError::UnexpectedToken {
                    span: self.peek().span,
                    found: self.peek().kind.describe(),
                    expected: "expression".into(),
                },
            })
    }

    /// `leaf := IDENT ('.' IDENT '(' expr* ')')? | STRING | NUMBER | IDENT | '(' expr ')'`
    fn parse_leaf(&mut self) -> PResult<Expr> {
        match self.peek().kind.clone() {
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::StringLiteral(raw) => {
                let span = self.peek().span;
                self.advance();
                Ok(Expr::StringLiteral {
                    value: Token::decode_string_escapes(&raw),
                    span,
                })
            }
            TokenKind::Number(value) => {
                let span = self.peek().span;
                self.advance();
                Ok(Expr::NumberLiteral { value, span })
            }
            TokenKind::Ident(_) => {
                let ident = self.expect_ident()?;
                if self.peek().kind == TokenKind::Dot {
                    self.advance();
                    let method = self.expect_ident()?;
                    self.expect(&TokenKind::LParen, "'('")?;
                    let mut arguments = Vec::new();
                    while Self::leaf_can_start(&self.peek().kind) {
                        arguments.push(self.parse_expr()?);
                        if self.peek().kind != TokenKind::RParen && !Self::leaf_can_start(&self.peek().kind)
                        {
                            break;
                        }
                    }
                    self.expect(&TokenKind::RParen, "')'")?;
                    Ok(Expr::MethodCall {
                        object: ident.clone(),
                        method,
                        arguments,
                        span: ident.span,
                    })
                } else {
                    Ok(Expr::Identifier(ident))
                }
            }
            _ => self.unexpected("expression"),
        }
    }
}

/// Convenience entry point: parse an entire source string into a `Class`.
pub fn parse(source: &str) -> Result<Class, ParseFailure> {
    let lexer = Lexer::tokenize(source).map_err(ParseFailure::Lex)?;
    Parser::new(lexer).parse_class().map_err(ParseFailure::Parse)
}

#[derive(Debug)]
pub enum ParseFailure {
    Lex(Vec<crate::error::LexError>),
    Parse(ParseError),
}
