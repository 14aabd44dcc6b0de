//! Recursive-descent parser for Bramble
//!
//! Operator precedence is resolved here; the evaluator treats the tree
//! as given. The parser also computes each function literal's free-name
//! list (see [`super::analysis`]) and desugars a block's trailing
//! expression into a `return` statement, so expression statements are
//! always invocations by the time evaluation sees them.

use std::rc::Rc;

use crate::error::SyntaxError;

use super::analysis::free_names;
use super::ast::{BinOp, Block, Expr, FnDecl, Pos, Program, Span, Stmt};
use super::token::{Token, TokenKind};

/// Parser over a lexed token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a parser over the given tokens. The stream must end with
    /// an `Eof` token, as produced by the lexer.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse a whole program.
    ///
    /// Recovers at statement boundaries so a single run reports every
    /// syntax error it can find.
    pub fn parse(mut self) -> Result<Program, Vec<SyntaxError>> {
        let mut stmts = Vec::new();
        let mut errors = Vec::new();

        while !self.check(&TokenKind::Eof) {
            let pos_before = self.pos;

            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    errors.push(e);
                    self.recover();
                }
            }

            // guarantee progress — if nothing was consumed, force-advance
            // to prevent an infinite loop on unrecognised tokens
            if self.pos == pos_before {
                self.advance();
            }
        }

        if errors.is_empty() {
            Ok(Program { stmts })
        } else {
            Err(errors)
        }
    }

    /// Skip to the next plausible statement boundary.
    fn recover(&mut self) {
        while !self.check(&TokenKind::Eof) {
            match self.peek_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_let(),
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Ident(_) if self.next_is_assign() => self.parse_assign(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_let(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.start();
        self.expect(TokenKind::Let)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Let {
            name,
            value,
            span: self.span_from(start),
        })
    }

    fn parse_assign(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.start();
        let name = self.expect_ident()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Assign {
            name,
            value,
            span: self.span_from(start),
        })
    }

    fn parse_return(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.start();
        self.expect(TokenKind::Return)?;
        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return {
            value,
            span: self.span_from(start),
        })
    }

    fn parse_if(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.start();
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = self.parse_branch()?;
        let else_branch = if self.matches(&TokenKind::Else) {
            Some(self.parse_branch()?)
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
            span: self.span_from(start),
        })
    }

    /// An `if` branch: a braced block, or a single statement treated as
    /// a one-statement block.
    fn parse_branch(&mut self) -> Result<Block, SyntaxError> {
        if self.check(&TokenKind::LBrace) {
            self.parse_block()
        } else {
            let start = self.start();
            let stmt = self.parse_stmt()?;
            Ok(Block {
                stmts: vec![stmt],
                span: self.span_from(start),
            })
        }
    }

    fn parse_block(&mut self) -> Result<Block, SyntaxError> {
        let start = self.start();
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    /// An expression in statement position.
    ///
    /// A call followed by `;` is an ordinary expression statement. Any
    /// other expression is only legal in tail position — directly
    /// before `}` or the end of input, with or without `;` — where it
    /// desugars into a `return`. A call in tail position stays a
    /// statement when it has `;` (its result, void included, is
    /// discarded) and becomes a `return` when it doesn't.
    fn parse_expr_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let expr = self.parse_expr()?;
        let span = expr.span();
        match self.peek_kind() {
            TokenKind::Semicolon => {
                self.advance();
                if matches!(expr, Expr::Call { .. }) {
                    Ok(Stmt::Expr(expr))
                } else if matches!(self.peek_kind(), TokenKind::RBrace | TokenKind::Eof) {
                    Ok(Stmt::Return {
                        value: Some(expr),
                        span,
                    })
                } else {
                    Err(SyntaxError::ExpressionNotACall {
                        pos: expr.span().start,
                    })
                }
            }
            TokenKind::RBrace | TokenKind::Eof => Ok(Stmt::Return {
                value: Some(expr),
                span,
            }),
            other => Err(SyntaxError::UnexpectedToken {
                expected: "`;`".into(),
                found: other.to_string(),
                pos: self.peek().span.start,
            }),
        }
    }

    // ─── Expressions (precedence climbing) ───────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_and()?;
        while self.matches(&TokenKind::OrOr) {
            let right = self.parse_and()?;
            left = self.binary(left, BinOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_equality()?;
        while self.matches(&TokenKind::AndAnd) {
            let right = self.parse_equality()?;
            left = self.binary(left, BinOp::And, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::BangEq => BinOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = self.binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_addition()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                _ => break,
            };
            self.advance();
            let right = self.parse_addition()?;
            left = self.binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_addition(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_multiplication()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplication()?;
            left = self.binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_multiplication(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        if self.check(&TokenKind::Bang) {
            let start = self.start();
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Not {
                operand: Box::new(operand),
                span: self.span_from(start),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek_kind() {
                // invocation: expr(args…)
                TokenKind::LParen => {
                    let start = expr.span().start;
                    self.advance();
                    let mut args = Vec::new();
                    while !self.check(&TokenKind::RParen) && !self.check(&TokenKind::Eof) {
                        args.push(self.parse_expr()?);
                        if !self.matches(&TokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect(TokenKind::RParen)?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        span: self.span_from(start),
                    };
                }

                // index: expr[i]
                TokenKind::LBracket => {
                    let start = expr.span().start;
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                        span: self.span_from(start),
                    };
                }

                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let tok = self.peek().clone();
        let start = tok.span.start;

        match tok.kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::Int(n, tok.span))
            }
            TokenKind::Bool(b) => {
                self.advance();
                Ok(Expr::Bool(b, tok.span))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Str(s, tok.span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Variable(name, tok.span))
            }

            // parenthesized expression — grouping only, unwrapped here
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            // array literal
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                while !self.check(&TokenKind::RBracket) && !self.check(&TokenKind::Eof) {
                    items.push(self.parse_expr()?);
                    if !self.matches(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::Array(items, self.span_from(start)))
            }

            // dict literal
            TokenKind::LBrace => {
                self.advance();
                let mut pairs = Vec::new();
                while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
                    let key = self.parse_expr()?;
                    self.expect(TokenKind::Colon)?;
                    let value = self.parse_expr()?;
                    pairs.push((key, value));
                    if !self.matches(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace)?;
                Ok(Expr::Dict(pairs, self.span_from(start)))
            }

            TokenKind::Fn => self.parse_fn_literal(),

            other => Err(SyntaxError::UnexpectedToken {
                expected: "expression".into(),
                found: other.to_string(),
                pos: start,
            }),
        }
    }

    fn parse_fn_literal(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.start();
        self.expect(TokenKind::Fn)?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.check(&TokenKind::Eof) {
            params.push(self.expect_ident()?);
            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = self.span_from(start);
        let free = free_names(&params, &body);
        Ok(Expr::Function(
            Rc::new(FnDecl {
                params,
                body,
                free_names: free,
                span,
            }),
            span,
        ))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn binary(&self, left: Expr, op: BinOp, right: Expr) -> Expr {
        let span = Span::new(left.span().start, right.span().end);
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span,
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// True when the current token is an identifier directly followed by
    /// a plain `=` — the start of a reassignment statement.
    fn next_is_assign(&self) -> bool {
        matches!(
            self.tokens.get(self.pos + 1).map(|t| &t.kind),
            Some(TokenKind::Assign)
        )
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(SyntaxError::UnexpectedToken {
                expected: kind.to_string(),
                found: self.peek_kind().to_string(),
                pos: self.peek().span.start,
            })
        }
    }

    fn expect_ident(&mut self) -> Result<String, SyntaxError> {
        if let TokenKind::Ident(name) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(SyntaxError::UnexpectedToken {
                expected: "identifier".into(),
                found: self.peek_kind().to_string(),
                pos: self.peek().span.start,
            })
        }
    }

    fn start(&self) -> Pos {
        self.peek().span.start
    }

    fn prev_end(&self) -> Pos {
        if self.pos == 0 {
            Pos::default()
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    fn span_from(&self, start: Pos) -> Span {
        Span::new(start, self.prev_end())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    fn parse_one(src: &str) -> Stmt {
        let mut program = parse(src).expect("parse failed");
        assert_eq!(program.stmts.len(), 1, "expected one statement");
        program.stmts.remove(0)
    }

    #[test]
    fn let_statement() {
        match parse_one("let a = 0;") {
            Stmt::Let { name, value, .. } => {
                assert_eq!(name, "a");
                assert!(matches!(value, Expr::Int(0, _)));
            }
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn assignment_statement() {
        match parse_one("a = a + 2;") {
            Stmt::Assign { name, .. } => assert_eq!(name, "a"),
            other => panic!("expected assign, got {other:?}"),
        }
    }

    #[test]
    fn call_statement() {
        match parse_one("puts(1);") {
            Stmt::Expr(Expr::Call { args, .. }) => assert_eq!(args.len(), 1),
            other => panic!("expected call statement, got {other:?}"),
        }
    }

    #[test]
    fn non_call_statement_rejected_mid_block() {
        let errs = parse("1 + 2; puts(3);").unwrap_err();
        assert!(matches!(errs[0], SyntaxError::ExpressionNotACall { .. }));
    }

    #[test]
    fn trailing_expression_becomes_return() {
        match parse_one("1 + 2") {
            Stmt::Return { value: Some(_), .. } => {}
            other => panic!("expected return sugar, got {other:?}"),
        }
    }

    #[test]
    fn tail_non_call_with_semicolon_becomes_return() {
        // A final indexing statement still evaluates (and can fail) at
        // runtime.
        let program = parse("let a = [1, 2]; a[5];").unwrap();
        assert!(matches!(
            program.stmts[1],
            Stmt::Return { value: Some(Expr::Index { .. }), .. }
        ));
    }

    #[test]
    fn tail_call_with_semicolon_stays_a_statement() {
        // `assert(x);` at the end of a program must stay void-allowed.
        let program = parse("assert(true);").unwrap();
        assert!(matches!(program.stmts[0], Stmt::Expr(Expr::Call { .. })));
    }

    #[test]
    fn precedence_mul_over_add() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        match parse_one("let x = 1 + 2 * 3;") {
            Stmt::Let {
                value: Expr::Binary { op, right, .. },
                ..
            } => {
                assert_eq!(op, BinOp::Add);
                assert!(matches!(
                    *right,
                    Expr::Binary { op: BinOp::Mul, .. }
                ));
            }
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn parens_regroup() {
        // (a + 1) * 3 parses as (a + 1) * 3
        match parse_one("let x = (a + 1) * 3;") {
            Stmt::Let {
                value: Expr::Binary { op, left, .. },
                ..
            } => {
                assert_eq!(op, BinOp::Mul);
                assert!(matches!(*left, Expr::Binary { op: BinOp::Add, .. }));
            }
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn comparison_binds_looser_than_addition() {
        match parse_one("let x = a + 1 < b;") {
            Stmt::Let {
                value: Expr::Binary { op, .. },
                ..
            } => assert_eq!(op, BinOp::Lt),
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn if_with_single_statement_branches() {
        match parse_one("if (b) b = false; else b = true;") {
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.stmts.len(), 1);
                assert_eq!(else_branch.expect("else").stmts.len(), 1);
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn if_with_block_branches() {
        match parse_one("if (b) { puts(1); puts(2); }") {
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.stmts.len(), 2);
                assert!(else_branch.is_none());
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn fn_literal_with_trailing_expression() {
        match parse_one("let f = fn(x, y){ x + y };") {
            Stmt::Let {
                value: Expr::Function(decl, _),
                ..
            } => {
                assert_eq!(decl.params, vec!["x", "y"]);
                assert_eq!(decl.body.stmts.len(), 1);
                assert!(matches!(decl.body.stmts[0], Stmt::Return { .. }));
                assert!(decl.free_names.is_empty());
            }
            other => panic!("expected let fn, got {other:?}"),
        }
    }

    #[test]
    fn curried_invocation() {
        match parse_one("let x = mk(\"World\")();") {
            Stmt::Let {
                value: Expr::Call { callee, args, .. },
                ..
            } => {
                assert!(args.is_empty());
                assert!(matches!(*callee, Expr::Call { .. }));
            }
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn array_and_dict_literals() {
        match parse_one("let arr = [6, 9, [], '!'];") {
            Stmt::Let {
                value: Expr::Array(items, _),
                ..
            } => assert_eq!(items.len(), 4),
            other => panic!("expected array let, got {other:?}"),
        }
        match parse_one("let d = {\"a\": 1, \"b\": 2};") {
            Stmt::Let {
                value: Expr::Dict(pairs, _),
                ..
            } => assert_eq!(pairs.len(), 2),
            other => panic!("expected dict let, got {other:?}"),
        }
    }

    #[test]
    fn index_expression() {
        match parse_one("let x = a[5];") {
            Stmt::Let {
                value: Expr::Index { .. },
                ..
            } => {}
            other => panic!("expected index let, got {other:?}"),
        }
    }

    #[test]
    fn bare_return() {
        match parse_one("return;") {
            Stmt::Return { value: None, .. } => {}
            other => panic!("expected return, got {other:?}"),
        }
    }

    #[test]
    fn free_standing_block() {
        match parse_one("{ puts(1); }") {
            Stmt::Block(block) => assert_eq!(block.stmts.len(), 1),
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn reports_multiple_errors() {
        let errs = parse("let = 1; let y 2;").unwrap_err();
        assert!(errs.len() >= 2);
    }

    #[test]
    fn statement_spans_cover_source() {
        match parse_one("let a = 0;") {
            Stmt::Let { span, .. } => {
                assert_eq!(span.start, Pos::new(1, 1));
                assert_eq!(span.end, Pos::new(1, 11));
            }
            other => panic!("expected let, got {other:?}"),
        }
    }
}
