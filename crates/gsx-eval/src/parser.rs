//! Recursive descent parser for evaluation snippets.
//!
//! A snippet is a sequence of statements separated by newlines or
//! semicolons; a statement is either `name = expr` or a bare
//! expression. Each parsed statement keeps its source text so the
//! engine can report a meaningful trace frame.

use crate::error::EvalError;
use crate::lexer::{Lexer, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(String),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Assign { name: String, expr: Expr },
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    /// Trimmed source text, used for trace frames.
    pub text: String,
}

pub fn parse_snippet(source: &str) -> Result<Vec<Stmt>, EvalError> {
    let tokens = Lexer::tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        source,
    };
    parser.snippet()
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'a str,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn at_sep_or_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Sep | TokenKind::Eof)
    }

    fn snippet(&mut self) -> Result<Vec<Stmt>, EvalError> {
        let mut stmts = Vec::new();
        loop {
            while self.peek().kind == TokenKind::Sep {
                self.advance();
            }
            if self.peek().kind == TokenKind::Eof {
                break;
            }
            stmts.push(self.statement()?);
            if !self.at_sep_or_eof() {
                let tok = self.peek();
                return Err(EvalError::syntax(
                    "expected end of statement",
                    tok.line,
                    tok.col,
                ));
            }
        }
        Ok(stmts)
    }

    fn statement(&mut self) -> Result<Stmt, EvalError> {
        let start = self.peek().offset;

        // Lookahead for `ident =`: an assignment, as long as the next
        // token is not part of an expression comparison (there is no
        // `==` in this language, so a single `=` suffices).
        let kind = if let TokenKind::Ident(name) = self.peek().kind.clone() {
            if self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::Equals) {
                self.advance();
                self.advance();
                let expr = self.expression()?;
                StmtKind::Assign { name, expr }
            } else {
                StmtKind::Expr(self.expression()?)
            }
        } else {
            StmtKind::Expr(self.expression()?)
        };

        let end = self.peek().offset;
        let text = self.source[start..end.max(start)].trim().to_string();
        Ok(Stmt { kind, text })
    }

    fn expression(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, EvalError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Number(value) => Ok(Expr::Number(value)),
            TokenKind::Ident(name) => Ok(Expr::Var(name)),
            TokenKind::Minus => Ok(Expr::Neg(Box::new(self.factor()?))),
            TokenKind::LParen => {
                let inner = self.expression()?;
                let close = self.advance();
                if close.kind != TokenKind::RParen {
                    return Err(EvalError::syntax("expected ')'", close.line, close.col));
                }
                Ok(inner)
            }
            TokenKind::Eof | TokenKind::Sep => {
                Err(EvalError::syntax("unexpected end of expression", tok.line, tok.col))
            }
            other => Err(EvalError::syntax(
                format!("unexpected token {other:?}"),
                tok.line,
                tok.col,
            )),
        }
    }
}
