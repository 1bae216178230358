//! Single-pass lexer for evaluation snippets.

use crate::error::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Equals,
    /// Statement separator: newline or `;`.
    Sep,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source, for carving statement text.
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn tokenize(source: &str) -> Result<Vec<Token>, EvalError> {
        let mut lexer = Lexer {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        };
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn token(&self, kind: TokenKind, offset: usize, line: usize, col: usize) -> Token {
        Token { kind, offset, line, col }
    }

    fn next_token(&mut self) -> Result<Token, EvalError> {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.advance();
        }

        let (offset, line, col) = (self.pos, self.line, self.col);
        let Some(ch) = self.peek() else {
            return Ok(self.token(TokenKind::Eof, offset, line, col));
        };

        let kind = match ch {
            b'\n' | b';' => {
                self.advance();
                TokenKind::Sep
            }
            b'+' => {
                self.advance();
                TokenKind::Plus
            }
            b'-' => {
                self.advance();
                TokenKind::Minus
            }
            b'*' => {
                self.advance();
                TokenKind::Star
            }
            b'/' => {
                self.advance();
                TokenKind::Slash
            }
            b'(' => {
                self.advance();
                TokenKind::LParen
            }
            b')' => {
                self.advance();
                TokenKind::RParen
            }
            b'=' => {
                self.advance();
                TokenKind::Equals
            }
            b'0'..=b'9' | b'.' => self.number(line, col)?,
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.ident(),
            other => {
                return Err(EvalError::syntax(
                    format!("unexpected character '{}'", other as char),
                    line,
                    col,
                ));
            }
        };
        Ok(self.token(kind, offset, line, col))
    }

    fn number(&mut self, line: usize, col: usize) -> Result<TokenKind, EvalError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9' | b'.')) {
            self.advance();
        }
        // Exponent suffix, e.g. 1.5e-3
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.advance();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.advance();
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.advance();
            }
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| EvalError::syntax(format!("malformed number '{text}'"), line, col))
    }

    fn ident(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')) {
            self.advance();
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        TokenKind::Ident(text.to_string())
    }
}
