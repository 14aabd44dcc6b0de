//! Lexer for Bramble source text

use crate::error::SyntaxError;

use super::ast::{Pos, Span};
use super::token::{keyword_or_ident, Token, TokenKind};

/// Byte-oriented lexer tracking line and column positions.
pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input.
    ///
    /// Collects every error rather than stopping at the first, so a
    /// single run reports all lexical problems.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<SyntaxError>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_trivia();

            if self.is_at_end() {
                let here = self.here();
                tokens.push(Token::new(TokenKind::Eof, Span::new(here, here)));
                break;
            }

            match self.next_token() {
                Ok(tok) => tokens.push(tok),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(errors)
        }
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let start = self.here();
        let ch = self.advance();

        let kind = match ch {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b':' => TokenKind::Colon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,

            b'=' => {
                if self.peek() == b'=' {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            b'!' => {
                if self.peek() == b'=' {
                    self.advance();
                    TokenKind::BangEq
                } else {
                    TokenKind::Bang
                }
            }
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b'&' => {
                if self.peek() == b'&' {
                    self.advance();
                    TokenKind::AndAnd
                } else {
                    return Err(SyntaxError::UnexpectedCharacter { ch: '&', pos: start });
                }
            }
            b'|' => {
                if self.peek() == b'|' {
                    self.advance();
                    TokenKind::OrOr
                } else {
                    return Err(SyntaxError::UnexpectedCharacter { ch: '|', pos: start });
                }
            }

            quote @ (b'"' | b'\'') => TokenKind::Str(self.read_string(quote, start)?),
            b'0'..=b'9' => TokenKind::Int(self.read_int(ch, start)?),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => keyword_or_ident(self.read_ident(ch)),

            other => {
                return Err(SyntaxError::UnexpectedCharacter {
                    ch: other as char,
                    pos: start,
                });
            }
        };

        Ok(Token::new(kind, Span::new(start, self.here())))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn here(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.source[self.pos]
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Skips whitespace and `//` comments.
    fn skip_trivia(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.advance();
                }
                b'/' if self.pos + 1 < self.source.len()
                    && self.source[self.pos + 1] == b'/' =>
                {
                    while !self.is_at_end() && self.peek() != b'\n' {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    fn read_string(&mut self, quote: u8, start: Pos) -> Result<String, SyntaxError> {
        let mut s = String::new();
        let mut error: Option<SyntaxError> = None;
        loop {
            if self.is_at_end() || self.peek() == b'\n' {
                return Err(SyntaxError::UnterminatedString { pos: start });
            }
            let ch = self.advance();
            if ch == quote {
                break;
            }
            if ch == b'\\' {
                let esc_pos = self.here();
                let escaped = self.advance();
                match escaped {
                    b'n' => s.push('\n'),
                    b't' => s.push('\t'),
                    b'\\' => s.push('\\'),
                    _ if escaped == quote => s.push(quote as char),
                    other => {
                        // Record the first escape error but keep consuming so we
                        // don't cascade errors from the remainder of the string.
                        if error.is_none() {
                            error = Some(SyntaxError::UnknownEscape {
                                ch: other as char,
                                pos: esc_pos,
                            });
                        }
                    }
                }
            } else {
                s.push(ch as char);
            }
        }
        if let Some(e) = error {
            return Err(e);
        }
        Ok(s)
    }

    fn read_int(&mut self, first: u8, start: Pos) -> Result<i64, SyntaxError> {
        let mut s = String::new();
        s.push(first as char);
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance() as char);
        }
        s.parse()
            .map_err(|_| SyntaxError::IntegerOutOfRange { pos: start })
    }

    fn read_ident(&mut self, first: u8) -> String {
        let mut s = String::new();
        s.push(first as char);
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
            s.push(self.advance() as char);
        }
        s
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
