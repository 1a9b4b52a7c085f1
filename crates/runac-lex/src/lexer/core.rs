//! Core lexer implementation: the `Lexer` struct and `next_token` dispatch.

use runac_util::{Handler, Level, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for the source language.
///
/// Transforms source text into a stream of [`Token`]s. Whitespace and `#`
/// comments are skipped transparently; everything else becomes exactly one
/// token per call to [`Lexer::next_token`].
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) handler: &'a Handler,
    pub(crate) token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    fn start_span(&self) -> Span {
        Span::new(self.token_start, self.token_start_line, self.token_start_column)
    }

    /// Returns the next token. Idempotent at end of input: once the cursor
    /// reaches the end, every subsequent call returns `Eof`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::new(TokenKind::Eof, None, self.start_span());
        }

        let span = self.start_span();
        match self.cursor.current() {
            b':' => self.single(TokenKind::Colon),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b'.' => self.single(TokenKind::Dot),
            b',' => self.single(TokenKind::Comma),
            b'|' => self.single(TokenKind::Pipe),
            b'"' => self.lex_string(),
            c if c.is_ascii_digit() => self.lex_integer(),
            c if c.is_ascii_alphabetic() || c == b'_' => self.lex_word(),
            c => {
                self.cursor.advance();
                self.handler.fatal(
                    Level::LexerError,
                    format!("unexpected character '{}'", c as char),
                    Some(span),
                );
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let span = self.start_span();
        self.cursor.advance();
        Token::new(kind, None, span)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | b'\n' => self.cursor.advance(),
                b'#' => self.skip_comment(),
                _ => break,
            }
        }
    }

    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    pub fn column(&self) -> u32 {
        self.cursor.column()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, &handler);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok.kind == TokenKind::Eof {
                break;
            }
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn eof_is_idempotent() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("", &handler);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            tokens(": ( ) [ ] . , |"),
            vec![
                TokenKind::Colon,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Dot,
                TokenKind::Comma,
                TokenKind::Pipe,
            ]
        );
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(tokens("Let  x\tbe\n42"), tokens("Let x be 42"));
    }

    #[test]
    fn comment_erasure() {
        assert_eq!(tokens("Let x be 1 # a comment\n"), tokens("Let x be 1\n"));
    }

    #[test]
    fn comment_at_eof_with_no_trailing_newline() {
        assert_eq!(tokens("Let x be 1 # trailing"), tokens("Let x be 1"));
    }
}
