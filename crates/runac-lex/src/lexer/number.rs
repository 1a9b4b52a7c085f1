//! Integer literal lexing.
//!
//! The source language has one numeric form: a run of decimal digits.

use runac_util::Symbol;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_integer(&mut self) -> Token {
        let span_start = self.token_start;
        let line = self.line();
        let column = self.column();

        while self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }

        let bytes = self.cursor.slice_from(span_start);
        let digits = std::str::from_utf8(bytes).expect("digit run is ASCII");

        Token::new(
            TokenKind::Integer,
            Some(Symbol::intern(digits)),
            runac_util::Span::new(span_start, line, column),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runac_util::Handler;

    fn lex_one(source: &str) -> Token {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, &handler);
        lexer.next_token()
    }

    #[test]
    fn single_digit() {
        let tok = lex_one("7");
        assert_eq!(tok.kind, TokenKind::Integer);
        assert_eq!(tok.lexeme, Some(Symbol::intern("7")));
    }

    #[test]
    fn multi_digit_run() {
        let tok = lex_one("120394");
        assert_eq!(tok.lexeme, Some(Symbol::intern("120394")));
    }

    #[test]
    fn stops_at_non_digit() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("42 plus", &handler);
        let first = lexer.next_token();
        assert_eq!(first.lexeme, Some(Symbol::intern("42")));
        assert_eq!(lexer.next_token().kind, TokenKind::Plus);
    }
}
