//! String literal lexing.
//!
//! Double-quoted, no escape interpretation: bytes between the quotes are
//! copied through verbatim (even a literal newline), matching the archived
//! lexer's `lexer_read_string_literal`. Only a missing closing quote before
//! end of input is an error.

use runac_util::{Level, Span, Symbol};

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_string(&mut self) -> Token {
        let span_start = self.token_start;
        let line = self.line();
        let column = self.column();
        let span = Span::new(span_start, line, column);

        self.cursor.advance(); // opening quote
        let content_start = self.cursor.position();

        while !self.cursor.is_at_end() && self.cursor.current() != b'"' {
            self.cursor.advance();
        }

        if self.cursor.is_at_end() {
            self.handler.fatal(
                Level::LexerError,
                "unterminated string literal",
                Some(span),
            );
        }

        let bytes = self.cursor.slice_from(content_start);
        let text = String::from_utf8_lossy(bytes).into_owned();
        self.cursor.advance(); // closing quote

        Token::new(TokenKind::StringLiteral, Some(Symbol::intern(&text)), span)
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
    fn simple_string() {
        let tok = lex_one("\"Hello, world!\"");
        assert_eq!(tok.kind, TokenKind::StringLiteral);
        assert_eq!(tok.lexeme, Some(Symbol::intern("Hello, world!")));
    }

    #[test]
    fn empty_string() {
        let tok = lex_one("\"\"");
        assert_eq!(tok.lexeme, Some(Symbol::intern("")));
    }

    #[test]
    fn backslash_is_preserved_verbatim() {
        let tok = lex_one("\"a\\nb\"");
        assert_eq!(tok.lexeme, Some(Symbol::intern("a\\nb")));
    }
}
