//! Word lexing: identifiers, keywords, type names, word-operators, and
//! builtin function names all share one scan (letters/digits/underscores)
//! and are disambiguated afterward by table lookup.

use runac_util::Symbol;

use crate::token::{keyword_from_word, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_word(&mut self) -> Token {
        let span_start = self.token_start;
        let line = self.line();
        let column = self.column();

        while {
            let c = self.cursor.current();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.cursor.advance();
        }

        let bytes = self.cursor.slice_from(span_start);
        let word = std::str::from_utf8(bytes).expect("grammar words are ASCII");

        let span = runac_util::Span::new(span_start, line, column);
        match keyword_from_word(word) {
            Some(kind) => Token::new(kind, Some(Symbol::intern(word)), span),
            None => Token::new(TokenKind::Identifier, Some(Symbol::intern(word)), span),
        }
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
    fn plain_identifier() {
        let tok = lex_one("radius");
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.lexeme, Some(Symbol::intern("radius")));
    }

    #[test]
    fn identifier_with_digits_and_underscore() {
        let tok = lex_one("point_2d");
        assert_eq!(tok.kind, TokenKind::Identifier);
    }

    #[test]
    fn keyword_wins_over_identifier() {
        assert_eq!(lex_one("Process").kind, TokenKind::Process);
        assert_eq!(lex_one("Return").kind, TokenKind::Return);
    }

    #[test]
    fn builtin_name_is_its_own_kind() {
        use crate::token::BuiltinName;
        assert_eq!(
            lex_one("list_length").kind,
            TokenKind::Builtin(BuiltinName::ListLength)
        );
    }
}
