//! runac-lex - lexical analysis for the source language.
//!
//! Converts a source file's bytes into a stream of [`Token`]s. The lexer is
//! total (every input produces a token stream ending in `Eof`) and does not
//! recover from errors: an unterminated string or an unrecognized character
//! reports through the shared `Handler` and ends the process.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{BuiltinName, Token, TokenKind};
