//! Comment skipping.
//!
//! The source language has one comment form: `#` to end of line.

use crate::Lexer;

impl<'a> Lexer<'a> {
    pub(super) fn skip_comment(&mut self) {
        self.cursor.advance(); // '#'
        while !self.cursor.is_at_end() && self.cursor.current() != b'\n' {
            self.cursor.advance();
        }
    }
}
