//! Diagnostics.
//!
//! The compiler never recovers from an error: the first one seen by any
//! stage prints a message and ends the process with exit status 1. This
//! mirrors the C bootstrap compiler's behavior (§7 of the governing spec)
//! rather than a typical Rust crate's `Result`-propagate-to-`main` style,
//! because downstream stages (parser, generator) are written assuming a
//! token/AST that already passed validation - there is nothing sensible to
//! do with a malformed one except stop.
//!
//! Warnings are the one non-fatal case: they are printed and compilation
//! continues, matching the bootstrap compiler's `[CODEGEN WARNING]` lines.

use crate::span::Span;
use std::cell::RefCell;
use std::fmt;

/// Which pipeline stage raised a diagnostic. Used only to pick the message
/// prefix; it carries no other behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    LexerError,
    ParserError,
    CodegenError,
    CodegenWarning,
}

impl Level {
    fn prefix(self) -> &'static str {
        match self {
            Level::LexerError => "[LEXER ERROR]",
            Level::ParserError => "[PARSER ERROR]",
            Level::CodegenError => "[CODEGEN ERROR]",
            Level::CodegenWarning => "[CODEGEN WARNING]",
        }
    }

    fn is_fatal(self) -> bool {
        !matches!(self, Level::CodegenWarning)
    }
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Option<Span>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(
                f,
                "{} {} (line {}, column {})",
                self.level.prefix(),
                self.message,
                span.line,
                span.column
            ),
            None => write!(f, "{} {}", self.level.prefix(), self.message),
        }
    }
}

/// Collects diagnostics and enforces the "first error is fatal" policy.
///
/// `Handler` is handed by shared `&` reference down through the lexer,
/// parser, and generator so every stage can report through the same sink
/// without any one of them needing exclusive access; `runac-drv` owns the
/// only instance for a given run. Warnings accumulate behind a `RefCell`
/// rather than requiring `&mut self` for exactly that reason - `fatal`
/// already never returns, so only `warn` needs interior mutability at all.
#[derive(Default)]
pub struct Handler {
    warnings: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a fatal diagnostic and terminate the process with exit code 1.
    /// Never returns - every call site that reports an error is a dead end,
    /// which is why lexer/parser/codegen routines can call this instead of
    /// returning a `Result` they'd just have to unwrap anyway.
    pub fn fatal(&self, level: Level, message: impl Into<String>, span: Option<Span>) -> ! {
        debug_assert!(level.is_fatal());
        let diag = Diagnostic {
            level,
            message: message.into(),
            span,
        };
        eprintln!("{diag}");
        std::process::exit(1);
    }

    pub fn warn(&self, message: impl Into<String>, span: Option<Span>) {
        let diag = Diagnostic {
            level: Level::CodegenWarning,
            message: message.into(),
            span,
        };
        eprintln!("{diag}");
        self.warnings.borrow_mut().push(diag);
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_prefix_and_location() {
        let diag = Diagnostic {
            level: Level::ParserError,
            message: "expected ':'".to_string(),
            span: Some(Span::new(0, 4, 10)),
        };
        assert_eq!(
            diag.to_string(),
            "[PARSER ERROR] expected ':' (line 4, column 10)"
        );
    }

    #[test]
    fn formats_without_location() {
        let diag = Diagnostic {
            level: Level::CodegenWarning,
            message: "function falls off the end without Return".to_string(),
            span: None,
        };
        assert_eq!(
            diag.to_string(),
            "[CODEGEN WARNING] function falls off the end without Return"
        );
    }

    #[test]
    fn warnings_accumulate_without_exiting() {
        let handler = Handler::new();
        handler.warn("unused variable 'x'", None);
        handler.warn("unused variable 'y'", None);
        assert_eq!(handler.warning_count(), 2);
    }
}
