//! runac-par - recursive-descent parser for the source language.
//!
//! One token of look-ahead, no backtracking. Every non-terminal is a method
//! on [`Parser`] that consumes tokens and returns an owned AST node; a
//! mismatched token is always fatal (this pipeline has no error recovery —
//! the first syntax error ends the process).
//!
//! The parser pre-scans the full token stream once, before parsing begins,
//! to build a table of declared type names and tagged-union variant names
//! (see `parser::collect_type_info`). This resolves a forward-reference
//! problem the grammar itself can't: `Circle with radius as 5` must parse as
//! a variant constructor even if `Type Shape is | Circle ...` appears later
//! in the same file, and `Let v be Customer` must parse `Customer` as a
//! type name rather than a variable read under the same condition.
//!
//! Arithmetic and bitwise operators fold left-to-right with no precedence
//! levels between them — this is not an oversight, it's what the archived
//! grammar specifies, and downstream tests pin the shape.

mod ast;
mod expr;
mod items;
mod parser;
mod stmt;

pub use ast::*;
pub use parser::Parser;
