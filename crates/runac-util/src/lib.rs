//! runac-util - shared foundation types for the Runa compiler.
//!
//! Every other crate in the workspace (`runac-lex`, `runac-par`, `runac-sem`,
//! `runac-gen`, `runac-drv`) depends on this one and none of the others, so it
//! carries no knowledge of tokens, grammar, or assembly - only the vocabulary
//! they all need: interned identifiers, source positions, and diagnostics.

mod diagnostic;
mod span;
mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::{SourceFile, SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
