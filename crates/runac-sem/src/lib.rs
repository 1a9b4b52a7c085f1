//! runac-sem - the type table.
//!
//! Computes struct and tagged-union layouts (field/variant offsets and
//! sizes, §3.4 of the governing spec) and collects function/global
//! signatures from a parsed [`runac_par::Program`], once, before code
//! generation begins. This is deliberately *not* a full semantic-analysis
//! pass: the source language's invariants (identifier resolution, field
//! membership, match exhaustiveness against a variant's declared cases) are
//! checked lazily at codegen time against this table, matching §1's
//! framing of the pipeline as a strict three-stage pull chain with no
//! separate semantic-analysis stage of its own — `runac-sem` supplies the
//! one piece of precomputed, cross-function state codegen needs (layouts)
//! rather than re-deriving it from the AST on every use.

mod layout;
mod table;

pub use layout::{FieldLayout, TypeLayout, VariantLayout, SLOT_SIZE};
pub use table::{FunctionSignature, TypeTable};
