//! Per-function variable table and `Let`-type inference (§4.3).
//!
//! Stack offsets are strictly positive multiples of a variable's size,
//! assigned monotonically as the function body is walked — no slot is ever
//! reused, even across the arms of a `Match` (§3.4 invariant 5). Bindings
//! introduced inside a `Match` arm are visible only for that arm's body, so
//! the table is scoped like a stack (`enter_scope`/`leave_scope`) even
//! though the stack *offsets* it hands out never regress.

use runac_lex::BuiltinName;
use runac_par::TypeRef;
use runac_util::Symbol;

use crate::builtin;

#[derive(Clone, Debug)]
pub struct LocalVar {
    pub name: Symbol,
    pub offset: u64,
    pub type_ref: TypeRef,
    pub is_parameter: bool,
    /// `true` for a parameter beyond the 6th, which the caller leaves on
    /// its own stack frame rather than this function copying it into a
    /// negative-offset slot: `offset` is then a *positive* displacement
    /// (16, 24, …) read as `offset(%rbp)` instead of `-offset(%rbp)`
    /// (§4.4 "stack parameters loaded from 16(%rbp), 24(%rbp), …").
    pub on_caller_stack: bool,
}

impl LocalVar {
    /// The `%rbp`-relative operand text for this variable's storage.
    pub fn stack_operand(&self) -> String {
        if self.on_caller_stack {
            format!("{}(%rbp)", self.offset)
        } else {
            format!("-{}(%rbp)", self.offset)
        }
    }
}

/// A single function's worth of generator state: its variable table,
/// current stack-allocation cursor, and (while walking `While`/`Match`) the
/// label stack `Break`/`Continue` resolve against.
pub struct FunctionState {
    vars: Vec<LocalVar>,
    next_offset: u64,
    pub loop_stack: Vec<(String, String)>,
}

impl FunctionState {
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            next_offset: 0,
            loop_stack: Vec::new(),
        }
    }

    /// Reserves a fresh stack slot of `size` bytes for `name` and returns
    /// its offset from `%rbp` (always negative in the emitted `-off(%rbp)`
    /// form, but tracked here as the positive magnitude per §3.4).
    pub fn declare(&mut self, name: Symbol, type_ref: TypeRef, size: u64, is_parameter: bool) -> u64 {
        self.next_offset += size;
        let offset = self.next_offset;
        self.vars.push(LocalVar {
            name,
            offset,
            type_ref,
            is_parameter,
            on_caller_stack: false,
        });
        offset
    }

    /// Registers a parameter the caller passed on the stack (the 7th and
    /// beyond). `positive_offset` is its displacement from `%rbp` — 16 for
    /// the first stack parameter, 24 for the next, and so on. Does not
    /// consume any of this function's own frame space.
    pub fn declare_stack_param(&mut self, name: Symbol, type_ref: TypeRef, positive_offset: u64) {
        self.vars.push(LocalVar {
            name,
            offset: positive_offset,
            type_ref,
            is_parameter: true,
            on_caller_stack: true,
        });
    }

    /// Returns the most recently declared binding with this name — a
    /// `Match` binding shadows an outer variable of the same name for the
    /// extent of its arm, mirroring ordinary lexical shadowing.
    pub fn find(&self, name: Symbol) -> Option<&LocalVar> {
        self.vars.iter().rev().find(|v| v.name == name)
    }

    pub fn is_local(&self, name: Symbol) -> bool {
        self.find(name).is_some()
    }

    /// A snapshot of the current binding count, to be passed to
    /// [`leave_scope`] once a `Match` arm's body has been emitted. Does not
    /// affect `next_offset` — offsets are never reclaimed.
    pub fn enter_scope(&self) -> usize {
        self.vars.len()
    }

    pub fn leave_scope(&mut self, mark: usize) {
        self.vars.truncate(mark);
    }

    pub fn frame_size(&self) -> u64 {
        self.next_offset
    }
}

impl Default for FunctionState {
    fn default() -> Self {
        Self::new()
    }
}

/// The `Let`-inference table from §4.3: a builtin call's return type, or
/// `Integer` for every other RHS shape but a bare type name.
pub fn inferred_let_type(builtin: Option<BuiltinName>) -> TypeRef {
    match builtin {
        Some(kind) => builtin::return_type(kind),
        None => TypeRef::Integer,
    }
}
