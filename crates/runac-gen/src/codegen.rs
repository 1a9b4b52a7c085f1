//! The [`CodeGen`] struct shared by every emission module in this crate.
//!
//! Mirrors the governing spec's description of generator state (§3.4
//! "Lifecycle", §5): a string pool, a monotonic label counter, and — while
//! walking one function's body — that function's variable table and loop
//! label stack. All of it is reset at the start of each function except the
//! pool and label counter, which persist for the whole `generate` call.

use runac_par::Program;
use runac_util::{FxHashSet, Handler, Symbol};
use runac_sem::TypeTable;

use crate::labels::LabelCounter;
use crate::locals::FunctionState;
use crate::pool::StringPool;

/// The first six integer/pointer argument registers, in order (§4.4
/// "Calling convention"). Shared by call-site argument loading and
/// function-prologue parameter storing so the two always agree.
pub(crate) const ARG_REGS: [&str; 6] = ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"];

pub struct CodeGen<'a> {
    pub(crate) program: &'a Program,
    pub(crate) types: &'a TypeTable,
    pub(crate) handler: &'a Handler,
    pub(crate) pool: StringPool,
    pub(crate) labels: LabelCounter,
    /// Buffered `.text` body: every user function plus the synthesized
    /// `main` (if any), in emission order. Kept separate from the final
    /// assembled output because the `.rodata` section (which must appear
    /// *before* `.text`) is only fully known once every function has been
    /// walked and every string literal interned.
    pub(crate) body: String,
    pub(crate) func: FunctionState,
    pub(crate) function_names: FxHashSet<Symbol>,
}

impl<'a> CodeGen<'a> {
    pub fn new(program: &'a Program, types: &'a TypeTable, handler: &'a Handler) -> Self {
        let function_names = program.functions.iter().map(|f| f.name).collect();
        Self {
            program,
            types,
            handler,
            pool: StringPool::new(),
            labels: LabelCounter::new(),
            body: String::new(),
            func: FunctionState::new(),
            function_names,
        }
    }

    pub(crate) fn emit(&mut self, line: impl AsRef<str>) {
        self.body.push_str(line.as_ref());
        self.body.push('\n');
    }

    pub(crate) fn emit_label(&mut self, label: impl AsRef<str>) {
        self.body.push_str(label.as_ref());
        self.body.push_str(":\n");
    }

    pub(crate) fn fresh_id(&mut self) -> u64 {
        self.labels.fresh()
    }

    pub(crate) fn is_user_function(&self, name: Symbol) -> bool {
        self.function_names.contains(&name)
    }
}
