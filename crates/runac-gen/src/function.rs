//! Function prologue/epilogue and parameter loading (§4.4 "Function
//! prologue", "Calling convention").

use runac_par::Function;
use runac_util::Symbol;

use crate::codegen::{CodeGen, ARG_REGS};
use crate::locals::FunctionState;

impl<'a> CodeGen<'a> {
    pub(crate) fn emit_function(&mut self, function: &Function) {
        self.func = FunctionState::new();
        self.emit(format!(".globl {}", function.name));
        self.emit_label(function.name.as_str());
        self.emit("    pushq %rbp");
        self.emit("    movq %rsp, %rbp");

        let is_main_entry = function.name.as_str() == "main" && function.params.len() == 2;
        if is_main_entry {
            self.emit("    pushq %rdi");
            self.emit("    pushq %rsi");
            self.emit("    call runtime_set_command_line_args@PLT");
            self.emit("    popq %rsi");
            self.emit("    popq %rdi");
        }

        self.emit("    subq $2048, %rsp");

        let register_params = function.params.len().min(6);
        for (i, param) in function.params.iter().take(register_params).enumerate() {
            let offset = self.func.declare(param.name, param.type_ref.clone(), 8, true);
            self.emit(format!("    movq {}, -{offset}(%rbp)", ARG_REGS[i]));
        }
        for (i, param) in function.params.iter().enumerate().skip(6) {
            let positive_offset = 16 + 8 * (i as u64 - 6);
            self.func
                .declare_stack_param(param.name, param.type_ref.clone(), positive_offset);
        }

        for stmt in &function.body {
            self.emit_stmt(stmt);
        }

        if !matches!(function.body.last(), Some(runac_par::Stmt::Return(_))) {
            self.handler.warn(
                format!(
                    "function '{}' falls off the end without a final 'Return'",
                    function.name.as_str()
                ),
                Some(function.span),
            );
        }
    }
}

/// The function the synthesized `main` calls when the program defines no
/// function literally named `main` (§4.4 item 5).
pub(crate) fn first_function_name(functions: &[Function]) -> Option<Symbol> {
    functions.first().map(|f| f.name)
}
