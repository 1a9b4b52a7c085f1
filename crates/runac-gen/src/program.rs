//! Top-level assembly: section ordering, globals, the inlined print
//! helpers, and the synthesized `main` (§4.4 "Output").

use runac_par::Expr;
use runac_util::Level;

use crate::codegen::CodeGen;
use crate::function::first_function_name;

impl<'a> CodeGen<'a> {
    /// Walks the whole program and returns the finished assembly text.
    pub fn generate(mut self) -> String {
        if !self.program.imports.is_empty() {
            self.emit("# Imports:");
            for import in &self.program.imports {
                self.emit(format!(
                    "#   {} as {}",
                    import.filename.as_str(),
                    import.alias.as_str()
                ));
            }
        }

        let program = self.program;
        for function in &program.functions {
            self.emit_function(function);
        }

        let has_main = self
            .function_names
            .iter()
            .any(|name| name.as_str() == "main");
        if !has_main {
            self.emit_synthesized_main();
        }

        self.assemble()
    }

    fn emit_synthesized_main(&mut self) {
        self.emit(".globl main");
        self.emit_label("main");
        match first_function_name(&self.program.functions) {
            Some(name) => {
                self.emit(format!("    call {name}"));
            }
            None => {
                self.emit("    movq $0, %rax");
            }
        }
        self.emit("    movq %rax, %rdi");
        self.emit("    movq $60, %rax");
        self.emit("    syscall");
    }

    fn emit_globals(&self, data: &mut String, bss: &mut String) {
        for global in &self.program.globals {
            match &global.initial_value {
                Some(Expr::Integer(n)) => {
                    data.push_str(&format!("{}:\n", global.name.as_str()));
                    data.push_str(&format!("    .quad {n}\n"));
                }
                Some(_) => self.handler.fatal(
                    Level::CodegenError,
                    format!(
                        "global '{}' must be initialized with a constant integer literal",
                        global.name.as_str()
                    ),
                    Some(global.span),
                ),
                None => {
                    bss.push_str(&format!("{}:\n", global.name.as_str()));
                    bss.push_str("    .zero 8\n");
                }
            }
        }
    }

    /// Assembles the buffered `.text` body together with the now-complete
    /// string pool and global sections into the final six-section file
    /// (§4.4 "Output").
    fn assemble(&mut self) -> String {
        let mut data = String::new();
        let mut bss = String::new();
        self.emit_globals(&mut data, &mut bss);

        let mut out = String::new();
        out.push_str(".section .rodata\n");
        self.pool.emit(&mut out);
        out.push_str(".section .data\n");
        out.push_str(&data);
        out.push_str(".section .bss\n");
        out.push_str(&bss);
        out.push_str(".text\n");
        out.push_str(PRINT_HELPERS);
        out.push_str(&self.body);
        out.push_str(".section .note.GNU-stack,\"\",@progbits\n");
        out
    }
}

/// `print_string`/`print_integer`, inlined at the top of every output file
/// rather than called as external symbols (§4.4 "Print helpers"). Both
/// issue the `write` syscall directly and append the pooled `.newline`.
const PRINT_HELPERS: &str = r#"print_string:
    pushq %rbx
    movq %rdi, %rbx
    movq %rdi, %rax
.Lprint_string_strlen:
    cmpb $0, (%rax)
    je .Lprint_string_strlen_done
    incq %rax
    jmp .Lprint_string_strlen
.Lprint_string_strlen_done:
    subq %rbx, %rax
    movq %rax, %rdx
    movq %rbx, %rsi
    movq $1, %rdi
    movq $1, %rax
    syscall
    leaq .newline(%rip), %rsi
    movq $1, %rdx
    movq $1, %rdi
    movq $1, %rax
    syscall
    popq %rbx
    ret

print_integer:
    pushq %rbx
    pushq %r12
    pushq %r13
    movq %rdi, %r12
    movq $0, %r13
    testq %r12, %r12
    jns .Lprint_integer_unsigned
    movq $1, %r13
    negq %r12
.Lprint_integer_unsigned:
    subq $32, %rsp
    leaq 31(%rsp), %rbx
    movq %r12, %rax
    movq $10, %rcx
    xorq %r8, %r8
.Lprint_integer_digit_loop:
    xorq %rdx, %rdx
    divq %rcx
    addb $48, %dl
    decq %rbx
    movb %dl, (%rbx)
    incq %r8
    testq %rax, %rax
    jnz .Lprint_integer_digit_loop
    testq %r13, %r13
    jz .Lprint_integer_write
    decq %rbx
    movb $45, (%rbx)
    incq %r8
.Lprint_integer_write:
    movq %rbx, %rsi
    movq %r8, %rdx
    movq $1, %rdi
    movq $1, %rax
    syscall
    leaq .newline(%rip), %rsi
    movq $1, %rdx
    movq $1, %rdi
    movq $1, %rax
    syscall
    addq $32, %rsp
    popq %r13
    popq %r12
    popq %rbx
    ret

"#;
