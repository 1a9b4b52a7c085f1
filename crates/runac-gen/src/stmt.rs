//! Statement lowering (§4.4 "Control flow", "Set lowering", "Inline
//! assembly").

use runac_par::{Binding, Expr, InlineAssembly, MatchCase, Stmt, TypeRef};
use runac_util::Level;

use crate::codegen::CodeGen;
use crate::locals::inferred_let_type;

impl<'a> CodeGen<'a> {
    pub(crate) fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let { name, expr } => self.emit_let(*name, expr),
            Stmt::Set { target, value } => self.emit_set(target, value),
            Stmt::Return(expr) => self.emit_return(expr),
            Stmt::If {
                condition,
                then_body,
                else_body,
            } => self.emit_if(condition, then_body, else_body),
            Stmt::While { condition, body } => self.emit_while(condition, body),
            Stmt::Break => self.emit_break(),
            Stmt::Continue => self.emit_continue(),
            Stmt::Print(expr) => self.emit_print(expr),
            Stmt::Match { scrutinee, cases } => self.emit_match(scrutinee, cases),
            Stmt::ExpressionStmt(expr) => self.emit_expr(expr),
            Stmt::InlineAssembly(asm) => self.emit_inline_assembly(asm),
        }
    }

    /// `Let v be <expr>` infers `v`'s type from the RHS shape (§4.3): a bare
    /// type name triggers zero-initialized struct allocation sized to the
    /// full type, a builtin call's return type is looked up, everything
    /// else defaults to `Integer`. Only the `TypeName` case skips evaluating
    /// `expr` as an rvalue — `emit_expr` would reject it outright.
    fn emit_let(&mut self, name: runac_util::Symbol, expr: &Expr) {
        if let Expr::TypeName(type_name) = expr {
            let size = self
                .types
                .layout(*type_name)
                .map(|l| l.size())
                .unwrap_or_else(|| {
                    self.handler.fatal(
                        Level::CodegenError,
                        format!("unknown type '{}'", type_name.as_str()),
                        None,
                    )
                });
            let offset = self
                .func
                .declare(name, TypeRef::Named(*type_name), size, false);
            let mut chunk = 0u64;
            while chunk < size {
                self.emit(format!("    movq $0, -{}(%rbp)", offset - chunk));
                chunk += 8;
            }
            return;
        }

        let builtin_kind = match expr {
            Expr::BuiltinCall { kind, .. } => Some(*kind),
            _ => None,
        };
        let type_ref = inferred_let_type(builtin_kind);
        self.emit_expr(expr);
        let offset = self.func.declare(name, type_ref, 8, false);
        self.emit(format!("    movq %rax, -{offset}(%rbp)"));
    }

    fn emit_set(&mut self, target: &Expr, value: &Expr) {
        self.emit_expr(value);
        self.emit("    pushq %rax");
        self.emit_lvalue(target);
        self.emit("    popq %rax");
        self.emit("    movq %rax, (%rbx)");
    }

    fn emit_return(&mut self, expr: &Expr) {
        self.emit_expr(expr);
        self.emit_epilogue();
    }

    pub(crate) fn emit_epilogue(&mut self) {
        self.emit("    movq %rbp, %rsp");
        self.emit("    popq %rbp");
        self.emit("    ret");
    }

    fn emit_if(&mut self, condition: &Expr, then_body: &[Stmt], else_body: &[Stmt]) {
        let k = self.fresh_id();
        let else_label = format!(".L{k}_else");
        let end_label = format!(".L{k}_end");
        self.emit_expr(condition);
        self.emit("    testq %rax, %rax");
        self.emit(format!("    jz {else_label}"));
        for stmt in then_body {
            self.emit_stmt(stmt);
        }
        self.emit(format!("    jmp {end_label}"));
        self.emit_label(&else_label);
        for stmt in else_body {
            self.emit_stmt(stmt);
        }
        self.emit_label(&end_label);
    }

    fn emit_while(&mut self, condition: &Expr, body: &[Stmt]) {
        let k = self.fresh_id();
        let loop_label = format!(".L{k}_loop");
        let end_label = format!(".L{k}_end");
        self.func.loop_stack.push((loop_label.clone(), end_label.clone()));
        self.emit_label(&loop_label);
        self.emit_expr(condition);
        self.emit("    testq %rax, %rax");
        self.emit(format!("    jz {end_label}"));
        for stmt in body {
            self.emit_stmt(stmt);
        }
        self.emit(format!("    jmp {loop_label}"));
        self.emit_label(&end_label);
        self.func.loop_stack.pop();
    }

    fn emit_break(&mut self) {
        let end_label = self
            .func
            .loop_stack
            .last()
            .map(|(_, end)| end.clone())
            .unwrap_or_else(|| self.handler.fatal(Level::CodegenError, "'Break' outside a loop", None));
        self.emit(format!("    jmp {end_label}"));
    }

    fn emit_continue(&mut self) {
        let loop_label = self
            .func
            .loop_stack
            .last()
            .map(|(loop_label, _)| loop_label.clone())
            .unwrap_or_else(|| self.handler.fatal(Level::CodegenError, "'Continue' outside a loop", None));
        self.emit(format!("    jmp {loop_label}"));
    }

    fn emit_print(&mut self, expr: &Expr) {
        let is_string = self.is_string_typed(expr);
        self.emit_expr(expr);
        self.emit("    movq %rax, %rdi");
        if is_string {
            self.emit("    call print_string");
        } else {
            self.emit("    call print_integer");
        }
    }

    /// `Match` keeps the scrutinee pointer on the stack for the whole
    /// statement, peeking it (pop-then-push) at the top of every case
    /// rather than re-evaluating the scrutinee expression (§4.4).
    fn emit_match(&mut self, scrutinee: &Expr, cases: &[MatchCase]) {
        let k = self.fresh_id();
        let end_label = format!(".match_end_{k}");
        self.emit_expr(scrutinee);
        self.emit("    pushq %rax");
        for (i, case) in cases.iter().enumerate() {
            self.emit_label(format!(".match_case_{k}_{i}"));
            self.emit("    popq %rax");
            self.emit("    pushq %rax");
            self.emit("    movq (%rax), %rdx");
            let tag = self.variant_tag(case.variant_name);
            self.emit(format!("    cmpq ${tag}, %rdx"));
            let next_label = if i + 1 < cases.len() {
                format!(".match_case_{k}_{}", i + 1)
            } else {
                end_label.clone()
            };
            self.emit(format!("    jne {next_label}"));

            let mark = self.func.enter_scope();
            for Binding { field_name, local_name } in &case.bindings {
                let offset_in_variant = self.variant_field_offset(case.variant_name, *field_name);
                let slot = self.func.declare(*local_name, TypeRef::Integer, 8, false);
                self.emit(format!("    movq {offset_in_variant}(%rax), %rax"));
                self.emit(format!("    movq %rax, -{slot}(%rbp)"));
                self.emit("    movq (%rsp), %rax");
            }
            for stmt in &case.body {
                self.emit_stmt(stmt);
            }
            self.func.leave_scope(mark);
            self.emit(format!("    jmp {end_label}"));
        }
        self.emit_label(&end_label);
        self.emit("    popq %rax");
    }

    fn variant_tag(&self, variant_name: runac_util::Symbol) -> i64 {
        let owner = self.types.variant_owner(variant_name).unwrap_or_else(|| {
            self.handler.fatal(
                Level::CodegenError,
                format!("'{}' is not a known variant", variant_name.as_str()),
                None,
            )
        });
        self.types
            .layout(owner)
            .and_then(|l| l.variant(variant_name))
            .map(|v| v.tag)
            .expect("variant_owner guarantees the variant resolves")
    }

    fn variant_field_offset(&self, variant_name: runac_util::Symbol, field_name: runac_util::Symbol) -> u64 {
        let owner = self.types.variant_owner(variant_name).unwrap_or_else(|| {
            self.handler.fatal(
                Level::CodegenError,
                format!("'{}' is not a known variant", variant_name.as_str()),
                None,
            )
        });
        self.types
            .layout(owner)
            .and_then(|l| l.variant(variant_name))
            .and_then(|v| v.field(field_name))
            .unwrap_or_else(|| {
                self.handler.fatal(
                    Level::CodegenError,
                    format!(
                        "variant '{}' has no field '{}'",
                        variant_name.as_str(),
                        field_name.as_str()
                    ),
                    None,
                )
            })
            .offset
    }

    fn emit_inline_assembly(&mut self, asm: &InlineAssembly) {
        for line in &asm.lines {
            self.emit(format!("    {}", expand_escapes(line)));
        }
    }
}

/// Strips literal `\n` escape sequences (multi-line asm within one string
/// is disallowed) and expands `\t`/`\\` (§4.4 "Inline assembly").
fn expand_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n') => {
                    chars.next();
                }
                Some('t') => {
                    chars.next();
                    out.push('\t');
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}
