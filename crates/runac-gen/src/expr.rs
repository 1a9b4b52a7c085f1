//! Expression lowering. Every expression leaves its result in `%rax`
//! (§4.4 "Expression lowering").

use runac_par::{BinOp, CmpOp, Expr, TypeRef};
use runac_util::Level;

use crate::builtin;
use crate::codegen::CodeGen;

impl<'a> CodeGen<'a> {
    pub(crate) fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Integer(n) => self.emit(format!("    movq ${n}, %rax")),
            Expr::Variable(name) => self.emit_variable_read(*name),
            Expr::StringLiteral(text) => {
                let label = self.pool.intern(text.as_str());
                self.emit(format!("    leaq {label}(%rip), %rax"));
            }
            Expr::Binary { left, op, right } => self.emit_binary(left, *op, right),
            Expr::Comparison { left, op, right } => self.emit_comparison(left, *op, right),
            Expr::FunctionCall { name, args } => {
                let kind = self.call_kind(*name);
                self.emit_call(name.as_str(), args, kind);
            }
            Expr::BuiltinCall { kind, args } => self.emit_builtin_call(*kind, args),
            Expr::FieldAccess { object, field } => self.emit_field_access(object, *field),
            Expr::ArrayIndex { array, index } => self.emit_array_index(array, index),
            Expr::TypeName(_) => {
                self.handler.fatal(
                    Level::CodegenError,
                    "a type name may only appear as the right-hand side of 'Let'",
                    None,
                );
            }
            Expr::VariantConstructor {
                type_name,
                variant_name,
                fields,
            } => self.emit_variant_constructor(*type_name, *variant_name, fields),
            Expr::FunctionPointer(name) => {
                self.emit(format!("    leaq {name}(%rip), %rax"));
            }
        }
    }

    fn emit_variable_read(&mut self, name: runac_util::Symbol) {
        if let Some(local) = self.func.find(name) {
            let loc = local.stack_operand();
            let is_array = matches!(local.type_ref, TypeRef::Array(_));
            if is_array {
                self.emit(format!("    leaq {loc}, %rax"));
            } else {
                self.emit(format!("    movq {loc}, %rax"));
            }
            return;
        }
        if self.types.global_type(name).is_some() {
            self.emit(format!("    movq {name}(%rip), %rax"));
            return;
        }
        if self.is_user_function(name) {
            self.emit(format!("    leaq {name}(%rip), %rax"));
            return;
        }
        self.handler.fatal(
            Level::CodegenError,
            format!("unknown identifier '{}'", name.as_str()),
            None,
        );
    }

    fn emit_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) {
        self.emit_expr(left);
        self.emit("    pushq %rax");
        self.emit_expr(right);
        self.emit("    popq %rbx");
        // Invariant after this point: %rbx holds the left operand, %rax the
        // right operand — exactly the orientation subtraction, division,
        // and modulo need (§4.4 "swap as needed so the dividend/minuend is
        // %rbx").
        match op {
            BinOp::Plus => self.emit("    addq %rbx, %rax"),
            BinOp::Minus => {
                self.emit("    subq %rax, %rbx");
                self.emit("    movq %rbx, %rax");
            }
            BinOp::Multiplied => self.emit("    imulq %rbx, %rax"),
            BinOp::Divided => self.emit_div_or_mod(false),
            BinOp::Modulo => self.emit_div_or_mod(true),
            BinOp::BitAnd => self.emit("    andq %rbx, %rax"),
            BinOp::BitOr => self.emit("    orq %rbx, %rax"),
            BinOp::BitXor => self.emit("    xorq %rbx, %rax"),
            BinOp::Shl => {
                self.emit("    movq %rax, %rcx");
                self.emit("    movq %rbx, %rax");
                self.emit("    salq %cl, %rax");
            }
            BinOp::Shr => {
                self.emit("    movq %rax, %rcx");
                self.emit("    movq %rbx, %rax");
                self.emit("    sarq %cl, %rax");
            }
        }
    }

    /// Shared division/modulo lowering. `%rbx` holds the dividend (left),
    /// `%rax` the divisor (right) on entry. Division/modulo by zero yields
    /// 0 rather than trapping (§8.1 universal property 9).
    fn emit_div_or_mod(&mut self, is_mod: bool) {
        let id = self.fresh_id();
        let (zero_label, done_label) = if is_mod {
            (format!(".Lmod_by_zero_{id}"), format!(".Lmod_done_{id}"))
        } else {
            (format!(".Ldiv_by_zero_{id}"), format!(".Ldiv_done_{id}"))
        };
        self.emit("    movq %rax, %rcx");
        self.emit("    movq %rbx, %rax");
        self.emit("    testq %rcx, %rcx");
        self.emit(format!("    jz {zero_label}"));
        self.emit("    cqto");
        self.emit("    idivq %rcx");
        if is_mod {
            self.emit("    movq %rdx, %rax");
        }
        self.emit(format!("    jmp {done_label}"));
        self.emit_label(&zero_label);
        self.emit("    movq $0, %rax");
        self.emit_label(&done_label);
    }

    fn emit_comparison(&mut self, left: &Expr, op: CmpOp, right: &Expr) {
        self.emit_expr(left);
        self.emit("    pushq %rax");
        self.emit_expr(right);
        self.emit("    popq %rbx");
        self.emit("    cmpq %rax, %rbx");
        let set = match op {
            CmpOp::Eq => "sete",
            CmpOp::Ne => "setne",
            CmpOp::Lt => "setl",
            CmpOp::Le => "setle",
            CmpOp::Gt => "setg",
            CmpOp::Ge => "setge",
        };
        self.emit(format!("    {set} %al"));
        self.emit("    movzbq %al, %rax");
    }

    fn emit_field_access(&mut self, object: &Expr, field: runac_util::Symbol) {
        let object_type = self.static_type(object);
        let type_name = match object_type {
            TypeRef::Named(name) if self.types.layout(name).map(|l| !l.is_variant()).unwrap_or(false) => name,
            _ => self.handler.fatal(
                Level::CodegenError,
                "field access requires an explicitly struct-typed receiver",
                None,
            ),
        };
        let layout = self.types.layout(type_name).expect("type resolved above");
        let field_layout = layout.struct_field(field).unwrap_or_else(|| {
            self.handler.fatal(
                Level::CodegenError,
                format!("type '{}' has no field '{}'", type_name.as_str(), field.as_str()),
                None,
            )
        });
        let offset = field_layout.offset;
        self.emit_lvalue(object);
        self.emit("    movq %rbx, %rax");
        self.emit(format!("    movq {offset}(%rax), %rax"));
    }

    fn emit_array_index(&mut self, array: &Expr, index: &Expr) {
        self.emit_expr(index);
        self.emit("    pushq %rax");
        self.emit_array_base(array, "%rdi");
        self.emit("    popq %rax");
        self.emit("    imulq $8, %rax");
        self.emit("    addq %rdi, %rax");
        self.emit("    movq (%rax), %rax");
    }

    /// Loads an array's base address into `reg`: a parameter's value is
    /// already the pointer the caller passed; a local array decays to its
    /// own stack slot's address.
    pub(crate) fn emit_array_base(&mut self, array: &Expr, reg: &str) {
        match array {
            Expr::Variable(name) => {
                if let Some(local) = self.func.find(*name) {
                    let loc = local.stack_operand();
                    if local.is_parameter {
                        self.emit(format!("    movq {loc}, {reg}"));
                    } else {
                        self.emit(format!("    leaq {loc}, {reg}"));
                    }
                } else {
                    self.emit(format!("    movq {name}(%rip), {reg}"));
                }
            }
            other => {
                self.emit_expr(other);
                if reg != "%rax" {
                    self.emit(format!("    movq %rax, {reg}"));
                }
            }
        }
    }

    fn emit_variant_constructor(
        &mut self,
        type_name: runac_util::Symbol,
        variant_name: runac_util::Symbol,
        fields: &[(runac_util::Symbol, Expr)],
    ) {
        let layout = self.types.layout(type_name).unwrap_or_else(|| {
            self.handler
                .fatal(Level::CodegenError, format!("unknown type '{}'", type_name.as_str()), None)
        });
        let variant = layout.variant(variant_name).unwrap_or_else(|| {
            self.handler.fatal(
                Level::CodegenError,
                format!("'{}' is not a variant of '{}'", variant_name.as_str(), type_name.as_str()),
                None,
            )
        });
        let tag = variant.tag;
        let size = layout.size();
        self.emit(format!("    movq ${size}, %rdi"));
        self.emit("    call malloc");
        self.emit("    pushq %rax");
        self.emit(format!("    movq ${tag}, (%rax)"));
        for (field_name, value) in fields {
            let offset = variant.field(*field_name).unwrap_or_else(|| {
                self.handler.fatal(
                    Level::CodegenError,
                    format!(
                        "variant '{}' has no field '{}'",
                        variant_name.as_str(),
                        field_name.as_str()
                    ),
                    None,
                )
            }).offset;
            self.emit_expr(value);
            self.emit("    movq %rax, %rdx");
            self.emit("    movq (%rsp), %rdi");
            self.emit(format!("    movq %rdx, {offset}(%rdi)"));
        }
        self.emit("    popq %rax");
    }

    /// Whether `name` denotes a user function, a local function-pointer
    /// variable, or an external runtime symbol — decides direct vs.
    /// indirect call and the `@PLT` suffix (§4.4 `FunctionCall`).
    fn call_kind(&self, name: runac_util::Symbol) -> CallKind {
        if self.is_user_function(name) {
            CallKind::Direct
        } else if self.func.is_local(name) {
            CallKind::Indirect
        } else {
            CallKind::ExternalPlt
        }
    }

    pub(crate) fn emit_call(&mut self, symbol: &str, args: &[Expr], kind: CallKind) {
        let n = args.len();
        for arg in args {
            self.emit_expr(arg);
            self.emit("    pushq %rax");
        }
        let reg_count = n.min(6);
        for j in 0..reg_count {
            let depth = (n - 1 - j) as i64 * 8;
            self.emit(format!("    movq {depth}(%rsp), {}", crate::codegen::ARG_REGS[j]));
        }
        let mut extra = 0i64;
        if n > 6 {
            for j in (6..n).rev() {
                let off = (n as i64 - 1 - j as i64) * 8 + 8 * extra;
                self.emit(format!("    movq {off}(%rsp), %rax"));
                self.emit("    pushq %rax");
                extra += 1;
            }
        }
        match kind {
            CallKind::Direct => self.emit(format!("    call {symbol}")),
            CallKind::ExternalPlt => self.emit(format!("    call {symbol}@PLT")),
            CallKind::Indirect => {
                // `symbol` names a local function-pointer variable; load it
                // fresh since the register file above may have clobbered
                // whatever previously held its value.
                self.emit_variable_read(runac_util::Symbol::intern(symbol));
                self.emit("    movq %rax, %r10");
                self.emit("    call *%r10");
            }
        }
        let cleanup = n as i64 * 8 + extra * 8;
        if cleanup > 0 {
            self.emit(format!("    addq ${cleanup}, %rsp"));
        }
    }

    fn emit_builtin_call(&mut self, kind: runac_lex::BuiltinName, args: &[Expr]) {
        if kind == runac_lex::BuiltinName::GetCommandLineArgs {
            self.emit_get_command_line_args();
            return;
        }
        let symbol = builtin::abi_symbol(kind);
        self.emit_call(symbol, args, CallKind::ExternalPlt);
    }

    /// `get_command_line_args()` has no single ABI symbol (§6.3 only
    /// exposes `get_command_line_arg_count`/`get_command_line_arg`
    /// individually) — see `builtin::abi_symbol`'s doc comment and
    /// DESIGN.md. Lowered as an inline loop building a `List*` from the two
    /// per-argument primitives.
    fn emit_get_command_line_args(&mut self) {
        let id = self.fresh_id();
        let loop_label = format!(".Lclargs_loop_{id}");
        let end_label = format!(".Lclargs_end_{id}");
        self.emit("    call get_command_line_arg_count@PLT");
        self.emit("    pushq %rax"); // [count]
        self.emit("    call list_create@PLT");
        self.emit("    pushq %rax"); // [count, list]
        self.emit("    movq $0, %rbx"); // loop index
        self.emit_label(&loop_label);
        self.emit("    movq 8(%rsp), %rax"); // count
        self.emit("    cmpq %rax, %rbx");
        self.emit(format!("    jge {end_label}"));
        self.emit("    movq %rbx, %rdi");
        self.emit("    call get_command_line_arg@PLT");
        self.emit("    movq %rax, %rsi");
        self.emit("    movq (%rsp), %rdi"); // list
        self.emit("    pushq %rbx");
        self.emit("    call list_append@PLT");
        self.emit("    popq %rbx");
        self.emit("    incq %rbx");
        self.emit(format!("    jmp {loop_label}"));
        self.emit_label(&end_label);
        self.emit("    popq %rax"); // list into result
        self.emit("    addq $8, %rsp"); // drop count
    }

    /// The static type of an expression, used for `Let`-inference (§4.3),
    /// `Print` dispatch, and field-access receiver validation (§4.4).
    pub(crate) fn static_type(&self, expr: &Expr) -> TypeRef {
        match expr {
            Expr::Integer(_) => TypeRef::Integer,
            Expr::Variable(name) => self
                .func
                .find(*name)
                .map(|l| l.type_ref.clone())
                .or_else(|| self.types.global_type(*name).cloned())
                .unwrap_or(TypeRef::Integer),
            Expr::StringLiteral(_) => TypeRef::String,
            Expr::Binary { .. } | Expr::Comparison { .. } => TypeRef::Integer,
            Expr::FunctionCall { name, .. } => self
                .types
                .function(*name)
                .map(|sig| sig.return_type.clone())
                .unwrap_or(TypeRef::Integer),
            Expr::BuiltinCall { kind, .. } => builtin::return_type(*kind),
            Expr::FieldAccess { object, field } => {
                let object_type = self.static_type(object);
                if let TypeRef::Named(name) = object_type {
                    if let Some(layout) = self.types.layout(name) {
                        if let Some(f) = layout.struct_field(*field) {
                            return f.type_ref.clone();
                        }
                    }
                }
                TypeRef::Integer
            }
            Expr::ArrayIndex { array, .. } => match self.static_type(array) {
                TypeRef::Array(elem) => *elem,
                _ => TypeRef::Integer,
            },
            Expr::TypeName(name) => TypeRef::Named(*name),
            Expr::VariantConstructor { type_name, .. } => TypeRef::Named(*type_name),
            Expr::FunctionPointer(_) => TypeRef::Integer,
        }
    }

    pub(crate) fn is_string_typed(&self, expr: &Expr) -> bool {
        matches!(self.static_type(expr), TypeRef::String)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CallKind {
    Direct,
    Indirect,
    ExternalPlt,
}
