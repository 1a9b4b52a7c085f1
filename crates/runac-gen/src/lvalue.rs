//! Lvalue address lowering, used by `Set` and by `expr::emit_field_access`'s
//! object receiver. An lvalue address always ends up in `%rbx` (§4.4
//! "Lvalue address generation"), distinct from the `%rax` convention every
//! rvalue uses.

use runac_par::{Expr, TypeRef};
use runac_util::Level;

use crate::codegen::CodeGen;

impl<'a> CodeGen<'a> {
    /// Computes the address of `expr` into `%rbx`. Only `Variable`,
    /// `FieldAccess`, and `ArrayIndex` are valid lvalues; anything else is a
    /// codegen error (the parser never produces a `Set` whose target is a
    /// non-lvalue, but `emit_field_access` calls this on arbitrary
    /// sub-expressions, so the check still earns its keep here).
    pub(crate) fn emit_lvalue(&mut self, expr: &Expr) {
        match expr {
            Expr::Variable(name) => {
                if let Some(local) = self.func.find(*name) {
                    self.emit(format!("    leaq {}, %rbx", local.stack_operand()));
                } else if self.types.global_type(*name).is_some() {
                    self.emit(format!("    leaq {name}(%rip), %rbx"));
                } else {
                    self.handler.fatal(
                        Level::CodegenError,
                        format!("unknown identifier '{}'", name.as_str()),
                        None,
                    );
                }
            }
            Expr::FieldAccess { object, field } => {
                let object_type = self.static_type(object);
                let type_name = match object_type {
                    TypeRef::Named(name) => name,
                    _ => self.handler.fatal(
                        Level::CodegenError,
                        "field access requires an explicitly struct-typed receiver",
                        None,
                    ),
                };
                let layout = self.types.layout(type_name).unwrap_or_else(|| {
                    self.handler
                        .fatal(Level::CodegenError, format!("unknown type '{}'", type_name.as_str()), None)
                });
                let offset = layout
                    .struct_field(*field)
                    .unwrap_or_else(|| {
                        self.handler.fatal(
                            Level::CodegenError,
                            format!("type '{}' has no field '{}'", type_name.as_str(), field.as_str()),
                            None,
                        )
                    })
                    .offset;
                // The object itself may be a struct stored by value inside
                // another struct (a `Line` holding two `Point`s): its
                // address is the *address* of the outer field, not its
                // dereferenced value, so this recurses through `emit_lvalue`
                // rather than `emit_expr`.
                self.emit_lvalue(object);
                self.emit(format!("    addq ${offset}, %rbx"));
            }
            Expr::ArrayIndex { array, index } => {
                self.emit_array_base(array, "%rbx");
                self.emit("    pushq %rbx");
                self.emit_expr(index);
                self.emit("    popq %rbx");
                self.emit("    imulq $8, %rax");
                self.emit("    addq %rax, %rbx");
            }
            _ => self.handler.fatal(
                Level::CodegenError,
                "expression is not assignable",
                None,
            ),
        }
    }
}
