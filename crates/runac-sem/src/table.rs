//! The type table: computed struct/variant layouts plus function and
//! global-variable signatures, built once from a parsed [`Program`] and
//! handed by reference to the code generator.
//!
//! This is "Component 4" of the governing spec's pipeline table — a small,
//! standalone piece of the overall design, kept out of both the parser (the
//! parser never resolves a named type to its fields; it only needs to know
//! *that* a name is a type, which it tracks itself — see `runac-par`'s
//! variant/type prescan) and the generator (which should not have to
//! recompute field offsets from scratch on every `FieldAccess`). Design note
//! "Cyclic structure risk" in the spec calls out exactly this split: the
//! generator holds an immutable `&TypeTable` rather than walking back into
//! the AST for type information.

use runac_par::{Program, TypeDefKind, TypeRef};
use runac_util::{FxHashMap, Handler, Level, Span, Symbol};

use crate::layout::{layout_struct, layout_variant, TypeLayout, SLOT_SIZE};

/// A function's signature, as declared at its definition.
#[derive(Clone, Debug)]
pub struct FunctionSignature {
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
}

/// The fully-resolved type universe of one compilation: every declared
/// struct/variant's layout, every function's signature, and every global
/// variable's declared type.
pub struct TypeTable {
    layouts: FxHashMap<Symbol, TypeLayout>,
    functions: FxHashMap<Symbol, FunctionSignature>,
    globals: FxHashMap<Symbol, TypeRef>,
}

impl TypeTable {
    /// Builds the table from a parsed program. Fatal (via `handler`) if a
    /// field, parameter, or global names an undeclared type — the
    /// generator's invariant 2 ("every `FieldAccess`'s object type is a
    /// struct whose field list contains the named field") can only hold if
    /// every named type in the program actually resolves to a declared
    /// struct or variant.
    pub fn from_program(program: &Program, handler: &Handler) -> Self {
        let mut raw_structs: FxHashMap<Symbol, Vec<(Symbol, TypeRef)>> = FxHashMap::default();
        let mut raw_variants: FxHashMap<Symbol, Vec<(Symbol, Vec<(Symbol, TypeRef)>)>> =
            FxHashMap::default();
        for def in &program.types {
            match &def.kind {
                TypeDefKind::Struct { fields } => {
                    raw_structs.insert(
                        def.name,
                        fields.iter().map(|f| (f.name, f.type_ref.clone())).collect(),
                    );
                }
                TypeDefKind::Variant { variants } => {
                    raw_variants.insert(
                        def.name,
                        variants
                            .iter()
                            .map(|v| {
                                (
                                    v.name,
                                    v.fields.iter().map(|f| (f.name, f.type_ref.clone())).collect(),
                                )
                            })
                            .collect(),
                    );
                }
            }
        }

        let mut table = TypeTable {
            layouts: FxHashMap::default(),
            functions: FxHashMap::default(),
            globals: FxHashMap::default(),
        };

        let mut in_progress: Vec<Symbol> = Vec::new();
        for def in &program.types {
            table.resolve(def.name, &raw_structs, &raw_variants, &mut in_progress, handler, def.span);
        }

        for func in &program.functions {
            table.functions.insert(
                func.name,
                FunctionSignature {
                    params: func.params.iter().map(|p| p.type_ref.clone()).collect(),
                    return_type: func.return_type.clone(),
                },
            );
        }

        for global in &program.globals {
            table.globals.insert(global.name, global.type_ref.clone());
        }

        table
    }

    fn resolve(
        &mut self,
        name: Symbol,
        raw_structs: &FxHashMap<Symbol, Vec<(Symbol, TypeRef)>>,
        raw_variants: &FxHashMap<Symbol, Vec<(Symbol, Vec<(Symbol, TypeRef)>)>>,
        in_progress: &mut Vec<Symbol>,
        handler: &Handler,
        span: Span,
    ) -> u64 {
        if let Some(layout) = self.layouts.get(&name) {
            return layout.size();
        }
        if in_progress.contains(&name) {
            handler.fatal(
                Level::CodegenError,
                format!("type '{}' is defined in terms of itself", name.as_str()),
                Some(span),
            );
        }
        in_progress.push(name);

        let layout = if let Some(fields) = raw_structs.get(&name) {
            let fields = fields.clone();
            layout_struct(&fields, |ty| {
                self.size_of_type_ref(ty, raw_structs, raw_variants, in_progress, handler, span)
            })
        } else if let Some(variants) = raw_variants.get(&name) {
            let variants = variants.clone();
            layout_variant(&variants, |ty| {
                self.size_of_type_ref(ty, raw_structs, raw_variants, in_progress, handler, span)
            })
        } else {
            handler.fatal(
                Level::CodegenError,
                format!("unknown type '{}'", name.as_str()),
                Some(span),
            );
        };

        in_progress.pop();
        let size = layout.size();
        self.layouts.insert(name, layout);
        size
    }

    /// The size in bytes of a type reference. `Integer`, `String`,
    /// `Character`, `Pointer of T`, and `array of T` are all a single
    /// 8-byte slot — the first three because every scalar in this language
    /// is a 64-bit quantity, the latter two because pointers and arrays
    /// (which decay to their base address, §4.4) are addresses. A named
    /// type's size is the size of its struct or variant layout, computed
    /// (and memoized) on first reference regardless of declaration order.
    fn size_of_type_ref(
        &mut self,
        type_ref: &TypeRef,
        raw_structs: &FxHashMap<Symbol, Vec<(Symbol, TypeRef)>>,
        raw_variants: &FxHashMap<Symbol, Vec<(Symbol, Vec<(Symbol, TypeRef)>)>>,
        in_progress: &mut Vec<Symbol>,
        handler: &Handler,
        span: Span,
    ) -> u64 {
        match type_ref {
            TypeRef::Integer | TypeRef::String | TypeRef::Character => SLOT_SIZE,
            TypeRef::Array(_) | TypeRef::Pointer(_) => SLOT_SIZE,
            TypeRef::Named(name) => self.resolve(*name, raw_structs, raw_variants, in_progress, handler, span),
        }
    }

    pub fn layout(&self, name: Symbol) -> Option<&TypeLayout> {
        self.layouts.get(&name)
    }

    pub fn size_of(&self, type_ref: &TypeRef) -> u64 {
        match type_ref {
            TypeRef::Integer | TypeRef::String | TypeRef::Character => SLOT_SIZE,
            TypeRef::Array(_) | TypeRef::Pointer(_) => SLOT_SIZE,
            TypeRef::Named(name) => self.layouts.get(name).map(|l| l.size()).unwrap_or(SLOT_SIZE),
        }
    }

    pub fn function(&self, name: Symbol) -> Option<&FunctionSignature> {
        self.functions.get(&name)
    }

    pub fn global_type(&self, name: Symbol) -> Option<&TypeRef> {
        self.globals.get(&name)
    }

    pub fn is_function(&self, name: Symbol) -> bool {
        self.functions.contains_key(&name)
    }

    pub fn is_type(&self, name: Symbol) -> bool {
        self.layouts.contains_key(&name)
    }

    /// The declared type name that owns a given variant, if `name` is one.
    pub fn variant_owner(&self, variant: Symbol) -> Option<Symbol> {
        self.layouts.iter().find_map(|(type_name, layout)| {
            layout.variant(variant).map(|_| *type_name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runac_util::Handler;

    fn table_for(source: &str) -> TypeTable {
        let handler = Handler::new();
        let mut parser = runac_par::Parser::new(source, &handler);
        let program = parser.parse_program();
        TypeTable::from_program(&program, &handler)
    }

    #[test]
    fn struct_layout_is_available_by_name() {
        let table = table_for("Type called \"Point\":\n  x as Integer,\n  y as Integer\nEnd Type");
        let layout = table.layout(Symbol::intern("Point")).unwrap();
        assert_eq!(layout.size(), 16);
        assert_eq!(layout.struct_field(Symbol::intern("y")).unwrap().offset, 8);
    }

    #[test]
    fn variant_layout_assigns_tags_in_order() {
        let table = table_for(
            "Type Shape is | Circle with radius as Integer | Square with side as Integer",
        );
        let layout = table.layout(Symbol::intern("Shape")).unwrap();
        assert!(layout.is_variant());
        assert_eq!(layout.variant(Symbol::intern("Square")).unwrap().tag, 1);
    }

    #[test]
    fn nested_struct_field_counts_the_inner_struct_size() {
        let table = table_for(
            "Type called \"Point\":\n  x as Integer,\n  y as Integer\nEnd Type\n\
             Type called \"Line\":\n  start as Point,\n  end as Point\nEnd Type",
        );
        let layout = table.layout(Symbol::intern("Line")).unwrap();
        assert_eq!(layout.size(), 32);
        assert_eq!(layout.struct_field(Symbol::intern("end")).unwrap().offset, 16);
    }

    #[test]
    fn function_signature_is_recorded() {
        let table = table_for(
            "Process called \"add\" takes a as Integer, b as Integer returns Integer:\n  Return a plus b\nEnd Process",
        );
        let sig = table.function(Symbol::intern("add")).unwrap();
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.return_type, TypeRef::Integer);
    }

    #[test]
    fn variant_owner_resolves_by_variant_name() {
        let table = table_for("Type Shape is | Circle with radius as Integer");
        assert_eq!(table.variant_owner(Symbol::intern("Circle")), Some(Symbol::intern("Shape")));
    }
}
