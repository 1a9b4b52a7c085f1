//! Struct and tagged-union layout: field/variant offsets and sizes.
//!
//! Grounded on the governing spec's §3.4 field-layout law: fields (or
//! variant payload fields) are laid out in declaration order with no
//! padding, so `offset(f_k) = Σ_{i<k} size(f_i)`. Every value in this
//! language occupies a full 8-byte slot (§4.4 treats `Integer`, `String`,
//! `Character`, and every pointer-like type uniformly as a 64-bit quantity
//! moved through `%rax`), so in practice every `size` below is 8 and every
//! offset is a multiple of 8 — the arithmetic is kept general rather than
//! hardcoded to that constant so a struct containing another struct still
//! lays out correctly.

use runac_par::TypeRef;
use runac_util::Symbol;

/// Every value in this language is a 64-bit quantity: an integer, a
/// character, or a pointer (string, list, struct/variant, function,
/// array base address). Nothing in the surface grammar introduces a
/// narrower or wider scalar.
pub const SLOT_SIZE: u64 = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: Symbol,
    pub type_ref: TypeRef,
    pub offset: u64,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantLayout {
    pub name: Symbol,
    pub tag: i64,
    pub fields: Vec<FieldLayout>,
}

impl VariantLayout {
    pub fn field(&self, name: Symbol) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeLayout {
    /// Declaration-order fields, no padding; `size` is the sum of field
    /// sizes (§3.4 "Struct body").
    Struct { fields: Vec<FieldLayout>, size: u64 },
    /// An 8-byte tag at offset 0, then fields at 8, 16, 24, … (§3.4 "Variant
    /// body"). `size` is `max` over variants of `8 + Σ field sizes`, at
    /// least 8 so an empty-payload variant (`| Dog`, no fields) still
    /// allocates a tag word.
    Variant { variants: Vec<VariantLayout>, size: u64 },
}

impl TypeLayout {
    pub fn size(&self) -> u64 {
        match self {
            TypeLayout::Struct { size, .. } => *size,
            TypeLayout::Variant { size, .. } => *size,
        }
    }

    pub fn struct_field(&self, name: Symbol) -> Option<&FieldLayout> {
        match self {
            TypeLayout::Struct { fields, .. } => fields.iter().find(|f| f.name == name),
            TypeLayout::Variant { .. } => None,
        }
    }

    pub fn variant(&self, name: Symbol) -> Option<&VariantLayout> {
        match self {
            TypeLayout::Variant { variants, .. } => variants.iter().find(|v| v.name == name),
            TypeLayout::Struct { .. } => None,
        }
    }

    pub fn is_variant(&self) -> bool {
        matches!(self, TypeLayout::Variant { .. })
    }
}

/// Lays out a struct's fields in declaration order with no padding.
pub fn layout_struct(fields: &[(Symbol, TypeRef)], size_of: impl Fn(&TypeRef) -> u64) -> TypeLayout {
    let mut offset = 0u64;
    let mut laid_out = Vec::with_capacity(fields.len());
    for (name, type_ref) in fields {
        let size = size_of(type_ref);
        laid_out.push(FieldLayout {
            name: *name,
            type_ref: type_ref.clone(),
            offset,
            size,
        });
        offset += size;
    }
    TypeLayout::Struct {
        fields: laid_out,
        size: offset,
    }
}

/// Lays out a tagged union: tag at offset 0, then each variant's own
/// fields independently at 8, 16, 24, … Variants do not share a payload
/// layout with one another beyond the common tag slot.
pub fn layout_variant(
    variants: &[(Symbol, Vec<(Symbol, TypeRef)>)],
    size_of: impl Fn(&TypeRef) -> u64,
) -> TypeLayout {
    let mut laid_out = Vec::with_capacity(variants.len());
    let mut max_size = SLOT_SIZE;
    for (tag, (name, fields)) in variants.iter().enumerate() {
        let mut offset = SLOT_SIZE;
        let mut field_layouts = Vec::with_capacity(fields.len());
        for (fname, type_ref) in fields {
            let size = size_of(type_ref);
            field_layouts.push(FieldLayout {
                name: *fname,
                type_ref: type_ref.clone(),
                offset,
                size,
            });
            offset += size;
        }
        max_size = max_size.max(offset);
        laid_out.push(VariantLayout {
            name: *name,
            tag: tag as i64,
            fields: field_layouts,
        });
    }
    TypeLayout::Variant {
        variants: laid_out,
        size: max_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_fields_lay_out_with_no_padding() {
        let fields = vec![
            (Symbol::intern("x"), TypeRef::Integer),
            (Symbol::intern("y"), TypeRef::Integer),
        ];
        let layout = layout_struct(&fields, |_| SLOT_SIZE);
        match layout {
            TypeLayout::Struct { fields, size } => {
                assert_eq!(fields[0].offset, 0);
                assert_eq!(fields[1].offset, 8);
                assert_eq!(size, 16);
            }
            _ => panic!("expected struct layout"),
        }
    }

    #[test]
    fn variant_tags_assigned_by_declaration_order() {
        let variants = vec![
            (Symbol::intern("Circle"), vec![(Symbol::intern("radius"), TypeRef::Integer)]),
            (Symbol::intern("Square"), vec![(Symbol::intern("side"), TypeRef::Integer)]),
        ];
        let layout = layout_variant(&variants, |_| SLOT_SIZE);
        match layout {
            TypeLayout::Variant { variants, size } => {
                assert_eq!(variants[0].tag, 0);
                assert_eq!(variants[1].tag, 1);
                assert_eq!(variants[0].fields[0].offset, 8);
                assert_eq!(size, 16);
            }
            _ => panic!("expected variant layout"),
        }
    }

    #[test]
    fn empty_payload_variant_is_just_the_tag() {
        let variants = vec![(Symbol::intern("Dog"), vec![])];
        let layout = layout_variant(&variants, |_| SLOT_SIZE);
        assert_eq!(layout.size(), SLOT_SIZE);
    }

    #[test]
    fn variant_size_is_max_across_variants() {
        let variants = vec![
            (Symbol::intern("A"), vec![(Symbol::intern("a"), TypeRef::Integer)]),
            (
                Symbol::intern("B"),
                vec![
                    (Symbol::intern("b1"), TypeRef::Integer),
                    (Symbol::intern("b2"), TypeRef::Integer),
                ],
            ),
        ];
        let layout = layout_variant(&variants, |_| SLOT_SIZE);
        assert_eq!(layout.size(), 24);
    }
}
