//! The abstract syntax tree produced by the parser.
//!
//! Every node owns its children directly (`Box`/`Vec`) — there is no arena
//! and no back-references, so ordinary `Drop` glue tears the tree down. See
//! DESIGN.md for why an arena was not worth the indirection here.

use runac_lex::BuiltinName;
use runac_util::{Span, Symbol};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Plus,
    Minus,
    Multiplied,
    Divided,
    Modulo,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A type reference as it appears in source: a parameter's `as Integer`, a
/// field's `as Customer`, a return type, or an array/pointer element type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Integer,
    String,
    Character,
    /// A user-defined struct or variant type, named by identifier.
    Named(Symbol),
    Array(Box<TypeRef>),
    Pointer(Box<TypeRef>),
}

#[derive(Clone, Debug)]
pub enum Expr {
    Integer(i64),
    Variable(Symbol),
    StringLiteral(Symbol),
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Comparison {
        left: Box<Expr>,
        op: CmpOp,
        right: Box<Expr>,
    },
    FunctionCall {
        name: Symbol,
        args: Vec<Expr>,
    },
    BuiltinCall {
        kind: BuiltinName,
        args: Vec<Expr>,
    },
    FieldAccess {
        object: Box<Expr>,
        field: Symbol,
    },
    ArrayIndex {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    /// Only legal as the RHS of a `Let`; triggers zero-initialized
    /// allocation rather than evaluating to a value of its own.
    TypeName(Symbol),
    VariantConstructor {
        type_name: Symbol,
        variant_name: Symbol,
        fields: Vec<(Symbol, Expr)>,
    },
    /// A bare function name used where a callable value is expected.
    FunctionPointer(Symbol),
}

#[derive(Clone, Debug)]
pub struct Binding {
    pub field_name: Symbol,
    pub local_name: Symbol,
}

#[derive(Clone, Debug)]
pub struct MatchCase {
    pub variant_name: Symbol,
    pub bindings: Vec<Binding>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, Default)]
pub struct InlineAssembly {
    /// Raw instruction text, one entry per instruction line.
    pub lines: Vec<String>,
    /// The `Note:` comment attached to each instruction, same length and
    /// order as `lines`. Preserved verbatim, never emitted.
    pub notes: Vec<String>,
    pub outputs: Vec<String>,
    pub inputs: Vec<String>,
    pub clobbers: Vec<String>,
}

#[derive(Clone, Debug)]
pub enum Stmt {
    Let {
        name: Symbol,
        expr: Expr,
    },
    Set {
        target: Expr,
        value: Expr,
    },
    Return(Expr),
    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    Break,
    Continue,
    Print(Expr),
    Match {
        scrutinee: Expr,
        cases: Vec<MatchCase>,
    },
    ExpressionStmt(Expr),
    InlineAssembly(InlineAssembly),
}

#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: Symbol,
    pub type_ref: TypeRef,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Function {
    pub name: Symbol,
    pub params: Vec<Parameter>,
    pub return_type: TypeRef,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: Symbol,
    pub type_ref: TypeRef,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct VariantDecl {
    pub name: Symbol,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum TypeDefKind {
    Struct { fields: Vec<FieldDecl> },
    Variant { variants: Vec<VariantDecl> },
}

#[derive(Clone, Debug)]
pub struct TypeDefinition {
    pub name: Symbol,
    pub kind: TypeDefKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Import {
    pub filename: Symbol,
    pub alias: Symbol,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct GlobalVariable {
    pub name: Symbol,
    pub type_ref: TypeRef,
    pub initial_value: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, Default)]
pub struct Program {
    pub imports: Vec<Import>,
    pub types: Vec<TypeDefinition>,
    pub globals: Vec<GlobalVariable>,
    pub functions: Vec<Function>,
}
