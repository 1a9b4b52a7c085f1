//! Top-level declaration parsing: imports, type definitions, global
//! variables, and functions.

use runac_lex::TokenKind;

use crate::ast::{
    FieldDecl, Function, GlobalVariable, Import, Parameter, Program, TypeDefKind, TypeDefinition,
    TypeRef, VariantDecl,
};
use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// `program := (import | type_def | global | function)*`
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.at(TokenKind::Eof) {
            match self.current_kind() {
                TokenKind::Import => program.imports.push(self.parse_import()),
                TokenKind::Type => program.types.push(self.parse_type_def()),
                TokenKind::Let => program.globals.push(self.parse_global()),
                TokenKind::Process => program.functions.push(self.parse_function()),
                other => self.fatal(format!("expected a top-level declaration, found {other:?}")),
            }
        }
        program
    }

    /// `import := 'Import' STRING 'as' IDENT`
    fn parse_import(&mut self) -> Import {
        let span = self.span();
        self.eat(TokenKind::Import);
        let filename = self.eat_string();
        self.eat(TokenKind::As);
        let alias = self.eat_identifier();
        Import {
            filename,
            alias,
            span,
        }
    }

    /// A global variable declaration. The archived parser source for this
    /// detail did not survive in the retrieved v0.0.7.3 sources (no
    /// `parser.c`, only the `GlobalVariable` struct in `parser.h`), so this
    /// reuses the closest in-grammar shape — `Let` for the declaration,
    /// `as` for the type ascription already used by parameters and fields,
    /// `be` for the optional initializer already used by local `Let` — with
    /// no invented keyword. See DESIGN.md.
    ///
    /// `global := 'Let' IDENT 'as' type_ref ('be' expression)?`
    fn parse_global(&mut self) -> GlobalVariable {
        let span = self.span();
        self.eat(TokenKind::Let);
        let name = self.eat_identifier();
        self.eat(TokenKind::As);
        let type_ref = self.parse_type_ref();
        let initial_value = if self.at(TokenKind::Be) {
            self.advance();
            Some(self.parse_expression())
        } else {
            None
        };
        GlobalVariable {
            name,
            type_ref,
            initial_value,
            span,
        }
    }

    /// `type_def := 'Type' ('called' STRING ':' field_list 'End' 'Type' | IDENT 'is' variant_list)`
    fn parse_type_def(&mut self) -> TypeDefinition {
        let span = self.span();
        self.eat(TokenKind::Type);
        if self.at(TokenKind::Called) {
            self.advance();
            let name = self.eat_string();
            self.eat(TokenKind::Colon);
            let fields = self.parse_field_list(|p| p.at(TokenKind::End));
            self.eat(TokenKind::End);
            self.eat(TokenKind::Type);
            TypeDefinition {
                name,
                kind: TypeDefKind::Struct { fields },
                span,
            }
        } else {
            let name = self.eat_identifier();
            self.eat(TokenKind::Is);
            let variants = self.parse_variant_list();
            TypeDefinition {
                name,
                kind: TypeDefKind::Variant { variants },
                span,
            }
        }
    }

    /// `field_list := (IDENT 'as' type_ref ','?)*`
    fn parse_field_list(&mut self, is_end: impl Fn(&Self) -> bool) -> Vec<FieldDecl> {
        let mut fields = Vec::new();
        while !is_end(self) {
            fields.push(self.parse_field_pair());
            if self.at(TokenKind::Comma) {
                self.advance();
            }
        }
        fields
    }

    fn parse_field_pair(&mut self) -> FieldDecl {
        let span = self.span();
        let name = self.eat_identifier();
        self.eat(TokenKind::As);
        let type_ref = self.parse_type_ref();
        FieldDecl {
            name,
            type_ref,
            span,
        }
    }

    /// `variant_list := ('|' IDENT ('with' field_pair ('and' field_pair)*)? )+`
    fn parse_variant_list(&mut self) -> Vec<VariantDecl> {
        let mut variants = Vec::new();
        while self.at(TokenKind::Pipe) {
            let span = self.span();
            self.advance();
            let name = self.eat_identifier();
            let mut fields = Vec::new();
            if self.at(TokenKind::With) {
                self.advance();
                loop {
                    fields.push(self.parse_field_pair());
                    if self.at(TokenKind::And) {
                        self.advance();
                        continue;
                    }
                    break;
                }
            }
            variants.push(VariantDecl {
                name,
                fields,
                span,
            });
        }
        variants
    }

    /// `type_ref := 'Integer' | 'String' | 'Character' | IDENT
    ///            | 'array' 'of' type_ref | 'Pointer' 'of' type_ref`
    fn parse_type_ref(&mut self) -> TypeRef {
        match self.current_kind() {
            TokenKind::IntegerType => {
                self.advance();
                TypeRef::Integer
            }
            TokenKind::StringType => {
                self.advance();
                TypeRef::String
            }
            TokenKind::CharacterType => {
                self.advance();
                TypeRef::Character
            }
            TokenKind::Array => {
                self.advance();
                self.eat(TokenKind::Of);
                TypeRef::Array(Box::new(self.parse_type_ref()))
            }
            TokenKind::Pointer => {
                self.advance();
                self.eat(TokenKind::Of);
                TypeRef::Pointer(Box::new(self.parse_type_ref()))
            }
            TokenKind::Identifier => TypeRef::Named(self.eat_identifier()),
            other => self.fatal(format!("expected a type, found {other:?}")),
        }
    }

    /// `function := 'Process' 'called' STRING ('takes' param (',' param)*)?
    ///              'returns' type_ref ':' statement* 'End' 'Process'`
    fn parse_function(&mut self) -> Function {
        let span = self.span();
        self.eat(TokenKind::Process);
        self.eat(TokenKind::Called);
        let name = self.eat_string();

        let mut params = Vec::new();
        if self.at(TokenKind::Takes) {
            self.advance();
            loop {
                params.push(self.parse_param());
                if self.at(TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }

        self.eat(TokenKind::Returns);
        let return_type = self.parse_type_ref();
        self.eat(TokenKind::Colon);
        let body = self.parse_block(|p| p.at(TokenKind::End));
        self.eat(TokenKind::End);
        self.eat(TokenKind::Process);

        Function {
            name,
            params,
            return_type,
            body,
            span,
        }
    }

    /// `param := IDENT 'as' type_ref`
    fn parse_param(&mut self) -> Parameter {
        let span = self.span();
        let name = self.eat_identifier();
        self.eat(TokenKind::As);
        let type_ref = self.parse_type_ref();
        Parameter {
            name,
            type_ref,
            span,
        }
    }
}
