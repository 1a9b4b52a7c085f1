//! Statement parsing.

use runac_lex::{Token, TokenKind};

use crate::ast::{Binding, Expr, InlineAssembly, MatchCase, Stmt};
use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// `statement := let_stmt | set_stmt | if_stmt | while_stmt | return_stmt
    ///             | print_stmt | match_stmt | break_stmt | continue_stmt
    ///             | inline_asm_stmt | expr_stmt`
    pub fn parse_statement(&mut self) -> Stmt {
        match self.current_kind() {
            TokenKind::Let => self.parse_let_stmt(),
            TokenKind::Set => self.parse_set_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::Match => self.parse_match_stmt(),
            TokenKind::Break => {
                self.advance();
                Stmt::Break
            }
            TokenKind::Continue => {
                self.advance();
                Stmt::Continue
            }
            TokenKind::Inline => self.parse_inline_assembly(),
            _ => Stmt::ExpressionStmt(self.parse_expression()),
        }
    }

    /// Parses statements until `is_end` reports the current token closes the
    /// enclosing block. Never consumes the closing token itself.
    pub(crate) fn parse_block(&mut self, is_end: impl Fn(&Self) -> bool) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while !is_end(self) && !self.at(TokenKind::Eof) {
            stmts.push(self.parse_statement());
        }
        stmts
    }

    /// `'Let' IDENT 'be' expression`, where the RHS may be a bare type name
    /// (zero-initialized allocation) instead of a value expression.
    fn parse_let_stmt(&mut self) -> Stmt {
        self.eat(TokenKind::Let);
        let name = self.eat_identifier();
        self.eat(TokenKind::Be);
        let expr = self.parse_let_rhs();
        Stmt::Let { name, expr }
    }

    fn parse_let_rhs(&mut self) -> Expr {
        if self.at(TokenKind::Identifier) {
            if let Some(sym) = self.current().lexeme {
                if self.is_type_name(sym) {
                    let follows_with_value = matches!(
                        self.peek_kind(1),
                        TokenKind::LParen | TokenKind::With | TokenKind::Dot | TokenKind::LBracket
                    );
                    if !follows_with_value {
                        self.advance();
                        return Expr::TypeName(sym);
                    }
                }
            }
        }
        self.parse_expression()
    }

    /// `'Set' expression 'to' expression`
    fn parse_set_stmt(&mut self) -> Stmt {
        self.eat(TokenKind::Set);
        let target = self.parse_expression();
        self.eat(TokenKind::To);
        let value = self.parse_expression();
        Stmt::Set { target, value }
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        self.eat(TokenKind::Return);
        Stmt::Return(self.parse_expression())
    }

    fn parse_print_stmt(&mut self) -> Stmt {
        self.eat(TokenKind::Print);
        Stmt::Print(self.parse_expression())
    }

    /// `'If' comparison ':' statement* ('Otherwise' (if_stmt | ':' statement*))? 'End' 'If'`
    ///
    /// An entire `If`/`Otherwise If`/.../`Otherwise`/`End If` chain has a
    /// single closing `End If`, no matter how many `Otherwise If` links it
    /// has — so only this outer entry point consumes the leading `If` and
    /// trailing `End If`. Each `Otherwise If` link is parsed by
    /// `parse_if_tail`, which folds it into a nested `If` in the enclosing
    /// else body (§4.2's elif-to-nested-if transformation) without touching
    /// either terminator.
    fn parse_if_stmt(&mut self) -> Stmt {
        self.eat(TokenKind::If);
        let stmt = self.parse_if_tail();
        self.eat(TokenKind::End);
        self.eat(TokenKind::If);
        stmt
    }

    /// Parses `comparison ':' statement* ('Otherwise' ...)?` — everything
    /// between a leading `If`/`Otherwise If` and the chain's final
    /// `End If`, which the caller is responsible for.
    fn parse_if_tail(&mut self) -> Stmt {
        let condition = self.parse_comparison();
        self.eat(TokenKind::Colon);
        let then_body = self.parse_block(|p| p.at(TokenKind::Otherwise) || p.at(TokenKind::End));

        let else_body = if self.at(TokenKind::Otherwise) {
            self.advance();
            if self.at(TokenKind::If) {
                self.advance();
                vec![self.parse_if_tail()]
            } else {
                self.eat(TokenKind::Colon);
                self.parse_block(|p| p.at(TokenKind::End))
            }
        } else {
            Vec::new()
        };

        Stmt::If {
            condition,
            then_body,
            else_body,
        }
    }

    /// `'While' comparison ':' statement* 'End' 'While'`
    fn parse_while_stmt(&mut self) -> Stmt {
        self.eat(TokenKind::While);
        let condition = self.parse_comparison();
        self.eat(TokenKind::Colon);
        let body = self.parse_block(|p| p.at(TokenKind::End));
        self.eat(TokenKind::End);
        self.eat(TokenKind::While);
        Stmt::While { condition, body }
    }

    /// `'Match' expression ':' match_case+ 'End' 'Match'`
    fn parse_match_stmt(&mut self) -> Stmt {
        self.eat(TokenKind::Match);
        let scrutinee = self.parse_expression();
        self.eat(TokenKind::Colon);
        let mut cases = Vec::new();
        while self.at(TokenKind::When) {
            cases.push(self.parse_match_case());
        }
        self.eat(TokenKind::End);
        self.eat(TokenKind::Match);
        Stmt::Match { scrutinee, cases }
    }

    /// `'When' IDENT ('with' binding ('and' binding)*)? ':' statement* 'End' 'When'`
    /// where `binding := IDENT 'as' IDENT`.
    fn parse_match_case(&mut self) -> MatchCase {
        let span = self.span();
        self.eat(TokenKind::When);
        let variant_name = self.eat_identifier();
        let mut bindings = Vec::new();
        if self.at(TokenKind::With) {
            self.advance();
            loop {
                let field_name = self.eat_identifier();
                self.eat(TokenKind::As);
                let local_name = self.eat_identifier();
                bindings.push(Binding {
                    field_name,
                    local_name,
                });
                if self.at(TokenKind::And) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.eat(TokenKind::Colon);
        let body = self.parse_block(|p| p.at(TokenKind::End));
        self.eat(TokenKind::End);
        self.eat(TokenKind::When);
        MatchCase {
            variant_name,
            bindings,
            body,
            span,
        }
    }

    /// `'Inline' 'Assembly' ':' (STRING 'Note' ':' note_text)* constraint_sections 'End' 'Assembly'`
    ///
    /// Each instruction's note is free-form text, so it cannot be parsed as
    /// grammar — it is consumed token-by-token until the next instruction,
    /// the closing `End Assembly`, or a constraint-section colon, matching
    /// §4.2's description of the note boundary.
    fn parse_inline_assembly(&mut self) -> Stmt {
        self.eat(TokenKind::Inline);
        self.eat(TokenKind::Assembly);
        self.eat(TokenKind::Colon);

        let mut asm = InlineAssembly::default();
        while self.at(TokenKind::StringLiteral) {
            asm.lines.push(self.eat_string().to_string());
            self.eat(TokenKind::Note);
            self.eat(TokenKind::Colon);
            asm.notes.push(self.consume_note_text());
        }

        if self.at(TokenKind::Colon) {
            self.advance();
            asm.outputs = self.parse_constraint_list();
        }
        if self.at(TokenKind::Colon) {
            self.advance();
            asm.inputs = self.parse_constraint_list();
        }
        if self.at(TokenKind::Colon) {
            self.advance();
            asm.clobbers = self.parse_constraint_list();
        }

        self.eat(TokenKind::End);
        self.eat(TokenKind::Assembly);
        Stmt::InlineAssembly(asm)
    }

    fn consume_note_text(&mut self) -> String {
        let mut words = Vec::new();
        while !matches!(
            self.current_kind(),
            TokenKind::StringLiteral | TokenKind::End | TokenKind::Assembly | TokenKind::Colon | TokenKind::Eof
        ) {
            words.push(token_text(self.advance()));
        }
        words.join(" ")
    }

    fn parse_constraint_list(&mut self) -> Vec<String> {
        let mut items = Vec::new();
        while self.at(TokenKind::StringLiteral) {
            items.push(self.eat_string().to_string());
            if self.at(TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        items
    }
}

fn token_text(tok: Token) -> String {
    match tok.lexeme {
        Some(lexeme) => lexeme.to_string(),
        None => format!("{:?}", tok.kind),
    }
}
