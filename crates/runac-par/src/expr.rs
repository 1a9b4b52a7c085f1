//! Expression and comparison parsing.
//!
//! Arithmetic/bitwise operators fold left-to-right with no precedence
//! stratification — `a plus b multiplied by c` parses as `(a plus b)
//! multiplied by c`, not the other way around. This looks unusual next to a
//! normal-precedence Pratt parser, but it is what the archived compiler does
//! and tests pin the shape (§4.2 of the governing grammar).

use runac_lex::TokenKind;
use runac_util::Symbol;

use crate::ast::{BinOp, CmpOp, Expr};
use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// `comparison := expression ('is' rel_op expression)?`
    pub fn parse_comparison(&mut self) -> Expr {
        let left = self.parse_expression();
        if !self.at(TokenKind::Is) {
            return left;
        }
        self.advance();
        let op = self.parse_relational_operator();
        let right = self.parse_expression();
        Expr::Comparison {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn parse_relational_operator(&mut self) -> CmpOp {
        match self.current_kind() {
            TokenKind::Not => {
                self.advance();
                self.eat(TokenKind::Equal);
                self.eat(TokenKind::To);
                CmpOp::Ne
            }
            TokenKind::Equal => {
                self.advance();
                self.eat(TokenKind::To);
                CmpOp::Eq
            }
            TokenKind::Less => {
                self.advance();
                self.eat(TokenKind::Than);
                if self.at(TokenKind::Or) {
                    self.advance();
                    self.eat(TokenKind::Equal);
                    self.eat(TokenKind::To);
                    CmpOp::Le
                } else {
                    CmpOp::Lt
                }
            }
            TokenKind::Greater => {
                self.advance();
                self.eat(TokenKind::Than);
                if self.at(TokenKind::Or) {
                    self.advance();
                    self.eat(TokenKind::Equal);
                    self.eat(TokenKind::To);
                    CmpOp::Ge
                } else {
                    CmpOp::Gt
                }
            }
            _ => self.fatal(format!(
                "expected a comparison operator after 'is', found {:?}",
                self.current_kind()
            )),
        }
    }

    /// `expression := primary (binop primary)*`, left-folded.
    pub fn parse_expression(&mut self) -> Expr {
        let mut left = self.parse_primary();
        while let Some(op) = self.peek_binary_operator() {
            self.consume_binary_operator(op);
            let right = self.parse_primary();
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        left
    }

    fn peek_binary_operator(&self) -> Option<BinOp> {
        Some(match self.current_kind() {
            TokenKind::Plus => BinOp::Plus,
            TokenKind::Minus => BinOp::Minus,
            TokenKind::Multiplied => BinOp::Multiplied,
            TokenKind::Divided => BinOp::Divided,
            TokenKind::Modulo => BinOp::Modulo,
            TokenKind::BitAnd => BinOp::BitAnd,
            TokenKind::BitOr => BinOp::BitOr,
            TokenKind::BitXor => BinOp::BitXor,
            TokenKind::BitShiftLeft => BinOp::Shl,
            TokenKind::BitShiftRight => BinOp::Shr,
            _ => return None,
        })
    }

    /// Consumes the operator token(s) already identified by
    /// `peek_binary_operator`, including the mandatory trailing `by` for the
    /// multi-word operators.
    fn consume_binary_operator(&mut self, op: BinOp) {
        self.advance();
        match op {
            BinOp::Multiplied | BinOp::Divided | BinOp::Modulo | BinOp::Shl | BinOp::Shr => {
                self.eat(TokenKind::By);
            }
            _ => {}
        }
    }

    fn parse_primary(&mut self) -> Expr {
        match self.current_kind() {
            TokenKind::Integer => {
                let tok = self.advance();
                let digits = tok.lexeme.expect("Integer token always carries a lexeme");
                let value: i64 = digits
                    .as_str()
                    .parse()
                    .unwrap_or_else(|_| self.fatal(format!("integer literal '{digits}' out of range")));
                Expr::Integer(value)
            }
            TokenKind::StringLiteral => {
                let tok = self.advance();
                Expr::StringLiteral(tok.lexeme.expect("StringLiteral token always carries a lexeme"))
            }
            TokenKind::Builtin(kind) => {
                self.advance();
                let args = self.parse_call_arguments();
                Expr::BuiltinCall { kind, args }
            }
            TokenKind::Identifier => self.parse_identifier_led_primary(),
            _ => self.fatal(format!("expected an expression, found {:?}", self.current_kind())),
        }
    }

    fn parse_identifier_led_primary(&mut self) -> Expr {
        let name = self.eat_identifier();

        let mut expr = if self.at(TokenKind::LParen) {
            let args = self.parse_call_arguments();
            Expr::FunctionCall { name, args }
        } else if self.at(TokenKind::With) && self.is_variant_name(name) {
            self.parse_variant_constructor(name)
        } else {
            Expr::Variable(name)
        };

        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.eat_identifier();
                    expr = Expr::FieldAccess {
                        object: Box::new(expr),
                        field,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression();
                    self.eat(TokenKind::RBracket);
                    expr = Expr::ArrayIndex {
                        array: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }
        expr
    }

    /// `'with' field_pair ('and' field_pair)*` where `field_pair := IDENT 'as' expression`.
    fn parse_variant_constructor(&mut self, variant_name: Symbol) -> Expr {
        let type_name = self
            .variant_owner(variant_name)
            .unwrap_or_else(|| self.fatal(format!("'{}' is not a known variant", variant_name.as_str())));
        self.eat(TokenKind::With);
        let mut fields = Vec::new();
        loop {
            let field_name = self.eat_identifier();
            self.eat(TokenKind::As);
            let value = self.parse_expression();
            fields.push((field_name, value));
            if self.at(TokenKind::And) {
                self.advance();
                continue;
            }
            break;
        }
        Expr::VariantConstructor {
            type_name,
            variant_name,
            fields,
        }
    }

    fn parse_call_arguments(&mut self) -> Vec<Expr> {
        self.eat(TokenKind::LParen);
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression());
                if self.at(TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.eat(TokenKind::RParen);
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runac_util::Handler;

    fn parse_expr(source: &str) -> Expr {
        let handler = Handler::new();
        let mut parser = Parser::new(source, &handler);
        parser.parse_comparison()
    }

    #[test]
    fn left_fold_arithmetic() {
        let expr = parse_expr("1 plus 2 multiplied by 3");
        match expr {
            Expr::Binary { left, op: BinOp::Multiplied, right } => {
                assert!(matches!(*right, Expr::Integer(3)));
                assert!(matches!(
                    *left,
                    Expr::Binary { op: BinOp::Plus, .. }
                ));
            }
            other => panic!("expected a left-folded multiply, got {other:?}"),
        }
    }

    #[test]
    fn comparison_is_equal_to() {
        let expr = parse_expr("x is equal to 5");
        assert!(matches!(expr, Expr::Comparison { op: CmpOp::Eq, .. }));
    }

    #[test]
    fn comparison_is_less_than_or_equal_to() {
        let expr = parse_expr("x is less than or equal to 5");
        assert!(matches!(expr, Expr::Comparison { op: CmpOp::Le, .. }));
    }

    #[test]
    fn field_access_chains() {
        let expr = parse_expr("p.position.x");
        assert!(matches!(expr, Expr::FieldAccess { .. }));
    }

    #[test]
    fn array_index() {
        let expr = parse_expr("numbers[0]");
        assert!(matches!(expr, Expr::ArrayIndex { .. }));
    }

    #[test]
    fn variant_constructor_disambiguated_via_symbol_table() {
        let handler = Handler::new();
        let mut parser = Parser::new(
            "Type Shape is | Circle with radius as Integer\nCircle with radius as 5",
            &handler,
        );
        // Skip past the type declaration tokens to the expression.
        while !parser.at(TokenKind::Identifier) || parser.peek_kind(1) != TokenKind::With {
            parser.advance();
        }
        let expr = parser.parse_comparison();
        assert!(matches!(expr, Expr::VariantConstructor { .. }));
    }
}
