//! Property test for §8.1 universal property 4 ("parser determinism"):
//! for any token stream the parser accepts, it builds the same AST on
//! repeated runs. Generates small well-formed arithmetic expressions rather
//! than arbitrary strings, since a malformed program hits `Handler::fatal`
//! (which exits the process) instead of returning.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use runac_par::Parser;
use runac_util::Handler;

const OPS: [&str; 5] = ["plus", "minus", "multiplied by", "divided by", "modulo by"];

#[derive(Clone, Debug)]
enum ExprShape {
    Lit(i64),
    Op(Box<ExprShape>, &'static str, Box<ExprShape>),
}

impl ExprShape {
    fn build(g: &mut Gen, depth: u32) -> Self {
        if depth == 0 || bool::arbitrary(g) {
            ExprShape::Lit((u8::arbitrary(g) as i64) + 1)
        } else {
            let op = OPS[usize::arbitrary(g) % OPS.len()];
            ExprShape::Op(
                Box::new(ExprShape::build(g, depth - 1)),
                op,
                Box::new(ExprShape::build(g, depth - 1)),
            )
        }
    }

    fn render(&self) -> String {
        match self {
            ExprShape::Lit(n) => n.to_string(),
            ExprShape::Op(left, op, right) => format!("{} {} {}", left.render(), op, right.render()),
        }
    }
}

impl Arbitrary for ExprShape {
    fn arbitrary(g: &mut Gen) -> Self {
        ExprShape::build(g, 3)
    }
}

fn parse_debug(source: &str) -> String {
    let handler = Handler::new();
    let mut parser = Parser::new(source, &handler);
    format!("{:?}", parser.parse_program())
}

#[quickcheck]
fn parser_is_deterministic(expr: ExprShape) -> bool {
    let source = format!(
        "Process called \"main\" returns Integer:\n  Return {}\nEnd Process",
        expr.render()
    );
    parse_debug(&source) == parse_debug(&source)
}
