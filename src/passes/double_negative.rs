use tracing::debug;

use super::{Pass, PassContext, PassError, PassId};
use crate::ast::visit::rewrite_exprs;
use crate::ast::{BoolOp, CmpOp, Expr, Module};
use crate::span::Spanned;

/// Rewrites every comparison as the negation of its inverse:
/// `a < b` becomes `not a >= b`, and a chain `a < b < c` becomes
/// `not (a >= b or b >= c)`.
///
/// In the chained form each middle operand is written twice, so it is
/// evaluated up to twice.
pub struct DoubleNegativeCreator;

impl Pass for DoubleNegativeCreator {
    fn id(&self) -> PassId {
        PassId::DoubleNegativeCreator
    }

    fn run(&mut self, module: &mut Module, _ctx: &mut PassContext) -> Result<usize, PassError> {
        let mut rewrites = 0;
        rewrite_exprs(&mut module.body, &mut |expr| {
            let Spanned { node, span } = expr;
            match node {
                Expr::Compare {
                    left,
                    ops,
                    comparators,
                } => {
                    rewrites += 1;
                    debug!(at = %span, links = ops.len(), "inverted comparison");
                    Ok::<_, PassError>(Expr::not(invert_chain(*left, ops, comparators, span)))
                }
                other => Ok(Spanned::new(other, span)),
            }
        })?;
        Ok(rewrites)
    }
}

/// The logical complement of `left ops[0] comparators[0] ...`, without the
/// outer `not`.
fn invert_chain(
    left: Spanned<Expr>,
    ops: Vec<CmpOp>,
    comparators: Vec<Spanned<Expr>>,
    span: crate::span::Span,
) -> Spanned<Expr> {
    if ops.len() == 1 {
        return Spanned::new(
            Expr::Compare {
                left: Box::new(left),
                ops: ops.into_iter().map(CmpOp::invert).collect(),
                comparators,
            },
            span,
        );
    }

    let operands: Vec<Spanned<Expr>> = std::iter::once(left).chain(comparators).collect();
    let clauses = operands
        .windows(2)
        .zip(ops)
        .map(|(pair, op)| {
            Spanned::new(
                Expr::Compare {
                    left: Box::new(pair[0].clone()),
                    ops: vec![op.invert()],
                    comparators: vec![pair[1].clone()],
                },
                pair[0].span.merge(pair[1].span),
            )
        })
        .collect();
    Spanned::new(
        Expr::BoolOp {
            op: BoolOp::Or,
            values: clauses,
        },
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_module;

    fn invert(source: &str) -> String {
        let mut module = crate::parse_source_silent(source).unwrap();
        DoubleNegativeCreator
            .run(&mut module, &mut PassContext::default())
            .unwrap();
        format_module(&module)
    }

    #[test]
    fn test_binary_comparisons() {
        assert_eq!(invert("x = a < b\n"), "x = not a >= b\n");
        assert_eq!(invert("x = a == b\n"), "x = not a != b\n");
        assert_eq!(invert("x = a is None\n"), "x = not a is not None\n");
        assert_eq!(invert("x = a not in b\n"), "x = not a in b\n");
        assert_eq!(invert("x = a <= b\n"), "x = not a > b\n");
    }

    #[test]
    fn test_chain_becomes_disjunction() {
        assert_eq!(
            invert("x = a < b <= c\n"),
            "x = not (a >= b or b > c)\n"
        );
        assert_eq!(
            invert("x = a == b != c is d\n"),
            "x = not (a != b or b == c or c is not d)\n"
        );
    }

    #[test]
    fn test_nested_comparisons_inside_out() {
        assert_eq!(invert("x = (a < b) == c\n"), "x = not (not a >= b) != c\n");
    }

    #[test]
    fn test_rewrite_count() {
        let mut module = crate::parse_source_silent("if a < b:\n    x = c == d\nelse:\n    y = 1\n").unwrap();
        let rewrites = DoubleNegativeCreator
            .run(&mut module, &mut PassContext::default())
            .unwrap();
        assert_eq!(rewrites, 2);
    }

    #[test]
    fn test_leaves_other_expressions_alone() {
        let src = "x = a and b\ny = not c\n";
        assert_eq!(invert(src), src);
    }
}
