use tracing::debug;

use super::{Pass, PassContext, PassError, PassId};
use crate::ast::visit::rewrite_exprs;
use crate::ast::{Expr, Module};
use crate::span::Spanned;

/// De Morgan rewrite of every boolean connective:
/// `a or b or c` becomes `not (not a and not b and not c)` and vice versa.
///
/// The result evaluates to the same truth value. Operand evaluation order
/// and short-circuiting follow the flipped connective, so operands with
/// side effects may run a different number of times.
pub struct DeMorganFlipper;

impl Pass for DeMorganFlipper {
    fn id(&self) -> PassId {
        PassId::DeMorganFlipper
    }

    fn run(&mut self, module: &mut Module, _ctx: &mut PassContext) -> Result<usize, PassError> {
        let mut rewrites = 0;
        rewrite_exprs(&mut module.body, &mut |expr| {
            let Spanned { node, span } = expr;
            match node {
                Expr::BoolOp { op, values } => {
                    rewrites += 1;
                    debug!(at = %span, from = op.as_str(), to = op.invert().as_str(), "flipped connective");
                    let flipped = Expr::BoolOp {
                        op: op.invert(),
                        values: values.into_iter().map(Expr::not).collect(),
                    };
                    Ok::<_, PassError>(Expr::not(Spanned::new(flipped, span)))
                }
                other => Ok(Spanned::new(other, span)),
            }
        })?;
        Ok(rewrites)
    }
}
