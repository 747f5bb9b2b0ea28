use tracing::{debug, warn};

use super::{Pass, PassContext, PassError, PassId};
use crate::ast::visit::rewrite_stmts;
use crate::ast::{Expr, Literal, Module, NodeIds, Stmt, StmtKind, UnaryOp};
use crate::span::Spanned;

/// Loops producing more iterations than this are left in place, so a
/// literal `range(1000000000000)` cannot exhaust memory during the rewrite.
pub const MAX_UNROLLED_ITERATIONS: usize = 10_000;

/// Replaces `for` loops over list literals and literal `range(...)` calls
/// with straight-line code: for each value, an assignment to the loop
/// target followed by a fresh copy of the body. A loop `else:` body runs
/// once after the unrolled iterations. Any other iterable is left alone.
pub struct ForLoopUnroller {
    pub max_iterations: usize,
}

impl Default for ForLoopUnroller {
    fn default() -> Self {
        Self {
            max_iterations: MAX_UNROLLED_ITERATIONS,
        }
    }
}

impl Pass for ForLoopUnroller {
    fn id(&self) -> PassId {
        PassId::ForLoopUnroller
    }

    fn run(&mut self, module: &mut Module, _ctx: &mut PassContext) -> Result<usize, PassError> {
        let ids = &mut module.ids;
        let limit = self.max_iterations;
        let mut rewrites = 0;
        module.body = rewrite_stmts(std::mem::take(&mut module.body), &mut |stmt| {
            let StmtKind::For { iter, .. } = &stmt.kind else {
                return Ok::<_, PassError>(vec![stmt]);
            };
            match iteration_values(iter, limit) {
                Some(values) => {
                    rewrites += 1;
                    Ok(unroll(stmt, values, ids))
                }
                None => Ok(vec![stmt]),
            }
        })?;
        Ok(rewrites)
    }
}

fn unroll(stmt: Stmt, values: Vec<Spanned<Expr>>, ids: &mut NodeIds) -> Vec<Stmt> {
    let span = stmt.span;
    let StmtKind::For {
        target,
        body,
        orelse,
        ..
    } = stmt.kind
    else {
        return vec![stmt];
    };

    debug!(at = %span, iterations = values.len(), "unrolled loop");
    let mut out = Vec::with_capacity(values.len() * (1 + body.len()) + orelse.len());
    for value in values {
        out.push(ids.stmt(
            StmtKind::Assign {
                target: target.clone(),
                value,
            },
            span,
        ));
        out.extend(ids.copy_body(&body));
    }
    out.extend(orelse);
    out
}

/// The values a loop iterates over, if they are known without running
/// anything: the elements of a list literal, or a `range` whose arguments
/// are all integer literals.
fn iteration_values(iter: &Spanned<Expr>, limit: usize) -> Option<Vec<Spanned<Expr>>> {
    match &iter.node {
        Expr::List(elts) => Some(elts.clone()),
        Expr::Call { func, args } if matches!(&func.node, Expr::Name(name) if name == "range") => {
            let bounds: Vec<i64> = args
                .iter()
                .map(|arg| literal_int(&arg.node))
                .collect::<Option<_>>()?;
            let (start, stop, step) = match bounds.as_slice() {
                [stop] => (0, *stop, 1),
                [start, stop] => (*start, *stop, 1),
                [start, stop, step] => (*start, *stop, *step),
                _ => return None,
            };
            if step == 0 {
                return None;
            }
            let len = range_len(start, stop, step);
            if len > limit as u128 {
                warn!(
                    at = %iter.span,
                    iterations = len as u64,
                    limit,
                    "range too large to unroll, leaving loop in place"
                );
                return None;
            }
            let values = (0..len as i128)
                .map(|k| (start as i128 + k * step as i128) as i64)
                .map(|n| Spanned::new(Expr::int(n), iter.span))
                .collect();
            Some(values)
        }
        _ => None,
    }
}

fn literal_int(expr: &Expr) -> Option<i64> {
    match expr {
        Expr::Literal(Literal::Int(n)) => Some(*n),
        Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand,
        } => match &operand.node {
            Expr::Literal(Literal::Int(n)) => n.checked_neg(),
            _ => None,
        },
        _ => None,
    }
}

/// Number of values `range(start, stop, step)` yields; `step` is non-zero.
fn range_len(start: i64, stop: i64, step: i64) -> u128 {
    let (start, stop, step) = (start as i128, stop as i128, step as i128);
    if (step > 0 && start >= stop) || (step < 0 && start <= stop) {
        return 0;
    }
    let span = (stop - start).abs();
    let step = step.abs();
    ((span - 1) / step + 1) as u128
}
