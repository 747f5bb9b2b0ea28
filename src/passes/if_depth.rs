use tracing::debug;

use super::{DepthAnnotation, Pass, PassContext, PassError, PassId};
use crate::ast::visit::{rewrite_stmts, walk_stmts};
use crate::ast::{Expr, Module, Stmt, StmtKind};
use crate::span::Span;

/// Puts the deeper branch of every conditional first. When the `else`
/// branch is at least as deep as the `if` branch the two are swapped and
/// the test is negated.
///
/// Needs the depth annotation from `NodeDepthAnnotator`. The conditional
/// is changed in place and keeps its `NodeId`; its depth and its children
/// are unchanged, so the annotation stays valid.
pub struct IfDepthMaximizer;

impl Pass for IfDepthMaximizer {
    fn id(&self) -> PassId {
        PassId::IfDepthMaximizer
    }

    fn run(&mut self, module: &mut Module, ctx: &mut PassContext) -> Result<usize, PassError> {
        let Some(annotation) = ctx.depth.as_ref() else {
            return match first_conditional(&module.body) {
                Some(span) => Err(PassError::MissingAnnotation { span }),
                None => Ok(0),
            };
        };
        // Every lookup the rewrite makes is checked first, so a stale
        // annotation leaves the module untouched.
        check_annotated(&module.body, annotation)?;

        let mut rewrites = 0;
        module.body = rewrite_stmts(std::mem::take(&mut module.body), &mut |mut stmt| {
            let span = stmt.span;
            if let StmtKind::If { test, body, orelse } = &mut stmt.kind {
                let body_depth = annotation.max_depth(body)?;
                let orelse_depth = annotation.max_depth(orelse)?;
                if orelse_depth >= body_depth {
                    std::mem::swap(body, orelse);
                    *test = Expr::not(std::mem::take(test));
                    rewrites += 1;
                    debug!(at = %span, body_depth, orelse_depth, "swapped branches");
                }
            }
            Ok(vec![stmt])
        })?;
        Ok(rewrites)
    }
}

fn first_conditional(body: &[Stmt]) -> Option<Span> {
    let mut found = None;
    walk_stmts(body, &mut |stmt| {
        if found.is_none() && matches!(stmt.kind, StmtKind::If { .. }) {
            found = Some(stmt.span);
        }
    });
    found
}

/// Each conditional and every statement directly inside its branches
/// must have a depth.
fn check_annotated(body: &[Stmt], annotation: &DepthAnnotation) -> Result<(), PassError> {
    let mut result = Ok(());
    walk_stmts(body, &mut |stmt| {
        if result.is_err() {
            return;
        }
        if let StmtKind::If { body, orelse, .. } = &stmt.kind {
            result = match annotation.get(stmt.id) {
                None => Err(PassError::MissingAnnotation { span: stmt.span }),
                Some(_) => annotation
                    .max_depth(body)
                    .and_then(|_| annotation.max_depth(orelse))
                    .map(|_| ()),
            };
        }
    });
    result
}
