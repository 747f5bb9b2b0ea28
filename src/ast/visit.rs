//! Post-order traversal helpers shared by the rewrite passes.
//!
//! Children are always rewritten before their parent is handed to the
//! callback, and siblings are visited left to right.
//!
//! A callback error drops the part of the tree that was being rewritten.
//! Passes that can fail check their preconditions with `walk_stmts`
//! before rewriting anything.

use super::{Expr, Stmt, StmtKind};
use crate::span::Spanned;

/// Rewrite every statement of `body` bottom-up. The callback may replace a
/// statement with any number of statements (including none).
pub fn rewrite_stmts<E>(
    body: Vec<Stmt>,
    f: &mut impl FnMut(Stmt) -> Result<Vec<Stmt>, E>,
) -> Result<Vec<Stmt>, E> {
    let mut out = Vec::with_capacity(body.len());
    for mut stmt in body {
        match &mut stmt.kind {
            StmtKind::If { body, orelse, .. } | StmtKind::For { body, orelse, .. } => {
                *body = rewrite_stmts(std::mem::take(body), f)?;
                *orelse = rewrite_stmts(std::mem::take(orelse), f)?;
            }
            _ => {}
        }
        out.extend(f(stmt)?);
    }
    Ok(out)
}

/// Rewrite every expression reachable from `body`, bottom-up.
pub fn rewrite_exprs<E>(
    body: &mut [Stmt],
    f: &mut impl FnMut(Spanned<Expr>) -> Result<Spanned<Expr>, E>,
) -> Result<(), E> {
    for stmt in body {
        match &mut stmt.kind {
            StmtKind::Assign { value, .. } => rewrite_slot(value, f)?,
            StmtKind::Expr(expr) => rewrite_slot(expr, f)?,
            StmtKind::Pass => {}
            StmtKind::If { test, body, orelse } => {
                rewrite_slot(test, f)?;
                rewrite_exprs(body, f)?;
                rewrite_exprs(orelse, f)?;
            }
            StmtKind::For {
                iter, body, orelse, ..
            } => {
                rewrite_slot(iter, f)?;
                rewrite_exprs(body, f)?;
                rewrite_exprs(orelse, f)?;
            }
        }
    }
    Ok(())
}

fn rewrite_slot<E>(
    slot: &mut Spanned<Expr>,
    f: &mut impl FnMut(Spanned<Expr>) -> Result<Spanned<Expr>, E>,
) -> Result<(), E> {
    let expr = std::mem::take(slot);
    *slot = rewrite_expr(expr, f)?;
    Ok(())
}

/// Rewrite one expression tree bottom-up.
pub fn rewrite_expr<E>(
    mut expr: Spanned<Expr>,
    f: &mut impl FnMut(Spanned<Expr>) -> Result<Spanned<Expr>, E>,
) -> Result<Spanned<Expr>, E> {
    match &mut expr.node {
        Expr::Literal(_) | Expr::Name(_) => {}
        Expr::List(elts) => rewrite_all(elts, f)?,
        Expr::Call { func, args } => {
            rewrite_slot(func, f)?;
            rewrite_all(args, f)?;
        }
        Expr::BinOp { lhs, rhs, .. } => {
            rewrite_slot(lhs, f)?;
            rewrite_slot(rhs, f)?;
        }
        Expr::UnaryOp { operand, .. } => rewrite_slot(operand, f)?,
        Expr::BoolOp { values, .. } => rewrite_all(values, f)?,
        Expr::Compare {
            left, comparators, ..
        } => {
            rewrite_slot(left, f)?;
            rewrite_all(comparators, f)?;
        }
    }
    f(expr)
}

fn rewrite_all<E>(
    exprs: &mut [Spanned<Expr>],
    f: &mut impl FnMut(Spanned<Expr>) -> Result<Spanned<Expr>, E>,
) -> Result<(), E> {
    for slot in exprs {
        rewrite_slot(slot, f)?;
    }
    Ok(())
}

/// Visit every statement (pre-order), read-only.
pub fn walk_stmts<'a>(body: &'a [Stmt], f: &mut impl FnMut(&'a Stmt)) {
    for stmt in body {
        f(stmt);
        for child in stmt.child_bodies() {
            walk_stmts(child, f);
        }
    }
}
