use crate::ast::*;

use super::expr::format_expr;
use super::{FormatCtx, INDENT};

impl FormatCtx {
    pub(super) fn emit_stmt(&mut self, stmt: &Stmt, indent: &str) {
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                self.output.push_str(indent);
                self.output.push_str(&target.node);
                self.output.push_str(" = ");
                self.output.push_str(&format_expr(&value.node));
                self.output.push('\n');
            }
            StmtKind::Expr(expr) => {
                self.output.push_str(indent);
                self.output.push_str(&format_expr(&expr.node));
                self.output.push('\n');
            }
            StmtKind::Pass => {
                self.output.push_str(indent);
                self.output.push_str("pass\n");
            }
            StmtKind::If { .. } => self.emit_if(stmt, "if", indent),
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            } => {
                self.output.push_str(indent);
                self.output.push_str("for ");
                self.output.push_str(&target.node);
                self.output.push_str(" in ");
                self.output.push_str(&format_expr(&iter.node));
                self.output.push_str(":\n");
                self.emit_block(body, indent);
                if !orelse.is_empty() {
                    self.output.push_str(indent);
                    self.output.push_str("else:\n");
                    self.emit_block(orelse, indent);
                }
            }
        }
    }

    /// Emit an `if` (or `elif`) header, its body, and its else chain.
    fn emit_if(&mut self, stmt: &Stmt, keyword: &str, indent: &str) {
        let StmtKind::If { test, body, orelse } = &stmt.kind else {
            return;
        };
        self.output.push_str(indent);
        self.output.push_str(keyword);
        self.output.push(' ');
        self.output.push_str(&format_expr(&test.node));
        self.output.push_str(":\n");
        self.emit_block(body, indent);

        if let Some(inner_if) = as_elif(orelse) {
            self.emit_if(inner_if, "elif", indent);
        } else if !orelse.is_empty() {
            self.output.push_str(indent);
            self.output.push_str("else:\n");
            self.emit_block(orelse, indent);
        }
    }

    /// Emit an indented block; an empty body becomes `pass`.
    fn emit_block(&mut self, body: &[Stmt], indent: &str) {
        let inner = format!("{}{}", indent, INDENT);
        if body.is_empty() {
            self.output.push_str(&inner);
            self.output.push_str("pass\n");
        } else {
            self.emit_body(body, &inner);
        }
    }
}

/// An else body consisting of exactly one `If` prints as `elif`.
fn as_elif(orelse: &[Stmt]) -> Option<&Stmt> {
    match orelse {
        [only] if matches!(only.kind, StmtKind::If { .. }) => Some(only),
        _ => None,
    }
}
