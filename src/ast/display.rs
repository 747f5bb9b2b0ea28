//! Indented tree dump of a module, for debugging passes.
//!
//! One line per node or field. Nesting is drawn with `| ` per level and
//! every statement ends with its `_statement_depth` annotation, or
//! `<unset>` when no annotation covers it.

use ariadne::{Color, Fmt};

use super::{Expr, Module, Stmt, StmtKind};
use crate::format::format_expr;
use crate::passes::depth::DepthAnnotation;
use crate::span::Spanned;

/// Whether the dump carries ANSI colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpStyle {
    Plain,
    Color,
}

/// Dump `module` with the depth of each statement taken from `depth`.
pub fn dump_module(module: &Module, depth: Option<&DepthAnnotation>, style: DumpStyle) -> String {
    let mut dumper = Dumper {
        out: String::new(),
        level: 0,
        style,
        depth,
    };
    let head = dumper.kind("Module", ":");
    dumper.line(head);
    dumper.level += 1;
    dumper.stmts("body", &module.body);
    dumper.out
}

struct Dumper<'a> {
    out: String,
    level: usize,
    style: DumpStyle,
    depth: Option<&'a DepthAnnotation>,
}

impl Dumper<'_> {
    fn paint(&self, text: &str, color: Color) -> String {
        match self.style {
            DumpStyle::Plain => text.to_string(),
            DumpStyle::Color => text.fg(color).to_string(),
        }
    }

    fn line(&mut self, text: String) {
        let indent = self.paint(&"| ".repeat(self.level), Color::Fixed(8));
        self.out.push_str(&indent);
        self.out.push_str(&text);
        self.out.push('\n');
    }

    fn kind(&self, name: &str, suffix: &str) -> String {
        format!("{}{}", self.paint(name, Color::Cyan), suffix)
    }

    fn field(&self, name: &str) -> String {
        self.paint(name, Color::Blue)
    }

    fn scalar(&mut self, name: &str, value: &str) {
        let text = format!("{}={}", self.field(name), self.paint(value, Color::Magenta));
        self.line(text);
    }

    /// Open a node: `name=Kind:` for a field, `Kind:` inside a list.
    fn open(&mut self, name: Option<&str>, kind: &str, has_fields: bool) {
        let kind = self.kind(kind, if has_fields { ":" } else { "()" });
        let text = match name {
            Some(name) => format!("{}={}", self.field(name), kind),
            None => kind,
        };
        self.line(text);
    }

    fn list<T>(&mut self, name: &str, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        if items.is_empty() {
            let text = format!("{}=[]", self.field(name));
            self.line(text);
            return;
        }
        let text = format!("{}=[", self.field(name));
        self.line(text);
        self.level += 1;
        for item in items {
            each(self, item);
        }
        self.level -= 1;
        self.line("]".to_string());
    }

    fn stmts(&mut self, name: &str, body: &[Stmt]) {
        self.list(name, body, |d, stmt| d.stmt(stmt));
    }

    fn stmt(&mut self, stmt: &Stmt) {
        let has_fields = !matches!(stmt.kind, StmtKind::Pass);
        self.open(None, stmt.kind.name(), has_fields);
        self.level += 1;
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                self.scalar("target", &format!("{:?}", target.node));
                self.expr(Some("value"), value);
            }
            StmtKind::Expr(value) => self.expr(Some("value"), value),
            StmtKind::Pass => {}
            StmtKind::If { test, body, orelse } => {
                self.expr(Some("test"), test);
                self.stmts("body", body);
                self.stmts("orelse", orelse);
            }
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            } => {
                self.scalar("target", &format!("{:?}", target.node));
                self.expr(Some("iter"), iter);
                self.stmts("body", body);
                self.stmts("orelse", orelse);
            }
        }
        match self.depth.and_then(|d| d.get(stmt.id)) {
            Some(depth) => self.scalar("_statement_depth", &depth.to_string()),
            None => {
                let text = self.paint("_statement_depth=<unset>", Color::Red);
                self.line(text);
            }
        }
        self.level -= 1;
    }

    fn expr(&mut self, name: Option<&str>, expr: &Spanned<Expr>) {
        self.open(name, expr.node.name(), true);
        self.level += 1;
        match &expr.node {
            Expr::Literal(_) => self.scalar("value", &format_expr(&expr.node)),
            Expr::Name(id) => self.scalar("id", &format!("{:?}", id)),
            Expr::List(elts) => self.list("elts", elts, |d, e| d.expr(None, e)),
            Expr::Call { func, args } => {
                self.expr(Some("func"), func);
                self.list("args", args, |d, e| d.expr(None, e));
            }
            Expr::BinOp { op, lhs, rhs } => {
                self.expr(Some("left"), lhs);
                self.op("op", op.name());
                self.expr(Some("right"), rhs);
            }
            Expr::UnaryOp { op, operand } => {
                self.op("op", op.name());
                self.expr(Some("operand"), operand);
            }
            Expr::BoolOp { op, values } => {
                self.op("op", op.name());
                self.list("values", values, |d, e| d.expr(None, e));
            }
            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                self.expr(Some("left"), left);
                self.list("ops", ops, |d, op| d.open(None, op.name(), false));
                self.list("comparators", comparators, |d, e| d.expr(None, e));
            }
        }
        self.level -= 1;
    }

    /// Operators are field-less nodes: `op=Add()`.
    fn op(&mut self, name: &str, kind: &str) {
        self.open(Some(name), kind, false);
    }
}
