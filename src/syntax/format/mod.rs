mod expr;
mod stmts;


use crate::ast::*;

pub use expr::format_expr;

const INDENT: &str = "    ";

/// Print a module back to source text. Comments are not part of the tree
/// and are therefore not reproduced.
pub fn format_module(module: &Module) -> String {
    let mut ctx = FormatCtx::new();
    ctx.emit_body(&module.body, "");
    let mut out = ctx.output;
    // Ensure single trailing newline
    while out.ends_with("\n\n") {
        out.pop();
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub(super) struct FormatCtx {
    pub(super) output: String,
}

impl FormatCtx {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_body(&mut self, body: &[Stmt], indent: &str) {
        for stmt in body {
            self.emit_stmt(stmt, indent);
        }
    }
}
