use crate::ast::*;

// Precedence levels, loosest first.
const PREC_OR: u8 = 0;
const PREC_AND: u8 = 1;
const PREC_NOT: u8 = 2;
const PREC_COMPARE: u8 = 3;
const PREC_ADD: u8 = 4;
const PREC_MUL: u8 = 5;
const PREC_UNARY: u8 = 6;
const PREC_ATOM: u8 = 7;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::BoolOp { op: BoolOp::Or, .. } => PREC_OR,
        Expr::BoolOp { op: BoolOp::And, .. } => PREC_AND,
        Expr::UnaryOp {
            op: UnaryOp::Not, ..
        } => PREC_NOT,
        Expr::Compare { .. } => PREC_COMPARE,
        Expr::BinOp { op, .. } => binop_precedence(*op),
        Expr::UnaryOp { .. } => PREC_UNARY,
        // A negative literal prints with a leading minus sign.
        Expr::Literal(Literal::Int(n)) if *n < 0 => PREC_UNARY,
        Expr::Literal(Literal::Float(x)) if x.is_sign_negative() => PREC_UNARY,
        Expr::Literal(_) | Expr::Name(_) | Expr::List(_) | Expr::Call { .. } => PREC_ATOM,
    }
}

fn binop_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => PREC_ADD,
        BinOp::Mul | BinOp::Div | BinOp::FloorDiv | BinOp::Mod => PREC_MUL,
    }
}

/// Format an expression to a single-line string with the minimum
/// parentheses needed to parse back to the same tree.
pub fn format_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal(lit) => format_literal(lit),
        Expr::Name(name) => name.clone(),
        Expr::List(elts) => format!("[{}]", format_list(elts)),
        Expr::Call { func, args } => {
            format!(
                "{}({})",
                format_operand(&func.node, PREC_ATOM),
                format_list(args)
            )
        }
        Expr::BinOp { op, lhs, rhs } => {
            let level = binop_precedence(*op);
            // Left-associative: an equal-precedence right operand needs parens.
            format!(
                "{} {} {}",
                format_operand(&lhs.node, level),
                op.as_str(),
                format_operand(&rhs.node, level + 1)
            )
        }
        Expr::UnaryOp { op, operand } => {
            let min = match op {
                UnaryOp::Not => PREC_NOT,
                UnaryOp::Neg | UnaryOp::Pos => PREC_UNARY,
            };
            format!("{}{}", op.as_str(), format_operand(&operand.node, min))
        }
        Expr::BoolOp { op, values } => {
            // Nested runs of either connective keep their grouping.
            let min = match op {
                BoolOp::Or => PREC_AND,
                BoolOp::And => PREC_NOT,
            };
            let sep = format!(" {} ", op.as_str());
            values
                .iter()
                .map(|v| format_operand(&v.node, min))
                .collect::<Vec<_>>()
                .join(&sep)
        }
        Expr::Compare {
            left,
            ops,
            comparators,
        } => {
            let mut out = format_operand(&left.node, PREC_ADD);
            for (op, rhs) in ops.iter().zip(comparators) {
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                out.push_str(&format_operand(&rhs.node, PREC_ADD));
            }
            out
        }
    }
}

/// Format `expr`, parenthesised if it binds looser than `min`.
fn format_operand(expr: &Expr, min: u8) -> String {
    if precedence(expr) < min {
        format!("({})", format_expr(expr))
    } else {
        format_expr(expr)
    }
}

fn format_list(items: &[crate::span::Spanned<Expr>]) -> String {
    items
        .iter()
        .map(|e| format_expr(&e.node))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(n) => n.to_string(),
        Literal::Float(x) => {
            let s = x.to_string();
            if s.contains(['.', 'e', 'E', 'i', 'N']) {
                s
            } else {
                format!("{}.0", s)
            }
        }
        Literal::Str(s) => format_str(s),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::None => "None".to_string(),
    }
}

fn format_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
