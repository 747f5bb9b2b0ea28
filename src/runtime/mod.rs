//! Tree-walking interpreter for parsed modules.
//!
//! Used to check that a transformed program behaves like the original:
//! everything written through `print` is captured into a buffer instead of
//! going to the process stdout. A step budget bounds execution.

mod builtins;
pub mod value;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::ast::{BinOp, BoolOp, CmpOp, Expr, Literal, Module, Stmt, StmtKind, UnaryOp};
use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};

pub use value::Value;

/// Default bound on executed statements plus calls.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("name '{name}' is not defined")]
    UndefinedName { name: String, span: Span },

    #[error("TypeError: {message}")]
    TypeError { message: String, span: Span },

    #[error("ValueError: {message}")]
    ValueError { message: String, span: Span },

    #[error("division by zero")]
    ZeroDivision { span: Span },

    #[error("integer overflow")]
    Overflow { span: Span },

    #[error("step limit of {limit} exceeded")]
    StepLimit { limit: u64, span: Span },
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::UndefinedName { span, .. }
            | RuntimeError::TypeError { span, .. }
            | RuntimeError::ValueError { span, .. }
            | RuntimeError::ZeroDivision { span }
            | RuntimeError::Overflow { span }
            | RuntimeError::StepLimit { span, .. } => *span,
        }
    }
}

impl From<RuntimeError> for Diagnostic {
    fn from(err: RuntimeError) -> Self {
        let diag = Diagnostic::error(err.to_string(), err.span());
        match err {
            RuntimeError::Overflow { .. } => {
                diag.with_note("integers are 64-bit signed values".to_string())
            }
            RuntimeError::StepLimit { .. } => diag.with_help(
                "raise `max_steps` in the [runtime] section of beautify.toml".to_string(),
            ),
            _ => diag,
        }
    }
}

/// Run `module` to completion and return everything it printed.
pub fn run_module(module: &Module, max_steps: u64) -> Result<String, RuntimeError> {
    let mut interp = Interpreter::new(max_steps);
    interp.run(module)?;
    Ok(interp.into_output())
}

pub struct Interpreter {
    globals: HashMap<String, Value>,
    output: String,
    steps: u64,
    max_steps: u64,
}

impl Interpreter {
    pub fn new(max_steps: u64) -> Self {
        Self {
            globals: HashMap::new(),
            output: String::new(),
            steps: 0,
            max_steps,
        }
    }

    pub fn run(&mut self, module: &Module) -> Result<(), RuntimeError> {
        self.exec_body(&module.body)?;
        debug!(steps = self.steps, bytes = self.output.len(), "program finished");
        Ok(())
    }

    /// Output captured so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    fn tick(&mut self, span: Span) -> Result<(), RuntimeError> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(RuntimeError::StepLimit {
                limit: self.max_steps,
                span,
            });
        }
        Ok(())
    }

    fn exec_body(&mut self, body: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in body {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        self.tick(stmt.span)?;
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                let value = self.eval(value)?;
                self.globals.insert(target.node.clone(), value);
            }
            StmtKind::Expr(expr) => {
                self.eval(expr)?;
            }
            StmtKind::Pass => {}
            StmtKind::If { test, body, orelse } => {
                if self.eval(test)?.truthy() {
                    self.exec_body(body)?;
                } else {
                    self.exec_body(orelse)?;
                }
            }
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            } => {
                let items = iterate(self.eval(iter)?, iter.span)?;
                for item in items {
                    self.globals.insert(target.node.clone(), item);
                    self.exec_body(body)?;
                }
                // No `break` exists, so the else body always runs.
                self.exec_body(orelse)?;
            }
        }
        Ok(())
    }

    fn eval(&mut self, expr: &Spanned<Expr>) -> Result<Value, RuntimeError> {
        let span = expr.span;
        match &expr.node {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Int(n) => Value::Int(*n),
                Literal::Float(x) => Value::Float(*x),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::None => Value::None,
            }),
            Expr::Name(name) => match self.globals.get(name) {
                Some(value) => Ok(value.clone()),
                None if builtins::is_builtin(name) => Err(RuntimeError::TypeError {
                    message: format!("builtin '{}' can only be called", name),
                    span,
                }),
                None => Err(RuntimeError::UndefinedName {
                    name: name.clone(),
                    span,
                }),
            },
            Expr::List(elts) => {
                let items = elts
                    .iter()
                    .map(|e| self.eval(e))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(items))
            }
            Expr::Call { func, args } => self.call(func, args, span),
            Expr::BinOp { op, lhs, rhs } => {
                let l = self.eval(lhs)?;
                let r = self.eval(rhs)?;
                let budget = self.max_steps.saturating_sub(self.steps);
                binary(*op, l, r, budget, span)
            }
            Expr::UnaryOp { op, operand } => {
                let v = self.eval(operand)?;
                unary(*op, v, span)
            }
            Expr::BoolOp { op, values } => {
                // Short-circuit, yielding the operand that decided the result.
                let mut last = Value::None;
                for value in values {
                    last = self.eval(value)?;
                    let decided = match op {
                        BoolOp::And => !last.truthy(),
                        BoolOp::Or => last.truthy(),
                    };
                    if decided {
                        break;
                    }
                }
                Ok(last)
            }
            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                let mut lhs = self.eval(left)?;
                for (op, comparator) in ops.iter().zip(comparators) {
                    let rhs = self.eval(comparator)?;
                    if !compare(*op, &lhs, &rhs, span)? {
                        return Ok(Value::Bool(false));
                    }
                    lhs = rhs;
                }
                Ok(Value::Bool(true))
            }
        }
    }

    fn call(
        &mut self,
        func: &Spanned<Expr>,
        args: &[Spanned<Expr>],
        span: Span,
    ) -> Result<Value, RuntimeError> {
        let name = match &func.node {
            Expr::Name(name) if !self.globals.contains_key(name) => name,
            _ => {
                let callee = self.eval(func)?;
                return Err(RuntimeError::TypeError {
                    message: format!("'{}' object is not callable", callee.type_name()),
                    span,
                });
            }
        };
        if !builtins::is_builtin(name) {
            return Err(RuntimeError::UndefinedName {
                name: name.clone(),
                span: func.span,
            });
        }

        let values = args
            .iter()
            .map(|a| self.eval(a))
            .collect::<Result<Vec<_>, _>>()?;
        self.tick(span)?;
        let budget = self.max_steps.saturating_sub(self.steps);
        builtins::call(name, values, &mut self.output, budget, span)
    }
}

fn iterate(value: Value, span: Span) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::List(items) => Ok(items.as_ref().clone()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        other => Err(type_error(
            format!("'{}' object is not iterable", other.type_name()),
            span,
        )),
    }
}

fn type_error(message: String, span: Span) -> RuntimeError {
    RuntimeError::TypeError { message, span }
}

fn unsupported(op: &str, l: &Value, r: &Value, span: Span) -> RuntimeError {
    type_error(
        format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            op,
            l.type_name(),
            r.type_name()
        ),
        span,
    )
}

/// `budget` bounds the length of a repeated sequence, the same way it
/// bounds `range`.
fn binary(
    op: BinOp,
    l: Value,
    r: Value,
    budget: u64,
    span: Span,
) -> Result<Value, RuntimeError> {
    let overflow = RuntimeError::Overflow { span };
    let repeated_len = |len: usize, n: &Value| -> Result<(usize, usize), RuntimeError> {
        let times = n.as_int().unwrap_or(0).max(0) as usize;
        let total = len
            .checked_mul(times)
            .ok_or(RuntimeError::Overflow { span })?;
        if total as u64 > budget {
            return Err(RuntimeError::StepLimit {
                limit: budget,
                span,
            });
        }
        Ok((times, total))
    };

    // Sequences first: concatenation and repetition.
    match (op, &l, &r) {
        (BinOp::Add, Value::Str(a), Value::Str(b)) => return Ok(Value::Str(format!("{}{}", a, b))),
        (BinOp::Add, Value::List(a), Value::List(b)) => {
            return Ok(Value::list(a.iter().chain(b.iter()).cloned().collect()))
        }
        (BinOp::Mul, Value::Str(s), n) | (BinOp::Mul, n, Value::Str(s)) if n.as_int().is_some() => {
            let (times, total) = repeated_len(s.len(), n)?;
            if total == 0 {
                return Ok(Value::Str(String::new()));
            }
            return Ok(Value::Str(s.repeat(times)));
        }
        (BinOp::Mul, Value::List(items), n) | (BinOp::Mul, n, Value::List(items))
            if n.as_int().is_some() =>
        {
            let (_, total) = repeated_len(items.len(), n)?;
            return Ok(Value::list(items.iter().cycle().take(total).cloned().collect()));
        }
        _ => {}
    }

    if let (Some(a), Some(b)) = (l.as_int(), r.as_int()) {
        return match op {
            BinOp::Add => a.checked_add(b).map(Value::Int).ok_or(overflow),
            BinOp::Sub => a.checked_sub(b).map(Value::Int).ok_or(overflow),
            BinOp::Mul => a.checked_mul(b).map(Value::Int).ok_or(overflow),
            BinOp::Div => {
                if b == 0 {
                    return Err(RuntimeError::ZeroDivision { span });
                }
                Ok(Value::Float(a as f64 / b as f64))
            }
            BinOp::FloorDiv => floor_div(a, b, span).map(Value::Int),
            BinOp::Mod => floor_mod(a, b, span).map(Value::Int),
        };
    }

    let (Some(a), Some(b)) = (l.as_float(), r.as_float()) else {
        return Err(unsupported(op.as_str(), &l, &r, span));
    };
    if b == 0.0 && matches!(op, BinOp::Div | BinOp::FloorDiv | BinOp::Mod) {
        return Err(RuntimeError::ZeroDivision { span });
    }
    let value = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::FloorDiv => (a / b).floor(),
        BinOp::Mod => {
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) {
                r + b
            } else {
                r
            }
        }
    };
    Ok(Value::Float(value))
}

/// Integer division rounding towards negative infinity.
fn floor_div(a: i64, b: i64, span: Span) -> Result<i64, RuntimeError> {
    if b == 0 {
        return Err(RuntimeError::ZeroDivision { span });
    }
    let q = a.checked_div(b).ok_or(RuntimeError::Overflow { span })?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Remainder with the sign of the divisor.
fn floor_mod(a: i64, b: i64, span: Span) -> Result<i64, RuntimeError> {
    if b == 0 {
        return Err(RuntimeError::ZeroDivision { span });
    }
    let r = a.checked_rem(b).ok_or(RuntimeError::Overflow { span })?;
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn unary(op: UnaryOp, v: Value, span: Span) -> Result<Value, RuntimeError> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!v.truthy())),
        UnaryOp::Neg => match v {
            Value::Float(x) => Ok(Value::Float(-x)),
            other => match other.as_int() {
                Some(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or(RuntimeError::Overflow { span }),
                None => Err(type_error(
                    format!("bad operand type for unary -: '{}'", other.type_name()),
                    span,
                )),
            },
        },
        UnaryOp::Pos => match v {
            Value::Float(x) => Ok(Value::Float(x)),
            other => match other.as_int() {
                Some(n) => Ok(Value::Int(n)),
                None => Err(type_error(
                    format!("bad operand type for unary +: '{}'", other.type_name()),
                    span,
                )),
            },
        },
    }
}

fn compare(op: CmpOp, l: &Value, r: &Value, span: Span) -> Result<bool, RuntimeError> {
    use std::cmp::Ordering;

    let ordered = |accept: fn(Ordering) -> bool| -> Result<bool, RuntimeError> {
        match l.py_cmp(r) {
            Some(ord) => Ok(accept(ord)),
            // NaN compares false against everything.
            None if l.as_float().is_some() && r.as_float().is_some() => Ok(false),
            None => Err(type_error(
                format!(
                    "'{}' not supported between instances of '{}' and '{}'",
                    op.as_str(),
                    l.type_name(),
                    r.type_name()
                ),
                span,
            )),
        }
    };

    match op {
        CmpOp::Eq => Ok(l.py_eq(r)),
        CmpOp::NotEq => Ok(!l.py_eq(r)),
        CmpOp::Lt => ordered(|o| o == Ordering::Less),
        CmpOp::LtE => ordered(|o| o != Ordering::Greater),
        CmpOp::Gt => ordered(|o| o == Ordering::Greater),
        CmpOp::GtE => ordered(|o| o != Ordering::Less),
        CmpOp::Is => Ok(l.is_same(r)),
        CmpOp::IsNot => Ok(!l.is_same(r)),
        CmpOp::In => contains(r, l, span),
        CmpOp::NotIn => contains(r, l, span).map(|found| !found),
    }
}

fn contains(container: &Value, item: &Value, span: Span) -> Result<bool, RuntimeError> {
    match (container, item) {
        (Value::List(items), _) => Ok(items.iter().any(|x| x.py_eq(item))),
        (Value::Str(haystack), Value::Str(needle)) => Ok(haystack.contains(needle.as_str())),
        (Value::Str(_), other) => Err(type_error(
            format!(
                "'in <string>' requires string as left operand, not {}",
                other.type_name()
            ),
            span,
        )),
        (other, _) => Err(type_error(
            format!("argument of type '{}' is not iterable", other.type_name()),
            span,
        )),
    }
}
