use super::value::Value;
use super::RuntimeError;
use crate::span::Span;

pub(super) const BUILTINS: [&str; 7] = ["print", "range", "len", "str", "abs", "min", "max"];

pub(super) fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Call a builtin by name. `print` writes to `out`; `budget` bounds the
/// size of lists that `range` may materialise.
pub(super) fn call(
    name: &str,
    args: Vec<Value>,
    out: &mut String,
    budget: u64,
    span: Span,
) -> Result<Value, RuntimeError> {
    match name {
        "print" => {
            let line: Vec<String> = args.iter().map(Value::to_string).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
            Ok(Value::None)
        }
        "range" => range(&args, budget, span),
        "len" => {
            let [arg] = expect_args::<1>(name, args, span)?;
            let len = match &arg {
                Value::Str(s) => s.chars().count(),
                Value::List(items) => items.len(),
                other => {
                    return Err(type_error(
                        format!("object of type '{}' has no len()", other.type_name()),
                        span,
                    ))
                }
            };
            Ok(Value::Int(len as i64))
        }
        "str" => match args.len() {
            0 => Ok(Value::Str(String::new())),
            _ => {
                let [arg] = expect_args::<1>(name, args, span)?;
                Ok(Value::Str(arg.to_string()))
            }
        },
        "abs" => {
            let [arg] = expect_args::<1>(name, args, span)?;
            match arg {
                Value::Float(x) => Ok(Value::Float(x.abs())),
                other => match other.as_int() {
                    Some(n) => n
                        .checked_abs()
                        .map(Value::Int)
                        .ok_or(RuntimeError::Overflow { span }),
                    None => Err(type_error(
                        format!("bad operand type for abs(): '{}'", other.type_name()),
                        span,
                    )),
                },
            }
        }
        "min" => extremum(name, args, std::cmp::Ordering::Less, span),
        "max" => extremum(name, args, std::cmp::Ordering::Greater, span),
        _ => Err(RuntimeError::UndefinedName {
            name: name.to_string(),
            span,
        }),
    }
}

fn expect_args<const N: usize>(
    name: &str,
    args: Vec<Value>,
    span: Span,
) -> Result<[Value; N], RuntimeError> {
    let given = args.len();
    args.try_into().map_err(|_| {
        type_error(
            format!("{}() takes {} argument(s) ({} given)", name, N, given),
            span,
        )
    })
}

fn type_error(message: String, span: Span) -> RuntimeError {
    RuntimeError::TypeError { message, span }
}

fn range(args: &[Value], budget: u64, span: Span) -> Result<Value, RuntimeError> {
    let mut bounds = Vec::with_capacity(args.len());
    for arg in args {
        match arg.as_int() {
            Some(n) => bounds.push(n),
            None => {
                return Err(type_error(
                    format!(
                        "'{}' object cannot be interpreted as an integer",
                        arg.type_name()
                    ),
                    span,
                ))
            }
        }
    }
    let (start, stop, step) = match bounds.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => {
            return Err(type_error(
                format!("range expected 1 to 3 arguments, got {}", bounds.len()),
                span,
            ))
        }
    };
    if step == 0 {
        return Err(RuntimeError::ValueError {
            message: "range() arg 3 must not be zero".to_string(),
            span,
        });
    }

    let (start, stop, step) = (start as i128, stop as i128, step as i128);
    let len = if (step > 0 && start < stop) || (step < 0 && start > stop) {
        ((stop - start).abs() - 1) / step.abs() + 1
    } else {
        0
    };
    if len > budget as i128 {
        return Err(RuntimeError::StepLimit {
            limit: budget,
            span,
        });
    }
    let items = (0..len)
        .map(|k| Value::Int((start + k * step) as i64))
        .collect();
    Ok(Value::list(items))
}

/// `min`/`max` over either one list argument or several arguments. Ties
/// keep the first candidate.
fn extremum(
    name: &str,
    args: Vec<Value>,
    wanted: std::cmp::Ordering,
    span: Span,
) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        return Err(type_error(
            format!("{} expected at least 1 argument, got 0", name),
            span,
        ));
    }
    let candidates = if args.len() == 1 {
        match args.into_iter().next() {
            Some(Value::List(items)) => items.as_ref().clone(),
            other => {
                return Err(type_error(
                    format!(
                        "'{}' object is not iterable",
                        other.map_or("NoneType", |v| v.type_name())
                    ),
                    span,
                ))
            }
        }
    } else {
        args
    };

    let mut iter = candidates.into_iter();
    let Some(mut best) = iter.next() else {
        return Err(RuntimeError::ValueError {
            message: format!("{}() arg is an empty sequence", name),
            span,
        });
    };
    for candidate in iter {
        match candidate.py_cmp(&best) {
            Some(ord) if ord == wanted => best = candidate,
            Some(_) => {}
            None => {
                return Err(type_error(
                    format!(
                        "'{}' not supported between instances of '{}' and '{}'",
                        if wanted == std::cmp::Ordering::Less { "<" } else { ">" },
                        candidate.type_name(),
                        best.type_name()
                    ),
                    span,
                ))
            }
        }
    }
    Ok(best)
}
