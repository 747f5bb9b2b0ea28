use crate::diagnostic::Diagnostic;
use crate::runtime::run_module;

#[derive(Clone, Copy, Debug)]
pub(super) enum Side {
    Original,
    Transformed,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Original => "original",
            Side::Transformed => "transformed",
        }
    }
}

/// Parse and run one program, returning its captured output or a
/// one-line reason naming the side and the source position.
pub(super) fn run_program(side: Side, source: &str, max_steps: u64) -> Result<String, String> {
    let module = crate::parse_source_silent(source).map_err(|errors| {
        match errors.first() {
            Some(first) => describe(side, "failed to parse", first, source),
            None => format!("{} program failed to parse", side.label()),
        }
    })?;
    run_module(&module, max_steps)
        .map_err(|err| describe(side, "failed at runtime", &Diagnostic::from(err), source))
}

fn describe(side: Side, what: &str, diag: &Diagnostic, source: &str) -> String {
    let (line, col) = diag.span.line_col(source);
    format!(
        "{} program {}: {} (line {}, column {})",
        side.label(),
        what,
        diag.message,
        line,
        col
    )
}

/// First differing output line, 1-based, with each side's text at that
/// line (`None` once a side has run out of lines).
pub(super) fn first_divergence(
    expected: &str,
    actual: &str,
) -> Option<(usize, Option<String>, Option<String>)> {
    let mut left = expected.lines();
    let mut right = actual.lines();
    let mut line = 0;
    loop {
        line += 1;
        match (left.next(), right.next()) {
            (None, None) => return None,
            (Some(a), Some(b)) if a == b => continue,
            (a, b) => return Some((line, a.map(str::to_string), b.map(str::to_string))),
        }
    }
}
