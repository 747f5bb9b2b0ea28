//! Behavioural equivalence checking for a program and its rewritten form.
//!
//! Both programs run under the interpreter with the same step budget and
//! their captured stdout is compared line by line. This tests equivalence
//! on one execution; it proves nothing about other inputs.

mod differential;

use std::fmt;

use tracing::debug;

use crate::runtime::DEFAULT_MAX_STEPS;

use differential::{first_divergence, run_program, Side};

// ─── Result Types ──────────────────────────────────────────────────

/// Result of an equivalence check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquivalenceReport {
    pub verdict: Verdict,
    /// Output lines produced by the original program.
    pub original_lines: usize,
    /// Output lines produced by the transformed program.
    pub transformed_lines: usize,
}

impl EquivalenceReport {
    pub fn is_equivalent(&self) -> bool {
        self.verdict == Verdict::Equivalent
    }

    /// Format a human-readable report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("Equivalence check: original vs transformed\n");
        report.push_str(&format!(
            "  Output lines: {} vs {}\n",
            self.original_lines, self.transformed_lines
        ));
        report.push_str(&format!("  Verdict: {}\n", self.verdict));
        match &self.verdict {
            Verdict::Equivalent => {}
            Verdict::Diverged {
                line,
                expected,
                actual,
            } => {
                report.push_str(&format!("  First divergence at output line {}:\n", line));
                report.push_str(&format!("    expected: {}\n", show_line(expected)));
                report.push_str(&format!("    actual:   {}\n", show_line(actual)));
            }
            Verdict::Failed(reason) => {
                report.push_str(&format!("  Reason: {}\n", reason));
            }
        }
        report
    }
}

fn show_line(line: &Option<String>) -> String {
    match line {
        Some(text) => format!("{:?}", text),
        None => "<end of output>".to_string(),
    }
}

/// Verdict of an equivalence check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Both programs printed exactly the same lines.
    Equivalent,
    /// The outputs differ first at `line` (1-based). `None` means that
    /// side had already stopped printing.
    Diverged {
        line: usize,
        expected: Option<String>,
        actual: Option<String>,
    },
    /// One of the programs could not be parsed or run to completion.
    Failed(String),
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Equivalent => write!(f, "EQUIVALENT"),
            Verdict::Diverged { .. } => write!(f, "DIVERGED"),
            Verdict::Failed(_) => write!(f, "FAILED"),
        }
    }
}

// ─── Main Entry Point ──────────────────────────────────────────────

/// Run `original` and `transformed` and compare what they print, using the
/// default step budget.
pub fn check_equivalence(original: &str, transformed: &str) -> EquivalenceReport {
    check_equivalence_with(original, transformed, DEFAULT_MAX_STEPS)
}

/// As [`check_equivalence`], with an explicit step budget for each side.
pub fn check_equivalence_with(
    original: &str,
    transformed: &str,
    max_steps: u64,
) -> EquivalenceReport {
    let expected = run_program(Side::Original, original, max_steps);
    let actual = run_program(Side::Transformed, transformed, max_steps);

    let (expected, actual) = match (expected, actual) {
        (Ok(expected), Ok(actual)) => (expected, actual),
        (Err(reason), _) | (_, Err(reason)) => {
            debug!(%reason, "equivalence check failed");
            return EquivalenceReport {
                verdict: Verdict::Failed(reason),
                original_lines: 0,
                transformed_lines: 0,
            };
        }
    };

    let verdict = match first_divergence(&expected, &actual) {
        Some((line, expected, actual)) => Verdict::Diverged {
            line,
            expected,
            actual,
        },
        None => Verdict::Equivalent,
    };
    debug!(%verdict, "equivalence check finished");
    EquivalenceReport {
        verdict,
        original_lines: expected.lines().count(),
        transformed_lines: actual.lines().count(),
    }
}
