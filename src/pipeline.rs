//! Pass selection, ordering checks, and the parse → rewrite → print driver.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, info_span};

use crate::ast::Module;
use crate::diagnostic::Diagnostic;
use crate::passes::{PassContext, PassError, PassId};
use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// A pass that reads depth annotations has no valid annotation at its
    /// position in the pipeline.
    #[error("pass {index} ({pass}) needs a depth annotation, but none is available at that point")]
    MissingAnnotation {
        index: usize,
        pass: PassId,
        /// The pass that made an earlier annotation stale, if any.
        invalidated_by: Option<PassId>,
    },

    #[error(transparent)]
    Pass(#[from] PassError),
}

impl From<PipelineError> for Diagnostic {
    fn from(err: PipelineError) -> Self {
        let message = err.to_string();
        match err {
            PipelineError::Pass(pass_err) => Diagnostic::from(pass_err),
            PipelineError::MissingAnnotation {
                invalidated_by, ..
            } => {
                let diag = Diagnostic::error(message, Span::dummy()).with_help(
                    "place NodeDepthAnnotator directly before IfDepthMaximizer".to_string(),
                );
                match invalidated_by {
                    Some(stale) => diag.with_note(format!(
                        "{} changes statement shapes and discards earlier annotations",
                        stale
                    )),
                    None => diag,
                }
            }
        }
    }
}

/// An ordered list of passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipeline {
    passes: Vec<PassId>,
}

impl Pipeline {
    pub fn new(passes: Vec<PassId>) -> Self {
        Self { passes }
    }

    /// The full obfuscating order: connectives, then comparisons, then the
    /// depth-driven branch swap, then loop unrolling.
    pub fn default_order() -> Self {
        Self::new(vec![
            PassId::DeMorganFlipper,
            PassId::DoubleNegativeCreator,
            PassId::NodeDepthAnnotator,
            PassId::IfDepthMaximizer,
            PassId::ForLoopUnroller,
        ])
    }

    pub fn passes(&self) -> &[PassId] {
        &self.passes
    }

    /// Check the ordering constraint without running anything: every pass
    /// that reads depth must follow a `NodeDepthAnnotator` with no
    /// depth-invalidating pass in between.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut annotated = false;
        let mut invalidated_by = None;
        for (index, &pass) in self.passes.iter().enumerate() {
            if pass.requires_depth() && !annotated {
                return Err(PipelineError::MissingAnnotation {
                    index,
                    pass,
                    invalidated_by,
                });
            }
            if pass == PassId::NodeDepthAnnotator {
                annotated = true;
                invalidated_by = None;
            } else if pass.invalidates_depth() && annotated {
                annotated = false;
                invalidated_by = Some(pass);
            }
        }
        Ok(())
    }

    /// Validate, then run every pass once over `module`, in order.
    ///
    /// On a pass failure the remaining passes are skipped. A failing pass
    /// does not touch the module, so it is left as the previous pass
    /// produced it.
    pub fn run(&self, module: &mut Module) -> Result<RunReport, PipelineError> {
        self.validate()?;

        let _guard = info_span!("pipeline", passes = self.passes.len()).entered();
        let started = Instant::now();
        let mut ctx = PassContext::default();
        let mut report = RunReport::default();

        for &id in &self.passes {
            let mut pass = id.instantiate();
            let pass_started = Instant::now();
            let rewrites = pass.run(module, &mut ctx)?;
            if pass.invalidates_depth() {
                ctx.depth = None;
            }
            let elapsed = pass_started.elapsed();
            info!(pass = %id, rewrites, ?elapsed, "pass finished");
            report.passes.push(PassRun {
                pass: id,
                rewrites,
                elapsed,
            });
        }

        report.elapsed = started.elapsed();
        info!(
            statements = module.stmt_count(),
            elapsed = ?report.elapsed,
            "pipeline complete"
        );
        Ok(report)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_order()
    }
}

/// One executed pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassRun {
    pub pass: PassId,
    /// Nodes rewritten, or statements annotated for the depth analysis.
    pub rewrites: usize,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub passes: Vec<PassRun>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn rewrites(&self, pass: PassId) -> usize {
        self.passes
            .iter()
            .filter(|run| run.pass == pass)
            .map(|run| run.rewrites)
            .sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.passes {
            writeln!(
                f,
                "  {:<24} {:>6} rewrites  {:.2?}",
                run.pass.name(),
                run.rewrites,
                run.elapsed
            )?;
        }
        write!(f, "  total {:.2?}", self.elapsed)
    }
}

/// Parse `source`, run `passes` over it, and print the result.
pub fn beautify(passes: &[PassId], source: &str) -> Result<String, Vec<Diagnostic>> {
    let pipeline = Pipeline::new(passes.to_vec());
    pipeline.validate().map_err(|e| vec![Diagnostic::from(e)])?;
    let mut module = crate::parse_source_silent(source)?;
    pipeline
        .run(&mut module)
        .map_err(|e| vec![Diagnostic::from(e)])?;
    Ok(crate::format::format_module(&module))
}
