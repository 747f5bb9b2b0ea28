//! Rewrite passes over a parsed `Module`.
//!
//! Each pass is one bottom-up traversal. Passes that change the shape of a
//! statement body report `invalidates_depth()`; the pipeline drops any
//! `DepthAnnotation` after running one of them.

pub mod demorgan;
pub mod depth;
pub mod double_negative;
pub mod if_depth;
pub mod safety;
pub mod unroll;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ast::Module;
use crate::diagnostic::Diagnostic;
use crate::span::Span;

pub use demorgan::DeMorganFlipper;
pub use depth::{DepthAnnotation, NodeDepthAnnotator};
pub use double_negative::DoubleNegativeCreator;
pub use if_depth::IfDepthMaximizer;
pub use safety::SafetyPasser;
pub use unroll::ForLoopUnroller;

/// Failure of a single pass. The first failure aborts the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PassError {
    /// Operator text with no entry in the inversion tables.
    #[error("unknown operator `{symbol}`")]
    UnknownOperator { symbol: String, span: Span },

    /// A depth-driven pass visited a statement with no depth annotation.
    #[error("statement has no depth annotation")]
    MissingAnnotation { span: Span },
}

impl PassError {
    pub fn span(&self) -> Span {
        match self {
            PassError::UnknownOperator { span, .. } | PassError::MissingAnnotation { span } => *span,
        }
    }
}

impl From<PassError> for Diagnostic {
    fn from(err: PassError) -> Self {
        let diag = Diagnostic::error(err.to_string(), err.span());
        match err {
            PassError::UnknownOperator { .. } => diag,
            PassError::MissingAnnotation { .. } => diag
                .with_help("run NodeDepthAnnotator earlier in the pipeline".to_string()),
        }
    }
}

/// State threaded between passes of one pipeline run.
#[derive(Debug, Default)]
pub struct PassContext {
    /// Present only between a `NodeDepthAnnotator` and the next pass that
    /// invalidates depth.
    pub depth: Option<DepthAnnotation>,
}

/// A single tree rewrite.
pub trait Pass {
    fn id(&self) -> PassId;

    /// Whether running this pass makes existing depth annotations stale.
    fn invalidates_depth(&self) -> bool {
        self.id().invalidates_depth()
    }

    /// Run the pass over the whole module; returns the number of nodes
    /// rewritten (or annotated).
    fn run(&mut self, module: &mut Module, ctx: &mut PassContext) -> Result<usize, PassError>;
}

/// Names of the available passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassId {
    SafetyPasser,
    ForLoopUnroller,
    DeMorganFlipper,
    DoubleNegativeCreator,
    NodeDepthAnnotator,
    IfDepthMaximizer,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pass `{0}` (run `beautify passes` for the list)")]
pub struct UnknownPass(pub String);

impl PassId {
    pub const ALL: [PassId; 6] = [
        PassId::SafetyPasser,
        PassId::ForLoopUnroller,
        PassId::DeMorganFlipper,
        PassId::DoubleNegativeCreator,
        PassId::NodeDepthAnnotator,
        PassId::IfDepthMaximizer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassId::SafetyPasser => "SafetyPasser",
            PassId::ForLoopUnroller => "ForLoopUnroller",
            PassId::DeMorganFlipper => "DeMorganFlipper",
            PassId::DoubleNegativeCreator => "DoubleNegativeCreator",
            PassId::NodeDepthAnnotator => "NodeDepthAnnotator",
            PassId::IfDepthMaximizer => "IfDepthMaximizer",
        }
    }

    pub fn kebab_name(self) -> &'static str {
        match self {
            PassId::SafetyPasser => "safety-passer",
            PassId::ForLoopUnroller => "for-loop-unroller",
            PassId::DeMorganFlipper => "de-morgan-flipper",
            PassId::DoubleNegativeCreator => "double-negative-creator",
            PassId::NodeDepthAnnotator => "node-depth-annotator",
            PassId::IfDepthMaximizer => "if-depth-maximizer",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PassId::SafetyPasser => "append `pass` to both branches of every conditional",
            PassId::ForLoopUnroller => "unroll loops over list literals and literal ranges",
            PassId::DeMorganFlipper => "rewrite `a or b` as `not (not a and not b)`",
            PassId::DoubleNegativeCreator => "rewrite `a < b` as `not a >= b`",
            PassId::NodeDepthAnnotator => "record the nesting depth of every statement",
            PassId::IfDepthMaximizer => "put the deeper branch of each conditional first",
        }
    }

    pub fn invalidates_depth(self) -> bool {
        matches!(self, PassId::SafetyPasser | PassId::ForLoopUnroller)
    }

    pub fn requires_depth(self) -> bool {
        matches!(self, PassId::IfDepthMaximizer)
    }

    pub fn instantiate(self) -> Box<dyn Pass> {
        match self {
            PassId::SafetyPasser => Box::new(SafetyPasser),
            PassId::ForLoopUnroller => Box::new(ForLoopUnroller::default()),
            PassId::DeMorganFlipper => Box::new(DeMorganFlipper),
            PassId::DoubleNegativeCreator => Box::new(DoubleNegativeCreator),
            PassId::NodeDepthAnnotator => Box::new(NodeDepthAnnotator),
            PassId::IfDepthMaximizer => Box::new(IfDepthMaximizer),
        }
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PassId {
    type Err = UnknownPass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PassId::ALL
            .into_iter()
            .find(|id| id.name() == s || id.kebab_name() == s)
            .ok_or_else(|| UnknownPass(s.to_string()))
    }
}

/// Parse a comma-separated pass list such as `"DeMorganFlipper,safety-passer"`.
pub fn parse_pass_list(list: &str) -> Result<Vec<PassId>, UnknownPass> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_ids_parse_canonical_and_kebab() {
        for id in PassId::ALL {
            assert_eq!(id.name().parse::<PassId>().unwrap(), id);
            assert_eq!(id.kebab_name().parse::<PassId>().unwrap(), id);
            assert_eq!(id.to_string(), id.name());
        }
    }

    #[test]
    fn test_pass_names_are_case_sensitive() {
        assert_eq!(
            "demorganflipper".parse::<PassId>(),
            Err(UnknownPass("demorganflipper".to_string()))
        );
    }

    #[test]
    fn test_parse_pass_list() {
        let list = parse_pass_list("DeMorganFlipper, node-depth-annotator,,IfDepthMaximizer").unwrap();
        assert_eq!(
            list,
            vec![
                PassId::DeMorganFlipper,
                PassId::NodeDepthAnnotator,
                PassId::IfDepthMaximizer
            ]
        );
        assert!(parse_pass_list("DeMorganFlipper,Bogus").is_err());
        assert!(parse_pass_list("").unwrap().is_empty());
    }

    #[test]
    fn test_instantiated_passes_report_their_id() {
        for id in PassId::ALL {
            let pass = id.instantiate();
            assert_eq!(pass.id(), id);
            assert_eq!(pass.invalidates_depth(), id.invalidates_depth());
        }
    }

    #[test]
    fn test_only_shape_changing_passes_invalidate_depth() {
        let invalidating: Vec<_> = PassId::ALL
            .into_iter()
            .filter(|id| id.invalidates_depth())
            .collect();
        assert_eq!(
            invalidating,
            vec![PassId::SafetyPasser, PassId::ForLoopUnroller]
        );
    }

    #[test]
    fn test_pass_error_to_diagnostic() {
        let diag = Diagnostic::from(PassError::MissingAnnotation {
            span: Span::new(4, 9),
        });
        assert_eq!(diag.span, Span::new(4, 9));
        assert!(diag.help.unwrap().contains("NodeDepthAnnotator"));

        let diag = Diagnostic::from(PassError::UnknownOperator {
            symbol: "<>".to_string(),
            span: Span::new(1, 3),
        });
        assert_eq!(diag.message, "unknown operator `<>`");
    }
}
