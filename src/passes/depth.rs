use std::collections::HashMap;

use tracing::debug;

use super::{Pass, PassContext, PassError, PassId};
use crate::ast::{Module, NodeId, Stmt};

/// Statement nesting depth, keyed by `NodeId`.
///
/// Leaf statements have depth 0; a conditional or loop has depth
/// 1 + the maximum depth of its direct children across all branches
/// (0 when every branch is empty).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepthAnnotation {
    depths: HashMap<NodeId, u32>,
}

impl DepthAnnotation {
    /// Annotate every statement of `module`.
    pub fn annotate(module: &Module) -> Self {
        let mut annotation = Self::default();
        for stmt in &module.body {
            annotation.visit(stmt);
        }
        annotation
    }

    fn visit(&mut self, stmt: &Stmt) -> u32 {
        let children = stmt
            .child_bodies()
            .into_iter()
            .flatten()
            .map(|child| self.visit(child))
            .max();
        let depth = if stmt.is_container() {
            1 + children.unwrap_or(0)
        } else {
            0
        };
        self.depths.insert(stmt.id, depth);
        depth
    }

    pub fn get(&self, id: NodeId) -> Option<u32> {
        self.depths.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Deepest statement in `body`, 0 for an empty body. Every statement
    /// must be annotated.
    pub fn max_depth(&self, body: &[Stmt]) -> Result<u32, PassError> {
        body.iter().try_fold(0, |deepest, stmt| {
            let depth = self
                .get(stmt.id)
                .ok_or(PassError::MissingAnnotation { span: stmt.span })?;
            Ok(deepest.max(depth))
        })
    }
}

/// Read-only analysis that (re)computes the `DepthAnnotation` for the
/// whole module.
pub struct NodeDepthAnnotator;

impl Pass for NodeDepthAnnotator {
    fn id(&self) -> PassId {
        PassId::NodeDepthAnnotator
    }

    fn run(&mut self, module: &mut Module, ctx: &mut PassContext) -> Result<usize, PassError> {
        let annotation = DepthAnnotation::annotate(module);
        let annotated = annotation.len();
        debug!(annotated, "computed statement depths");
        ctx.depth = Some(annotation);
        Ok(annotated)
    }
}
