use tracing::debug;

use super::{Pass, PassContext, PassError, PassId};
use crate::ast::visit::rewrite_stmts;
use crate::ast::{Module, StmtKind};

/// Appends a `pass` to both branches of every conditional, on every run.
/// Re-running it only ever appends; nothing is deduplicated.
pub struct SafetyPasser;

impl Pass for SafetyPasser {
    fn id(&self) -> PassId {
        PassId::SafetyPasser
    }

    fn run(&mut self, module: &mut Module, _ctx: &mut PassContext) -> Result<usize, PassError> {
        let ids = &mut module.ids;
        let mut rewrites = 0;
        module.body = rewrite_stmts(std::mem::take(&mut module.body), &mut |mut stmt| {
            let span = stmt.span;
            if let StmtKind::If { body, orelse, .. } = &mut stmt.kind {
                body.push(ids.stmt(StmtKind::Pass, span));
                orelse.push(ids.stmt(StmtKind::Pass, span));
                rewrites += 1;
                debug!(at = %span, "appended pass to both branches");
            }
            Ok::<_, PassError>(vec![stmt])
        })?;
        Ok(rewrites)
    }
}
