//! Forward checking: after an assignment, every unassigned variable sharing
//! a constraint with it keeps only the values that still have a supporting
//! tuple. Each touched constraint is revised once; nothing is re-queued.

use super::{check_complete, revise, touched, Conflict, PropagationContext};
use crate::model::VarId;

pub(super) fn propagate(
    context: &mut PropagationContext<'_>,
    assigned: Option<VarId>,
) -> Result<(), Conflict> {
    for constraint in touched(context.model(), assigned) {
        let model = context.model();
        let pending: Vec<VarId> = model.constraint(constraint).unassigned(model).collect();
        match (assigned, pending.as_slice()) {
            (_, []) => check_complete(model, constraint)?,
            // At the root only constraints down to their last variable are filtered.
            (None, &[last]) => {
                revise(context, constraint, last)?;
            }
            (None, _) => {}
            (Some(_), open) => {
                for &var in open {
                    revise(context, constraint, var)?;
                }
            }
        }
    }
    Ok(())
}
