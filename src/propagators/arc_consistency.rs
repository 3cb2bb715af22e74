//! Generalized arc consistency.
//!
//! Every value left in an unassigned variable's domain has, in every
//! constraint on that variable, a satisfying tuple drawn from the current
//! domains of the other scope variables. Revisions are driven by a worklist
//! of `(variable, constraint)` arcs until nothing changes.

use super::{check_complete, revise, touched, Conflict, PropagationContext, Worklist};
use crate::model::VarId;

pub(super) fn propagate(
    context: &mut PropagationContext<'_>,
    assigned: Option<VarId>,
) -> Result<(), Conflict> {
    let mut worklist = Worklist::default();

    for constraint in touched(context.model(), assigned) {
        let model = context.model();
        let mut open = model.constraint(constraint).unassigned(model).peekable();
        if open.peek().is_none() {
            check_complete(model, constraint)?;
            continue;
        }
        for var in open {
            worklist.push((var, constraint));
        }
    }

    while let Some((var, constraint)) = worklist.pop() {
        if context.model().variable(var).is_assigned() {
            continue;
        }
        if !revise(context, constraint, var)? {
            continue;
        }
        let model = context.model();
        for &neighbour in model.constraints_of(var) {
            for other in model.constraint(neighbour).unassigned(model) {
                if other != var {
                    worklist.push((other, neighbour));
                }
            }
        }
    }

    Ok(())
}
