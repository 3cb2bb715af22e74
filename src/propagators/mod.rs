//! Domain filtering run by the search after every decision.
//!
//! The set of strategies is closed; [`Propagator`] dispatches to them.
//! Every strategy works through a [`PropagationContext`], which records each
//! pruning on the search trail so that it is undone on backtrack.

mod arc_consistency;
mod forward_checking;

use std::collections::VecDeque;
use thiserror::Error;

use crate::constraints::ConstraintId;
use crate::model::{Model, VarId};
use crate::search::trail::{Change, Trail};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How much filtering the search performs after each assignment.
///
/// All three reach the same verdict on every model; they differ only in how
/// early a dead end is noticed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Propagator {
    /// Only check constraints whose scope has just become fully assigned.
    None,
    /// Filter the last unassigned variable of each touched constraint.
    #[default]
    ForwardChecking,
    /// Generalized arc consistency, to a fixpoint.
    Gac,
}

impl Propagator {
    pub const ALL: [Propagator; 3] = [
        Propagator::None,
        Propagator::ForwardChecking,
        Propagator::Gac,
    ];

    /// Filters domains after `assigned` was assigned, or at the root when
    /// `assigned` is `None`.
    ///
    /// # Errors
    ///
    /// The first [`Conflict`] found. Prunings made before it stay on the
    /// trail and are undone by the caller's backtrack.
    pub(crate) fn propagate(
        self,
        context: &mut PropagationContext<'_>,
        assigned: Option<VarId>,
    ) -> Result<(), Conflict> {
        match self {
            Propagator::None => check_assigned(context.model(), assigned),
            Propagator::ForwardChecking => forward_checking::propagate(context, assigned),
            Propagator::Gac => arc_consistency::propagate(context, assigned),
        }
    }
}

impl std::fmt::Display for Propagator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Propagator::None => "none",
            Propagator::ForwardChecking => "forward checking",
            Propagator::Gac => "GAC",
        };
        write!(f, "{name}")
    }
}

/// Why propagation gave up on the current branch.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    #[error("variable {0} has no value left")]
    Wipeout(VarId),

    #[error("constraint {} is violated by the current assignment", .0.index())]
    Violated(ConstraintId),
}

/// The propagators' view of the search state.
///
/// Reads go through [`model`](Self::model); the only write is
/// [`prune`](Self::prune), which is trailed and attributed to the variable
/// whose assignment triggered this propagation.
pub struct PropagationContext<'a> {
    model: &'a mut Model,
    trail: &'a mut Trail<Change>,
    cause: Option<VarId>,
    prunings: u64,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        model: &'a mut Model,
        trail: &'a mut Trail<Change>,
        cause: Option<VarId>,
    ) -> Self {
        Self {
            model,
            trail,
            cause,
            prunings: 0,
        }
    }

    pub fn model(&self) -> &Model {
        self.model
    }

    /// Number of values removed through this context.
    pub fn prunings(&self) -> u64 {
        self.prunings
    }

    pub(crate) fn prune(&mut self, var: VarId, value: usize) {
        self.model.variable_mut(var).prune(value, self.cause);
        self.trail.push(Change::Pruned { var, value });
        self.prunings += 1;
    }
}

/// Rejects the assignment if a constraint with a fully assigned scope fails.
fn check_complete(model: &Model, constraint: ConstraintId) -> Result<(), Conflict> {
    let c = model.constraint(constraint);
    match c.assigned_values(model) {
        Some(values) if !c.check(&values, model) => Err(Conflict::Violated(constraint)),
        _ => Ok(()),
    }
}

fn check_assigned(model: &Model, assigned: Option<VarId>) -> Result<(), Conflict> {
    let Some(var) = assigned else {
        return Ok(());
    };
    model
        .constraints_of(var)
        .iter()
        .try_for_each(|&c| check_complete(model, c))
}

/// Constraints to look at: those touching `assigned`, or all at the root.
fn touched(model: &Model, assigned: Option<VarId>) -> Vec<ConstraintId> {
    match assigned {
        Some(var) => model.constraints_of(var).to_vec(),
        None => model.constraint_ids().collect(),
    }
}

/// Prunes the values of `var` without support in `constraint`.
///
/// Returns whether anything was pruned.
///
/// # Errors
///
/// [`Conflict::Wipeout`] if `var` has no live value afterwards.
fn revise(
    context: &mut PropagationContext<'_>,
    constraint: ConstraintId,
    var: VarId,
) -> Result<bool, Conflict> {
    let model = context.model();
    let c = model.constraint(constraint);
    let Some(position) = c.position_of(var) else {
        return Ok(false);
    };
    let unsupported: Vec<usize> = model
        .variable(var)
        .live_values()
        .filter(|&value| !c.has_support(position, value, model))
        .collect();

    for &value in &unsupported {
        context.prune(var, value);
    }
    if context.model().variable(var).live_count() == 0 {
        return Err(Conflict::Wipeout(var));
    }
    Ok(!unsupported.is_empty())
}

/// FIFO of `(variable, constraint)` arcs without duplicates.
#[derive(Debug, Default)]
struct Worklist {
    queue: VecDeque<(VarId, ConstraintId)>,
}

impl Worklist {
    fn push(&mut self, arc: (VarId, ConstraintId)) {
        if !self.queue.contains(&arc) {
            self.queue.push_back(arc);
        }
    }

    fn pop(&mut self) -> Option<(VarId, ConstraintId)> {
        self.queue.pop_front()
    }
}
