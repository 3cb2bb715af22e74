//! The CSP container: slots, variables, constraints and their incidence.
//!
//! All three collections are arenas addressed by index handles
//! ([`SlotId`], [`VarId`], [`ConstraintId`]). Constraints refer to variables
//! and variables' domain values refer to slots only through these handles, so
//! the search can mutate occupancy and domains without shared ownership.
//!
//! # Invariants
//!
//! - The constraint graph is fixed once compiled; only domains, assignments
//!   and slot occupancy change afterwards
//! - Variables are stored in solve order
//! - A slot lists a variable as occupant iff that variable is assigned a span
//!   containing the slot

mod slot;
mod variable;

pub use slot::{Slot, SlotId, SlotTable};
pub use variable::{Span, ValueState, VarId, Variable};

use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::constraints::{Constraint, ConstraintId};

#[derive(Debug, Clone, Default)]
pub struct Model {
    slots: SlotTable,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    /// `incidence[v]` lists the constraints whose scope contains variable `v`.
    incidence: Vec<Vec<ConstraintId>>,
}

impl Model {
    pub fn new(slots: SlotTable) -> Self {
        Self {
            slots,
            ..Self::default()
        }
    }

    pub(crate) fn add_variable(&mut self, variable: Variable) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(variable);
        self.incidence.push(Vec::new());
        id
    }

    /// Adds a constraint and indexes it under every variable of its scope.
    ///
    /// # Panics
    ///
    /// Panics if the scope mentions a variable not in this model.
    pub(crate) fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId(self.constraints.len());
        for &var in constraint.scope() {
            let list = &mut self.incidence[var.0];
            if !list.contains(&id) {
                list.push(id);
            }
        }
        self.constraints.push(constraint);
        id
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id]
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.0]
    }

    pub(crate) fn variable_mut(&mut self, id: VarId) -> &mut Variable {
        &mut self.variables[id.0]
    }

    /// Variable handles in solve order.
    pub fn order(&self) -> Vec<VarId> {
        (0..self.variables.len()).map(VarId).collect()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.0]
    }

    pub fn constraint_ids(&self) -> impl Iterator<Item = ConstraintId> {
        (0..self.constraints.len()).map(ConstraintId)
    }

    /// Constraints whose scope contains `var`.
    pub fn constraints_of(&self, var: VarId) -> &[ConstraintId] {
        &self.incidence[var.0]
    }

    pub fn find_variable(&self, name: &str) -> Option<VarId> {
        self.variables
            .iter()
            .position(|v| v.name() == name)
            .map(VarId)
    }

    /// All occurrences split from the task called `task`, in solve order.
    pub fn occurrences_of(&self, task: &str) -> Vec<VarId> {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.task_name() == task)
            .map(|(i, _)| VarId(i))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.variables.iter().all(Variable::is_assigned)
    }

    /// Whether every slot of `var`'s value `value` still has room for it.
    pub fn fits(&self, var: VarId, value: usize) -> bool {
        let variable = self.variable(var);
        variable
            .value(value)
            .iter()
            .all(|&slot| self.slots[slot].capacity(Some(variable.limit())) > 0)
    }

    pub(crate) fn occupy(&mut self, slot: SlotId, var: VarId) {
        let limit = self.variables[var.0].limit();
        self.slots.get_mut(slot).occupy(var, limit);
    }

    pub(crate) fn vacate(&mut self, slot: SlotId, var: VarId) -> bool {
        self.slots.get_mut(slot).vacate(var)
    }

    /// Unassigns `var` and vacates every slot of its span.
    pub(crate) fn unassign(&mut self, var: VarId) {
        let Some(span) = self.variables[var.0].assigned_span().map(<[SlotId]>::to_vec) else {
            return;
        };
        for slot in span {
            self.vacate(slot, var);
        }
        self.variables[var.0].clear_assigned();
    }

    /// Returns the model to its freshly compiled state: nothing assigned,
    /// every slot empty, every pruned value restored.
    pub fn reset(&mut self) {
        for i in 0..self.variables.len() {
            self.unassign(VarId(i));
        }
        self.restore_domains();
    }

    pub(crate) fn restore_domains(&mut self) {
        for variable in &mut self.variables {
            variable.restore_all();
        }
    }

    /// Start times of every assigned occurrence, keyed by occurrence name.
    pub fn solution(&self) -> BTreeMap<String, Vec<NaiveDateTime>> {
        self.variables
            .iter()
            .filter_map(|v| {
                let span = v.assigned_span()?;
                let times = span.iter().map(|&s| self.slots[s].time()).collect();
                Some((v.name().to_owned(), times))
            })
            .collect()
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Model {{")?;
        writeln!(f, "  Slots: {}", self.slots.len())?;
        writeln!(f, "  Variables:")?;
        for variable in &self.variables {
            writeln!(f, "    {variable}")?;
        }
        writeln!(f, "  Constraints:")?;
        for constraint in &self.constraints {
            writeln!(f, "    {constraint}")?;
        }
        write!(f, "}}")
    }
}
