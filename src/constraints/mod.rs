//! Constraints over task occurrences.
//!
//! A constraint restricts the values an ordered scope of variables may take
//! together. It is stored in one of two forms:
//! - [`TableConstraint`]: every satisfying tuple enumerated up front.
//! - [`ProceduralConstraint`]: a [`Predicate`] evaluated on demand.
//!
//! The search only uses [`Constraint::check`] and [`Constraint::has_support`],
//! which behave the same for both forms.
//!
//! Slot capacity is not a constraint of this graph: it depends on which other
//! occurrences happen to share a slot and is checked live by the search when
//! a value is assigned (see [`Model::fits`]).

mod procedural;
mod table;

pub use procedural::{Predicate, ProceduralConstraint};
pub use table::TableConstraint;

use std::fmt::Display;

use crate::model::{Model, SlotId, VarId};

/// Handle of a [`Constraint`] inside a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// How the satisfying combinations of a constraint are represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    Table(TableConstraint),
    Procedural(ProceduralConstraint),
}

/// A named restriction over an ordered scope of variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    name: String,
    scope: Vec<VarId>,
    relation: Relation,
}

impl Constraint {
    /// # Panics
    ///
    /// Panics if the table arity differs from the scope length.
    pub fn table(name: impl Into<String>, scope: Vec<VarId>, table: TableConstraint) -> Self {
        assert_eq!(table.arity(), scope.len(), "table arity must match scope");
        Self {
            name: name.into(),
            scope,
            relation: Relation::Table(table),
        }
    }

    pub fn procedural(
        name: impl Into<String>,
        scope: Vec<VarId>,
        constraint: ProceduralConstraint,
    ) -> Self {
        Self {
            name: name.into(),
            scope,
            relation: Relation::Procedural(constraint),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &[VarId] {
        &self.scope
    }

    pub fn arity(&self) -> usize {
        self.scope.len()
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn position_of(&self, var: VarId) -> Option<usize> {
        self.scope.iter().position(|&v| v == var)
    }

    /// Scope variables not yet assigned.
    pub fn unassigned<'a>(&'a self, model: &'a Model) -> impl Iterator<Item = VarId> + 'a {
        self.scope
            .iter()
            .copied()
            .filter(move |&v| !model.variable(v).is_assigned())
    }

    pub fn unassigned_count(&self, model: &Model) -> usize {
        self.unassigned(model).count()
    }

    /// The assigned value of every scope variable, or `None` if any is unassigned.
    pub fn assigned_values(&self, model: &Model) -> Option<Vec<usize>> {
        self.scope
            .iter()
            .map(|&v| model.variable(v).assigned())
            .collect()
    }

    /// Whether `values` (domain indices in scope order) satisfies the constraint.
    pub fn check(&self, values: &[usize], model: &Model) -> bool {
        match &self.relation {
            Relation::Table(table) => table.contains(values),
            Relation::Procedural(constraint) => {
                let spans = self.spans(values, model);
                constraint.check(&spans, model.slots())
            }
        }
    }

    /// Whether `value` of the variable at `position` extends to a satisfying
    /// tuple whose other entries are in their variables' current domains.
    ///
    /// An assigned variable's current domain is just its assigned value.
    pub fn has_support(&self, position: usize, value: usize, model: &Model) -> bool {
        match &self.relation {
            Relation::Table(table) => table.has_support(position, value, |p, v| {
                model.variable(self.scope[p]).in_current_domain(v)
            }),
            Relation::Procedural(constraint) => {
                let candidates: Vec<Vec<&[SlotId]>> = self
                    .scope
                    .iter()
                    .enumerate()
                    .map(|(p, &var)| {
                        if p == position {
                            return Vec::new();
                        }
                        let variable = model.variable(var);
                        variable
                            .current_domain()
                            .into_iter()
                            .map(|i| variable.value(i))
                            .collect()
                    })
                    .collect();
                let span = model.variable(self.scope[position]).value(value);
                constraint.has_support(position, span, &candidates, model.slots())
            }
        }
    }

    fn spans<'m>(&self, values: &[usize], model: &'m Model) -> Vec<&'m [SlotId]> {
        self.scope
            .iter()
            .zip(values)
            .map(|(&var, &value)| model.variable(var).value(value))
            .collect()
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.relation {
            Relation::Table(table) => format!("table of {} tuples", table.len()),
            Relation::Procedural(constraint) => constraint.predicate().to_string(),
        };
        write!(f, "{} over {} variables ({kind})", self.name, self.scope.len())
    }
}
