//! Independent verification of a solved model.
//!
//! [`audit`] re-derives every hard rule from the variables and slots alone
//! (due dates, slot capacity, split pieces, prerequisites) and also
//! evaluates every compiled constraint. An empty report means the
//! assignment is valid.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::{Model, SlotId, VarId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("{0} was not placed")]
    Unassigned(String),

    #[error("{name} ends at {end}, not before its due time {due}")]
    PastDue {
        name: String,
        end: NaiveDateTime,
        due: NaiveDateTime,
    },

    #[error("slot {time} holds {occupants} tasks but allows {limit}")]
    OverCapacity {
        time: NaiveDateTime,
        occupants: usize,
        limit: u32,
    },

    #[error("{first} and {second} of the same task share a slot")]
    SiblingOverlap { first: String, second: String },

    #[error("{prerequisite} does not finish before {dependent} starts")]
    OutOfOrder {
        prerequisite: String,
        dependent: String,
    },

    #[error("constraint {0} does not hold")]
    ConstraintViolated(String),

    #[error("occupancy of slot {time} disagrees with the assignment of {name}")]
    OccupancyMismatch { name: String, time: NaiveDateTime },
}

/// Lists every rule the current assignment breaks.
pub fn audit(model: &Model) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_variables(model, &mut violations);
    check_slots(model, &mut violations);
    check_siblings(model, &mut violations);
    check_prerequisites(model, &mut violations);

    for constraint in model.constraints() {
        if let Some(values) = constraint.assigned_values(model) {
            if !constraint.check(&values, model) {
                violations.push(Violation::ConstraintViolated(constraint.name().to_owned()));
            }
        }
    }
    violations
}

fn check_variables(model: &Model, violations: &mut Vec<Violation>) {
    for (index, variable) in model.variables().iter().enumerate() {
        let Some(span) = variable.assigned_span() else {
            violations.push(Violation::Unassigned(variable.name().to_owned()));
            continue;
        };
        if let Some(&last) = span.last() {
            let end = model.slot(last).time();
            if end >= variable.due() {
                violations.push(Violation::PastDue {
                    name: variable.name().to_owned(),
                    end,
                    due: variable.due(),
                });
            }
        }
        for &slot in span {
            if !model.slot(slot).is_occupied_by(VarId(index)) {
                violations.push(Violation::OccupancyMismatch {
                    name: variable.name().to_owned(),
                    time: model.slot(slot).time(),
                });
            }
        }
    }
}

fn check_slots(model: &Model, violations: &mut Vec<Violation>) {
    for (id, slot) in model.slots().iter() {
        for var in slot.occupants() {
            let variable = model.variable(var);
            if !variable.assigned_span().is_some_and(|span| span.contains(&id)) {
                violations.push(Violation::OccupancyMismatch {
                    name: variable.name().to_owned(),
                    time: slot.time(),
                });
            }
        }
        let limit = slot.occupants().map(|var| model.variable(var).limit()).min();
        if let Some(limit) = limit {
            if slot.occupant_count() > limit as usize {
                violations.push(Violation::OverCapacity {
                    time: slot.time(),
                    occupants: slot.occupant_count(),
                    limit,
                });
            }
        }
    }
}

fn check_siblings(model: &Model, violations: &mut Vec<Violation>) {
    let variables = model.variables();
    for (i, first) in variables.iter().enumerate() {
        let Some(a) = first.assigned_span() else {
            continue;
        };
        for second in &variables[i + 1..] {
            if second.task_name() != first.task_name() {
                continue;
            }
            if let Some(b) = second.assigned_span() {
                if shares_slot(a, b) {
                    violations.push(Violation::SiblingOverlap {
                        first: first.name().to_owned(),
                        second: second.name().to_owned(),
                    });
                }
            }
        }
    }
}

fn check_prerequisites(model: &Model, violations: &mut Vec<Violation>) {
    for dependent in model.variables() {
        let Some(&first) = dependent.assigned_span().and_then(<[SlotId]>::first) else {
            continue;
        };
        let start = model.slot(first).time();
        for task in dependent.prerequisites() {
            for var in model.occurrences_of(task) {
                let prerequisite = model.variable(var);
                let Some(&last) = prerequisite.assigned_span().and_then(<[SlotId]>::last) else {
                    continue;
                };
                if model.slot(last).time() >= start {
                    violations.push(Violation::OutOfOrder {
                        prerequisite: prerequisite.name().to_owned(),
                        dependent: dependent.name().to_owned(),
                    });
                }
            }
        }
    }
}

fn shares_slot(a: &[SlotId], b: &[SlotId]) -> bool {
    a.iter().any(|slot| b.contains(slot))
}
