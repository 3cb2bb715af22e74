//! Translation of tasks and a time board into a [`Model`].
//!
//! Compilation happens in a fixed sequence:
//! 1. validate the tasks and their prerequisite graph,
//! 2. order tasks by priority (descending) and due date (ascending),
//! 3. turn every free board cell into a [`Slot`](crate::model::Slot),
//! 4. split tasks into occurrences and give each a domain of spans,
//! 5. add uniqueness constraints between sibling occurrences,
//! 6. add ordering constraints between prerequisites and dependents.
//!
//! A task that cannot fit anywhere gets an empty domain; that is reported by
//! the search, not here.

mod dependencies;
pub mod error;
mod tuples;


pub use error::CompileError;

use chrono::{Days, NaiveDate};
use log::debug;
use std::collections::HashMap;

use crate::board::Cell;
use crate::constraints::{Constraint, Predicate, ProceduralConstraint, TableConstraint};
use crate::model::{Model, SlotTable, Span, VarId, Variable};
use crate::task::{Occurrence, Task};

/// Start hour of days without an explicit entry in `start_hours`.
pub const DEFAULT_START_HOUR: u32 = 6;

/// Storage form of the compiled constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConstraintEncoding {
    /// Enumerate every satisfying tuple at compile time.
    #[default]
    Table,
    /// Evaluate the relation on demand.
    Procedural,
}

/// Knobs of [`compile_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub encoding: ConstraintEncoding,
    pub default_start_hour: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            encoding: ConstraintEncoding::Table,
            default_start_hour: DEFAULT_START_HOUR,
        }
    }
}

impl CompileOptions {
    pub fn with_encoding(mut self, encoding: ConstraintEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_default_start_hour(mut self, hour: u32) -> Self {
        self.default_start_hour = hour;
        self
    }
}

/// Compiles with [`CompileOptions::default`].
///
/// `board[d][h]` is hour `h` of day `d`, counted from `start_hours[d]`
/// (or [`DEFAULT_START_HOUR`]). Returns the model and its variables in the
/// order the search will instantiate them.
///
/// # Errors
///
/// See [`CompileError`].
pub fn compile(
    tasks: &[Task],
    start_date: NaiveDate,
    board: &[Vec<Cell>],
    start_hours: &[u32],
) -> Result<(Model, Vec<VarId>), CompileError> {
    compile_with(
        tasks,
        start_date,
        board,
        start_hours,
        &CompileOptions::default(),
    )
}

/// Compiles tasks and board into a model, see [`compile`].
///
/// # Errors
///
/// See [`CompileError`].
pub fn compile_with(
    tasks: &[Task],
    start_date: NaiveDate,
    board: &[Vec<Cell>],
    start_hours: &[u32],
    options: &CompileOptions,
) -> Result<(Model, Vec<VarId>), CompileError> {
    dependencies::check_tasks(tasks)?;

    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by(|a, b| {
        b.priority()
            .cmp(&a.priority())
            .then_with(|| a.due().cmp(&b.due()))
    });

    let slots = build_slots(board, start_date, start_hours, options.default_start_hour)?;
    let mut model = Model::new(slots);

    let mut occurrences: HashMap<&str, Vec<VarId>> = HashMap::with_capacity(ordered.len());
    for task in &ordered {
        let ids = task
            .occurrences()
            .iter()
            .map(|occurrence| {
                let domain = domain_of(model.slots(), occurrence);
                model.add_variable(Variable::new(
                    occurrence.name.clone(),
                    task.name(),
                    task.limit(),
                    task.due(),
                    task.prerequisites().to_vec(),
                    domain,
                ))
            })
            .collect();
        occurrences.insert(task.name(), ids);
    }

    for task in &ordered {
        let siblings = &occurrences[task.name()];
        if siblings.len() >= 2 {
            let name = format!("no_duplicate_{}", task.name());
            let scope = siblings.clone();
            let constraint = encode(&model, name, scope, Predicate::Disjoint, options.encoding);
            model.add_constraint(constraint);
        }
    }

    for task in &ordered {
        let mut prerequisites: Vec<&str> = Vec::with_capacity(task.prerequisites().len());
        for prerequisite in task.prerequisites() {
            if !prerequisites.contains(&prerequisite.as_str()) {
                prerequisites.push(prerequisite);
            }
        }
        for &dependent in &occurrences[task.name()] {
            for &prerequisite in &prerequisites {
                let mut scope = occurrences[prerequisite].clone();
                scope.push(dependent);
                let name = format!("{prerequisite}_before_{}", model.variable(dependent).name());
                let constraint = encode(&model, name, scope, Predicate::Precedes, options.encoding);
                model.add_constraint(constraint);
            }
        }
    }

    debug!(
        "compiled {} tasks into {} slots, {} variables, {} constraints",
        tasks.len(),
        model.slots().len(),
        model.variables().len(),
        model.constraints().len()
    );
    for variable in model.variables().iter().filter(|v| v.domain_size() == 0) {
        debug!("{} has no place on the board", variable.name());
    }

    let order = model.order();
    Ok((model, order))
}

/// One slot per free cell, in chronological order.
fn build_slots(
    board: &[Vec<Cell>],
    start_date: NaiveDate,
    start_hours: &[u32],
    default_start_hour: u32,
) -> Result<SlotTable, CompileError> {
    let mut slots = SlotTable::new();
    for (day, cells) in board.iter().enumerate() {
        if !cells.iter().any(Cell::is_free) {
            continue;
        }
        let date = start_date
            .checked_add_days(Days::new(day as u64))
            .ok_or(CompileError::DateOutOfRange(day))?;
        let first_hour = start_hours.get(day).copied().unwrap_or(default_start_hour);
        // Only free cells need a timestamp; blocked cells may lie past midnight.
        for (cell_index, _) in cells.iter().enumerate().filter(|(_, c)| c.is_free()) {
            let time = u32::try_from(cell_index)
                .ok()
                .and_then(|h| h.checked_add(first_hour))
                .filter(|&h| h <= 23)
                .and_then(|hour| date.and_hms_opt(hour, 0, 0))
                .ok_or(CompileError::HourOutOfRange {
                    day,
                    cell: cell_index,
                })?;
            slots.push(time, (day, cell_index));
        }
    }
    Ok(slots)
}

/// Candidate spans of one occurrence, earliest start first.
fn domain_of(slots: &SlotTable, occurrence: &Occurrence<'_>) -> Vec<Span> {
    let due = occurrence.task.due();
    let ends_before_due = |span: &Span| {
        span.last()
            .is_some_and(|&last| slots[last].time() < due)
    };

    match occurrence.task.fixed_start() {
        Some(start) => slots
            .find(start)
            .and_then(|first| slots.span_from(first, occurrence.span))
            .filter(ends_before_due)
            .into_iter()
            .collect(),
        None => slots
            .iter()
            .take_while(|(_, slot)| slot.time() < due)
            .filter_map(|(id, _)| slots.span_from(id, occurrence.span))
            .filter(ends_before_due)
            .collect(),
    }
}

fn encode(
    model: &Model,
    name: String,
    scope: Vec<VarId>,
    predicate: Predicate,
    encoding: ConstraintEncoding,
) -> Constraint {
    match encoding {
        ConstraintEncoding::Table => {
            let domains: Vec<&[Span]> = scope.iter().map(|&v| model.variable(v).domain()).collect();
            let tuples = tuples::satisfying_tuples(predicate, &domains, model.slots());
            let table = TableConstraint::from_tuples(scope.len(), tuples);
            Constraint::table(name, scope, table)
        }
        ConstraintEncoding::Procedural => {
            Constraint::procedural(name, scope, ProceduralConstraint::new(predicate))
        }
    }
}
