//! Task occurrences and their domains of candidate spans.

use chrono::NaiveDateTime;
use std::fmt::Display;

use super::slot::SlotId;

/// Handle of a [`Variable`] inside a [`Model`](super::Model).
///
/// Variables are numbered in solve order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One way to place an occurrence: consecutive slots, earliest first.
pub type Span = Box<[SlotId]>;

/// Pruning record of a single domain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueState {
    Live,
    /// Removed by propagation after `by` was assigned, or at the root when `None`.
    Pruned { by: Option<VarId> },
}

/// One task occurrence awaiting placement.
///
/// Domain values are addressed by their index in [`domain()`](Self::domain);
/// the index order is the order the search tries them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    task: String,
    limit: u32,
    due: NaiveDateTime,
    prerequisites: Vec<String>,
    domain: Vec<Span>,
    states: Vec<ValueState>,
    live: usize,
    assigned: Option<usize>,
}

impl Variable {
    pub(crate) fn new(
        name: impl Into<String>,
        task: impl Into<String>,
        limit: u32,
        due: NaiveDateTime,
        prerequisites: Vec<String>,
        domain: Vec<Span>,
    ) -> Self {
        let live = domain.len();
        Self {
            name: name.into(),
            task: task.into(),
            limit,
            due,
            prerequisites,
            states: vec![ValueState::Live; live],
            domain,
            live,
            assigned: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the task this occurrence was split from.
    pub fn task_name(&self) -> &str {
        &self.task
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn due(&self) -> NaiveDateTime {
        self.due
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    /// The full domain, pruned values included.
    pub fn domain(&self) -> &[Span] {
        &self.domain
    }

    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }

    pub fn value(&self, index: usize) -> &[SlotId] {
        &self.domain[index]
    }

    pub fn state(&self, index: usize) -> ValueState {
        self.states[index]
    }

    pub fn is_live(&self, index: usize) -> bool {
        self.states[index] == ValueState::Live
    }

    /// Indices of the values not pruned, in domain order.
    pub fn live_values(&self) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == ValueState::Live)
            .map(|(i, _)| i)
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Whether `index` is still possible: the assigned value if assigned,
    /// otherwise any live value.
    pub fn in_current_domain(&self, index: usize) -> bool {
        match self.assigned {
            Some(value) => value == index,
            None => self.is_live(index),
        }
    }

    /// The values still possible, see [`in_current_domain`](Self::in_current_domain).
    pub fn current_domain(&self) -> Vec<usize> {
        match self.assigned {
            Some(value) => vec![value],
            None => self.live_values().collect(),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned.is_some()
    }

    pub fn assigned(&self) -> Option<usize> {
        self.assigned
    }

    pub fn assigned_span(&self) -> Option<&[SlotId]> {
        self.assigned.map(|i| &*self.domain[i])
    }

    pub(crate) fn set_assigned(&mut self, value: usize) {
        debug_assert!(self.assigned.is_none(), "{} assigned twice", self.name);
        self.assigned = Some(value);
    }

    pub(crate) fn clear_assigned(&mut self) {
        self.assigned = None;
    }

    pub(crate) fn prune(&mut self, index: usize, by: Option<VarId>) {
        debug_assert!(self.is_live(index), "{} value {index} pruned twice", self.name);
        self.states[index] = ValueState::Pruned { by };
        self.live -= 1;
    }

    pub(crate) fn restore(&mut self, index: usize) {
        if !self.is_live(index) {
            self.states[index] = ValueState::Live;
            self.live += 1;
        }
    }

    pub(crate) fn restore_all(&mut self) {
        self.states.fill(ValueState::Live);
        self.live = self.domain.len();
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} of {} values live", self.name, self.live, self.domain.len())?;
        if let Some(value) = self.assigned {
            write!(f, ", assigned {value}")?;
        }
        write!(f, ")")
    }
}
