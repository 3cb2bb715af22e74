use chrono::NaiveDateTime;
use qtty::Quantity;

use crate::units::{slots_for, SameDim, SlotUnit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unit of work to be placed on the board.
///
/// # Invariants
///
/// - `name()` identifies the task among all tasks handed to the compiler
/// - `span()` is the number of hour slots the task needs (at least 1 to compile)
/// - `limit()` is how many occurrences, this one included, may share a slot
/// - `priority()` defaults to 1; higher values are instantiated earlier
///
/// A splittable task without a fixed start is scheduled as `span`
/// independent one-hour occurrences named `<name>_0`, `<name>_1`, ...
///
/// # Example
///
/// ```ignore
/// let essay = Task::new("essay", due)
///     .with_span(3)
///     .splittable()
///     .with_prerequisite("reading");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    name: String,
    due: NaiveDateTime,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    span: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    splittable: bool,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    limit: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_priority"))]
    priority: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    prerequisites: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    fixed_start: Option<NaiveDateTime>,
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_priority() -> i32 {
    1
}

impl Task {
    /// Creates a one-hour, non-splittable task with limit 1 and priority 1.
    pub fn new(name: impl Into<String>, due: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            due,
            span: 1,
            splittable: false,
            limit: 1,
            priority: 1,
            prerequisites: Vec::new(),
            fixed_start: None,
        }
    }

    pub fn with_span(mut self, span: u32) -> Self {
        self.span = span;
        self
    }

    /// Sets the span from a time quantity, rounding partial hours up.
    pub fn with_duration<U: SameDim<SlotUnit>>(mut self, duration: Quantity<U>) -> Self {
        self.span = slots_for(duration);
        self
    }

    pub fn splittable(mut self) -> Self {
        self.splittable = true;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Adds a task (by name) that must be finished before this one starts.
    pub fn with_prerequisite(mut self, task: impl Into<String>) -> Self {
        self.prerequisites.push(task.into());
        self
    }

    /// Pins the task to start at `start`. Pinned tasks are never split.
    pub fn fixed_at(mut self, start: NaiveDateTime) -> Self {
        self.fixed_start = Some(start);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn due(&self) -> NaiveDateTime {
        self.due
    }

    pub fn span(&self) -> u32 {
        self.span
    }

    pub fn is_splittable(&self) -> bool {
        self.splittable
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    pub fn fixed_start(&self) -> Option<NaiveDateTime> {
        self.fixed_start
    }

    /// Breaks the task into the occurrences the solver places independently.
    pub(crate) fn occurrences(&self) -> Vec<Occurrence<'_>> {
        if self.splittable && self.fixed_start.is_none() {
            (0..self.span)
                .map(|i| Occurrence {
                    name: format!("{}_{}", self.name, i),
                    task: self,
                    span: 1,
                })
                .collect()
        } else {
            vec![Occurrence {
                name: self.name.clone(),
                task: self,
                span: self.span,
            }]
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: [{} due, {}h needed, limit={}]",
            self.name, self.due, self.span, self.limit
        )
    }
}

/// One placeable piece of a task.
#[derive(Debug, Clone)]
pub(crate) struct Occurrence<'a> {
    pub(crate) name: String,
    pub(crate) task: &'a Task,
    pub(crate) span: u32,
}
