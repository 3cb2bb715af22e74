//! Chronological backtracking over a compiled [`Model`].
//!
//! Variables are instantiated strictly in solve order and values in domain
//! order. Before a value is tried, every slot of its span must still have
//! capacity for it; values failing that check are skipped without counting
//! as a decision. After each assignment the chosen [`Propagator`] filters
//! the remaining domains.
//!
//! Every change to the model (occupancy, assignment, pruning) is recorded on
//! a [`Trail`](trail::Trail) and undone newest-first when a branch fails.
//!
//! # Outcome
//!
//! - [`SearchStatus::Solved`]: every variable keeps its value and occupies
//!   its slots; pruned values are restored.
//! - [`SearchStatus::Exhausted`] and [`SearchStatus::Interrupted`]: the model
//!   is back in the state it was in before the search started.

mod config;
mod stats;
pub(crate) mod trail;

#[cfg(test)]
mod tests;

pub use config::SearchConfig;
pub use stats::SearchStats;

use log::{debug, trace};
use std::time::Instant;

use crate::model::{Model, VarId};
use crate::propagators::{Conflict, PropagationContext, Propagator};
use trail::{Change, Trail};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchStatus {
    /// Every variable is assigned and every constraint holds.
    Solved,
    /// No assignment exists.
    Exhausted,
    /// A limit of the [`SearchConfig`] was reached first.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn is_solved(&self) -> bool {
        self.status == SearchStatus::Solved
    }
}

/// Solves `model` in place with an unlimited search.
pub fn solve(model: &mut Model, propagator: Propagator) -> SearchOutcome {
    Search::new(model, propagator).run()
}

/// A limit from the [`SearchConfig`] was hit.
struct Interrupted;

pub struct Search<'m> {
    model: &'m mut Model,
    propagator: Propagator,
    config: SearchConfig,
    trail: Trail<Change>,
    order: Vec<VarId>,
    stats: SearchStats,
    started: Instant,
}

impl<'m> Search<'m> {
    pub fn new(model: &'m mut Model, propagator: Propagator) -> Self {
        Self {
            model,
            propagator,
            config: SearchConfig::default(),
            trail: Trail::default(),
            order: Vec::new(),
            stats: SearchStats::default(),
            started: Instant::now(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Resets the model, then searches for the first complete assignment.
    pub fn run(mut self) -> SearchOutcome {
        self.started = Instant::now();
        self.model.reset();
        self.order = self.model.order();
        self.trail.new_checkpoint();

        let status = match self.propagate(None) {
            Err(conflict) => {
                debug!("root propagation failed: {conflict}");
                SearchStatus::Exhausted
            }
            Ok(()) => match self.descend(0) {
                Ok(true) => SearchStatus::Solved,
                Ok(false) => SearchStatus::Exhausted,
                Err(Interrupted) => SearchStatus::Interrupted,
            },
        };

        match status {
            SearchStatus::Solved => self.model.restore_domains(),
            SearchStatus::Exhausted | SearchStatus::Interrupted => self.undo_to(0),
        }
        self.stats.elapsed = self.started.elapsed();

        debug!(
            "{status:?} with {} over {} variables: {}",
            self.propagator,
            self.order.len(),
            self.stats
        );
        SearchOutcome {
            status,
            stats: self.stats,
        }
    }

    fn descend(&mut self, depth: usize) -> Result<bool, Interrupted> {
        let Some(&var) = self.order.get(depth) else {
            return Ok(true);
        };
        let values: Vec<usize> = self.model.variable(var).live_values().collect();

        for value in values {
            if !self.model.fits(var, value) {
                continue;
            }
            self.check_limits()?;

            let checkpoint = self.trail.checkpoint();
            self.trail.new_checkpoint();
            self.assign(var, value);
            self.stats.decisions += 1;
            if self.config.trace {
                trace!("{} := {value} at depth {depth}", self.model.variable(var).name());
            }

            match self.propagate(Some(var)) {
                Ok(()) => {
                    if self.descend(depth + 1)? {
                        return Ok(true);
                    }
                }
                Err(conflict) => {
                    if self.config.trace {
                        trace!("{conflict}");
                    }
                }
            }

            self.undo_to(checkpoint);
            self.stats.backtracks += 1;
        }

        Ok(false)
    }

    fn check_limits(&self) -> Result<(), Interrupted> {
        if self
            .config
            .decision_limit
            .is_some_and(|limit| self.stats.decisions >= limit)
        {
            return Err(Interrupted);
        }
        if self
            .config
            .time_limit
            .is_some_and(|limit| self.started.elapsed() >= limit)
        {
            return Err(Interrupted);
        }
        Ok(())
    }

    fn assign(&mut self, var: VarId, value: usize) {
        let span = self.model.variable(var).value(value).to_vec();
        for slot in span {
            self.model.occupy(slot, var);
            self.trail.push(Change::Occupied { slot, var });
        }
        self.model.variable_mut(var).set_assigned(value);
        self.trail.push(Change::Assigned { var });
    }

    fn propagate(&mut self, assigned: Option<VarId>) -> Result<(), Conflict> {
        let mut context = PropagationContext::new(self.model, &mut self.trail, assigned);
        let result = self.propagator.propagate(&mut context, assigned);
        self.stats.prunings += context.prunings();
        result
    }

    fn undo_to(&mut self, checkpoint: usize) {
        for change in self.trail.synchronise(checkpoint) {
            match change {
                Change::Pruned { var, value } => self.model.variable_mut(var).restore(value),
                Change::Occupied { slot, var } => {
                    self.model.vacate(slot, var);
                }
                Change::Assigned { var } => self.model.variable_mut(var).clear_assigned(),
            }
        }
    }
}
