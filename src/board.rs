//! The time board handed to the compiler and returned by [`project`].
//!
//! A board is indexed as `board[day][hour]`, where `hour` counts from that
//! day's start hour.

use thiserror::Error;

use crate::model::Model;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One hour of one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cell {
    /// Available for tasks.
    #[default]
    Free,
    /// Blocked by a fixed event (lecture, break, ...), labelled by a marker.
    Fixed(char),
    /// Already holding the named tasks.
    Occupied(Vec<String>),
}

impl Cell {
    pub fn is_free(&self) -> bool {
        matches!(self, Cell::Free)
    }

    /// Task names placed in this cell.
    pub fn tasks(&self) -> &[String] {
        match self {
            Cell::Occupied(names) => names,
            _ => &[],
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Free => write!(f, "-"),
            Cell::Fixed(marker) => write!(f, "{marker}"),
            Cell::Occupied(names) => write!(f, "{}", names.join("+")),
        }
    }
}

pub type Board = Vec<Vec<Cell>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("Slot at day {day}, hour {hour} does not exist on this board")]
    OutsideBoard { day: usize, hour: usize },

    #[error("Slot at day {day}, hour {hour} is a fixed cell on this board")]
    FixedCell { day: usize, hour: usize },
}

/// Writes every assigned occurrence onto a copy of `board`.
///
/// Cells receive the parent task name, so the pieces of a split task show
/// up under the task's own name. A free cell becomes [`Cell::Occupied`];
/// an occupied one gets the name appended. Unassigned occurrences leave the
/// board untouched.
///
/// # Errors
///
/// If a slot of `model` has no cell on `board`, or lands on a fixed cell,
/// i.e. the board is not the one the model was compiled from.
pub fn project(board: &[Vec<Cell>], model: &Model) -> Result<Board, ProjectError> {
    let mut projected = board.to_vec();

    for variable in model.variables() {
        let Some(span) = variable.assigned_span() else {
            continue;
        };
        for &slot in span {
            let (day, hour) = model.slot(slot).position();
            let cell = projected
                .get_mut(day)
                .and_then(|cells| cells.get_mut(hour))
                .ok_or(ProjectError::OutsideBoard { day, hour })?;
            match cell {
                Cell::Free => *cell = Cell::Occupied(vec![variable.task_name().to_owned()]),
                Cell::Occupied(names) => names.push(variable.task_name().to_owned()),
                Cell::Fixed(_) => return Err(ProjectError::FixedCell { day, hour }),
            }
        }
    }

    Ok(projected)
}
