//! timeboard - constraint-based placement of tasks on an hourly time board
//!
//! A board is a grid of days × hours in which some cells are already taken
//! (lectures, breaks). Tasks with due dates, durations, concurrency limits,
//! priorities and prerequisites are compiled into a constraint satisfaction
//! problem and solved by backtracking search with a choice of propagation.
//!
//! ```ignore
//! let (mut model, _) = compile(&tasks, start_date, &board, &[])?;
//! let outcome = solve(&mut model, Propagator::Gac);
//! if outcome.is_solved() {
//!     let filled = project(&board, &model)?;
//! }
//! ```

pub mod audit;
pub mod board;
pub mod compiler;
pub mod constraints;
pub mod model;
pub mod propagators;
pub mod search;
pub mod task;
pub mod units;

#[cfg(test)]
mod test_utils;

pub use audit::{audit, Violation};
pub use board::{project, Board, Cell, ProjectError};
pub use compiler::{compile, compile_with, CompileError, CompileOptions, ConstraintEncoding};
pub use model::Model;
pub use propagators::Propagator;
pub use search::{solve, Search, SearchConfig, SearchOutcome, SearchStats, SearchStatus};
pub use task::Task;
pub use units::{convert, SameDim};
