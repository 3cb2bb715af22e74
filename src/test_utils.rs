//! Fixtures shared by the unit tests.

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::board::{Board, Cell};
use crate::compiler::compile;
use crate::model::Model;
use crate::propagators::Propagator;
use crate::search::{solve, SearchOutcome};
use crate::task::Task;

/// First day of every test board.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 1, 1).expect("valid date")
}

/// `day` days after [`start_date`] at `hour`:00.
pub fn at(day: i64, hour: u32) -> NaiveDateTime {
    start_date()
        .checked_add_days(Days::new(day as u64))
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

/// `days` days of `hours` empty cells each.
pub fn free_board(days: usize, hours: usize) -> Board {
    vec![vec![Cell::Free; hours]; days]
}

/// Compiles with default start hours and solves.
pub fn compile_and_solve(
    tasks: &[Task],
    board: &Board,
    propagator: Propagator,
) -> (Model, SearchOutcome) {
    let (mut model, _) = compile(tasks, start_date(), board, &[]).expect("valid input");
    let outcome = solve(&mut model, propagator);
    (model, outcome)
}
