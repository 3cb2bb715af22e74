//! Fills a small four-day board around a lecture and a break.
//!
//! Run with:
//!
//! ```text
//! RUST_LOG=debug cargo run --example weekly_board
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use qtty::{Minute, Quantity};
use timeboard::{
    audit, compile, project, solve, Board, Cell, Propagator, SearchConfig, Search, Task,
};

fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0).expect("valid hour")
}

fn print_board(board: &Board, start: NaiveDate) {
    for (day, cells) in board.iter().enumerate() {
        let date = start + chrono::Days::new(day as u64);
        let row: Vec<String> = cells.iter().map(|c| format!("{:>24}", c.to_string())).collect();
        println!("{date} |{}", row.join("|"));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let start = NaiveDate::from_ymd_opt(2016, 1, 1).expect("valid date");
    let day = |offset: u64| start + chrono::Days::new(offset);

    let board: Board = vec![
        vec![Cell::Free, Cell::Fixed('L')],
        vec![Cell::Fixed('B'), Cell::Free],
        vec![Cell::Free, Cell::Free],
        vec![Cell::Free, Cell::Free],
    ];

    let tasks = vec![
        Task::new("dummy", at(day(4), 8)).with_limit(2),
        Task::new("prerequisite-test", at(day(3), 8))
            .with_span(2)
            .splittable()
            .with_limit(3)
            .with_prerequisite("dummy")
            .with_priority(3),
        Task::new("multi-test", at(day(4), 9)).with_limit(2),
        Task::new("pre-entered", at(day(2), 6)).fixed_at(at(day(1), 7)),
        Task::new("priority-test", at(day(4), 6))
            .with_duration(Quantity::<Minute>::new(90.0))
            .with_limit(2)
            .with_priority(2),
    ];
    for task in &tasks {
        println!("{task}");
    }

    let (mut model, _) = compile(&tasks, start, &board, &[])?;
    println!("\n{model}\n");

    for propagator in Propagator::ALL {
        let outcome = solve(&mut model, propagator);
        println!("{propagator:>16}: {:?}, {}", outcome.status, outcome.stats);
    }

    let outcome = Search::new(&mut model, Propagator::ForwardChecking)
        .with_config(SearchConfig::default().with_trace(true))
        .run();
    if !outcome.is_solved() {
        println!("\nNo schedule fits this board.");
        return Ok(());
    }

    let violations = audit(&model);
    for violation in &violations {
        println!("violation: {violation}");
    }

    println!("\nInitial board:\n");
    print_board(&board, start);
    println!("\nScheduled board:\n");
    print_board(&project(&board, &model)?, start);
    Ok(())
}
