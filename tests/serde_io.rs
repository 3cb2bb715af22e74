#![cfg(feature = "serde")]

use timeboard::{compile, solve, Board, Cell, Propagator, SearchStatus, Task};

#[test]
fn tasks_and_board_load_from_json() {
    let tasks: Vec<Task> = serde_json::from_str(
        r#"[
            {"name": "reading", "due": "2016-01-02T00:00:00"},
            {"name": "essay", "due": "2016-01-02T00:00:00", "span": 2,
             "splittable": true, "prerequisites": ["reading"]}
        ]"#,
    )
    .unwrap();
    assert_eq!(tasks[0].span(), 1);
    assert_eq!(tasks[0].limit(), 1);
    assert_eq!(tasks[0].priority(), 1);
    assert!(tasks[1].is_splittable());

    let board: Board =
        serde_json::from_str(r#"[["Free", {"Fixed": "L"}, "Free", "Free"]]"#).unwrap();
    assert_eq!(board[0][1], Cell::Fixed('L'));

    let start = chrono::NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
    let (mut model, _) = compile(&tasks, start, &board, &[]).unwrap();
    let outcome = solve(&mut model, Propagator::Gac);
    assert!(outcome.is_solved());
}

#[test]
fn enums_serialize_by_name() {
    assert_eq!(
        serde_json::to_string(&Propagator::ForwardChecking).unwrap(),
        r#""ForwardChecking""#
    );
    let status: SearchStatus = serde_json::from_str(r#""Exhausted""#).unwrap();
    assert_eq!(status, SearchStatus::Exhausted);
}
