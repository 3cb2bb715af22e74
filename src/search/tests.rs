//! Test suite for the backtracking search.

use super::*;
use crate::audit::audit;
use crate::board::{Board, Cell};
use crate::compiler::compile;
use crate::model::{SlotId, Variable};
use crate::task::Task;
use crate::test_utils::{at, compile_and_solve, free_board, start_date};
use std::time::Duration;

fn compiled(tasks: &[Task], board: &Board) -> Model {
    compile(tasks, start_date(), board, &[]).expect("valid input").0
}

fn span_times(model: &Model, name: &str) -> Vec<chrono::NaiveDateTime> {
    let var = model.find_variable(name).expect("known variable");
    model
        .variable(var)
        .assigned_span()
        .expect("assigned")
        .iter()
        .map(|&s| model.slot(s).time())
        .collect()
}

fn assert_pristine(model: &Model) {
    assert!(model.variables().iter().all(|v| !v.is_assigned()));
    assert!(model
        .variables()
        .iter()
        .all(|v| v.live_count() == v.domain_size()));
    assert!(model.slots().iter().all(|(_, s)| s.occupant_count() == 0));
}

mod scenarios {
    use super::*;

    #[test]
    fn test_single_task_takes_consecutive_slots_on_first_day() {
        for propagator in Propagator::ALL {
            let tasks = [Task::new("lab", at(0, 23)).with_span(2)];
            let (model, outcome) = compile_and_solve(&tasks, &free_board(2, 4), propagator);
            assert!(outcome.is_solved(), "{propagator}");
            let times = span_times(&model, "lab");
            assert_eq!(times, [at(0, 6), at(0, 7)]);
            assert!(audit(&model).is_empty());
        }
    }

    #[test]
    fn test_split_task_uses_distinct_slots() {
        for propagator in Propagator::ALL {
            let tasks = [Task::new("essay", at(1, 23)).with_span(2).splittable()];
            let (model, outcome) = compile_and_solve(&tasks, &free_board(2, 4), propagator);
            assert!(outcome.is_solved(), "{propagator}");
            assert_ne!(span_times(&model, "essay_0"), span_times(&model, "essay_1"));
            assert!(audit(&model).is_empty());
        }
    }

    #[test]
    fn test_prerequisite_is_scheduled_first() {
        for propagator in Propagator::ALL {
            // b sorts first on due date, so the search must skip slot 0 for it.
            let tasks = [
                Task::new("a", at(1, 23)),
                Task::new("b", at(1, 20)).with_prerequisite("a"),
            ];
            let (model, outcome) = compile_and_solve(&tasks, &free_board(2, 4), propagator);
            assert!(outcome.is_solved(), "{propagator}");
            assert!(span_times(&model, "a")[0] < span_times(&model, "b")[0]);
            assert!(audit(&model).is_empty());
        }
    }

    #[test]
    fn test_shared_slot_within_limit() {
        for propagator in Propagator::ALL {
            let board = vec![vec![Cell::Fixed('L'), Cell::Free, Cell::Fixed('B')]];
            let tasks = [
                Task::new("a", at(1, 0)).with_limit(2),
                Task::new("b", at(1, 0)).with_limit(2),
            ];
            let (model, outcome) = compile_and_solve(&tasks, &board, propagator);
            assert!(outcome.is_solved(), "{propagator}");
            assert_eq!(model.slot(SlotId(0)).occupant_count(), 2);
            assert!(audit(&model).is_empty());
        }
    }

    #[test]
    fn test_due_before_first_slot_is_infeasible() {
        for propagator in Propagator::ALL {
            let tasks = [Task::new("late", at(0, 5))];
            let (model, outcome) = compile_and_solve(&tasks, &free_board(2, 4), propagator);
            assert_eq!(outcome.status, SearchStatus::Exhausted, "{propagator}");
            assert_pristine(&model);
        }
    }
}

mod capacity {
    use super::*;

    #[test]
    fn test_full_slot_is_skipped_without_a_decision() {
        for propagator in Propagator::ALL {
            let tasks = [Task::new("a", at(1, 0)), Task::new("b", at(1, 0))];
            let (model, outcome) = compile_and_solve(&tasks, &free_board(1, 1), propagator);
            assert_eq!(outcome.status, SearchStatus::Exhausted);
            assert_eq!(outcome.stats.decisions, 1, "{propagator}");
            assert_eq!(outcome.stats.backtracks, 1);
            assert_pristine(&model);
        }
    }

    #[test]
    fn test_strictest_limit_wins() {
        // b would share, but a (limit 1) got there first.
        let tasks = [
            Task::new("a", at(1, 0)).with_priority(2),
            Task::new("b", at(1, 0)).with_limit(3),
        ];
        let (model, outcome) = compile_and_solve(&tasks, &free_board(1, 2), Propagator::None);
        assert!(outcome.is_solved());
        assert_eq!(span_times(&model, "a"), [at(0, 6)]);
        assert_eq!(span_times(&model, "b"), [at(0, 7)]);
    }

    #[test]
    fn test_priority_claims_the_early_slot() {
        let tasks = [
            Task::new("low", at(1, 0)),
            Task::new("high", at(1, 0)).with_priority(5),
        ];
        let (model, _) = compile_and_solve(&tasks, &free_board(1, 2), Propagator::ForwardChecking);
        assert_eq!(span_times(&model, "high"), [at(0, 6)]);
        assert_eq!(span_times(&model, "low"), [at(0, 7)]);
    }
}

mod restoration {
    use super::*;

    /// Three one-hour tasks competing for two slots, with an ordering
    /// so that every propagator gets to prune before failing.
    fn overfull() -> Model {
        let tasks = [
            Task::new("a", at(1, 0)),
            Task::new("b", at(1, 0)).with_prerequisite("a"),
            Task::new("c", at(1, 0)),
        ];
        compiled(&tasks, &free_board(1, 2))
    }

    #[test]
    fn test_exhausted_search_restores_the_model() {
        for propagator in Propagator::ALL {
            let mut model = overfull();
            let before: Vec<Variable> = model.variables().to_vec();
            let outcome = solve(&mut model, propagator);
            assert_eq!(outcome.status, SearchStatus::Exhausted, "{propagator}");
            assert_eq!(model.variables(), before.as_slice());
            assert_pristine(&model);
        }
    }

    #[test]
    fn test_solved_search_keeps_assignment_and_restores_prunings() {
        let tasks = [
            Task::new("a", at(1, 0)),
            Task::new("b", at(1, 0)).with_prerequisite("a"),
        ];
        let mut model = compiled(&tasks, &free_board(1, 3));
        let outcome = solve(&mut model, Propagator::Gac);
        assert!(outcome.is_solved());
        assert!(outcome.stats.prunings > 0);
        assert!(model.is_complete());
        assert!(model
            .variables()
            .iter()
            .all(|v| v.live_count() == v.domain_size()));
        assert!(audit(&model).is_empty());
    }

    #[test]
    fn test_model_can_be_solved_again() {
        let tasks = [Task::new("essay", at(1, 0)).with_span(3).splittable()];
        let mut model = compiled(&tasks, &free_board(1, 4));
        let first = solve(&mut model, Propagator::ForwardChecking);
        let solution = model.solution();

        let second = solve(&mut model, Propagator::None);
        assert!(first.is_solved() && second.is_solved());
        assert_eq!(model.solution(), solution);
        assert!(audit(&model).is_empty());
    }
}

mod limits {
    use super::*;

    fn hard() -> Model {
        let tasks: Vec<Task> = (0..4)
            .map(|i| Task::new(format!("t{i}"), at(1, 0)))
            .collect();
        compiled(&tasks, &free_board(1, 3))
    }

    #[test]
    fn test_decision_limit_interrupts_and_unwinds() {
        let mut model = hard();
        let config = SearchConfig::default().with_decision_limit(2);
        let outcome = Search::new(&mut model, Propagator::None)
            .with_config(config)
            .run();
        assert_eq!(outcome.status, SearchStatus::Interrupted);
        assert_eq!(outcome.stats.decisions, 2);
        assert_pristine(&model);
    }

    #[test]
    fn test_zero_time_limit_interrupts_before_deciding() {
        let mut model = hard();
        let config = SearchConfig::default().with_time_limit(Duration::ZERO);
        let outcome = Search::new(&mut model, Propagator::Gac)
            .with_config(config)
            .run();
        assert_eq!(outcome.status, SearchStatus::Interrupted);
        assert_eq!(outcome.stats.decisions, 0);
        assert_pristine(&model);
    }

    #[test]
    fn test_generous_limits_do_not_change_the_verdict() {
        let tasks = [Task::new("a", at(1, 0)), Task::new("b", at(1, 0))];
        let mut model = compiled(&tasks, &free_board(1, 2));
        let config = SearchConfig::default()
            .with_decision_limit(1_000)
            .with_time_limit(Duration::from_secs(60))
            .with_trace(true);
        let outcome = Search::new(&mut model, Propagator::ForwardChecking)
            .with_config(config)
            .run();
        assert!(outcome.is_solved());
        assert_eq!(outcome.stats.decisions, 2);
    }
}

mod propagation {
    use super::*;

    #[test]
    fn test_root_wipeout_needs_no_decision() {
        let tasks = [
            Task::new("a", at(1, 0)).fixed_at(at(0, 8)),
            Task::new("b", at(1, 0)).fixed_at(at(0, 7)).with_prerequisite("a"),
        ];
        let mut model = compiled(&tasks, &free_board(1, 4));
        let outcome = solve(&mut model, Propagator::Gac);
        assert_eq!(outcome.status, SearchStatus::Exhausted);
        assert_eq!(outcome.stats.decisions, 0);
        assert_pristine(&model);
    }

    #[test]
    fn test_stronger_propagation_decides_less() {
        // Five pieces of one task into four slots; only pruning notices early.
        let tasks = [Task::new("essay", at(1, 0)).with_span(5).splittable()];
        let mut decisions = Vec::new();
        for propagator in Propagator::ALL {
            let mut model = compiled(&tasks, &free_board(1, 4));
            let outcome = solve(&mut model, propagator);
            assert_eq!(outcome.status, SearchStatus::Exhausted, "{propagator}");
            decisions.push(outcome.stats.decisions);
        }
        assert!(decisions[0] >= decisions[1]);
        assert!(decisions[1] >= decisions[2]);
        assert_eq!(decisions[2], 0);
    }
}
