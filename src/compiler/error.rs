use thiserror::Error;

/// Structural problems in the tasks or board handed to the compiler.
///
/// Infeasibility (a task that simply does not fit) is not an error; it is
/// discovered by the search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Task name must not be empty")]
    EmptyTaskName,

    #[error("Task name appears more than once: {0}")]
    DuplicateTask(String),

    #[error("Task {0} needs a span of at least one slot")]
    ZeroSpan(String),

    #[error("Task {0} needs a concurrency limit of at least one")]
    ZeroLimit(String),

    #[error("Task {task} lists unknown prerequisite {prerequisite}")]
    UnknownPrerequisite { task: String, prerequisite: String },

    #[error("Prerequisites of task {0} form a cycle")]
    CyclicPrerequisites(String),

    /// Only free cells are checked.
    #[error("Cell {cell} of day {day} falls outside the day")]
    HourOutOfRange { day: usize, cell: usize },

    #[error("Day {0} of the board lies outside the supported calendar")]
    DateOutOfRange(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_prerequisite_display() {
        let e = CompileError::UnknownPrerequisite {
            task: "essay".to_string(),
            prerequisite: "reading".to_string(),
        };
        assert_eq!(e.to_string(), "Task essay lists unknown prerequisite reading");
    }

    #[test]
    fn hour_out_of_range_display() {
        let e = CompileError::HourOutOfRange { day: 2, cell: 19 };
        assert_eq!(e.to_string(), "Cell 19 of day 2 falls outside the day");
    }

    #[test]
    fn cycle_display() {
        let e = CompileError::CyclicPrerequisites("a".to_string());
        assert!(e.to_string().contains("cycle"));
    }

    #[test]
    fn error_equality() {
        assert_eq!(
            CompileError::ZeroSpan("a".to_string()),
            CompileError::ZeroSpan("a".to_string())
        );
        assert_ne!(CompileError::EmptyTaskName, CompileError::DateOutOfRange(0));
    }
}
