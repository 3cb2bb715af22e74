use std::fmt::Display;
use std::time::Duration;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Values tried after passing the capacity check.
    pub decisions: u64,
    /// Domain values removed by propagation, root included.
    pub prunings: u64,
    /// Decisions undone.
    pub backtracks: u64,
    pub elapsed: Duration,
}

impl Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} decisions, {} prunings, {} backtracks in {:.3}s",
            self.decisions,
            self.prunings,
            self.backtracks,
            self.elapsed.as_secs_f64()
        )
    }
}
