use std::time::Duration;

/// Optional limits and tracing for a [`Search`](super::Search).
///
/// The default searches exhaustively without tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Wall-clock budget, checked before each decision.
    pub time_limit: Option<Duration>,
    /// Maximum number of decisions.
    pub decision_limit: Option<u64>,
    /// Log every decision and backtrack at `trace` level.
    pub trace: bool,
}

impl SearchConfig {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_decision_limit(mut self, limit: u64) -> Self {
        self.decision_limit = Some(limit);
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
