//! Solve statistics.
//!
//! Stack-allocated counters for one branch-and-bound run.

use std::time::{Duration, Instant};

/// Counters recorded across one solve.
///
/// # Example
///
/// ```
/// use cohort_solver::stats::SolveStats;
///
/// let mut stats = SolveStats::default();
/// stats.start();
/// stats.record_node();
/// stats.record_node();
/// stats.record_incumbent();
///
/// assert_eq!(stats.nodes_explored, 2);
/// assert_eq!(stats.incumbents, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    start_time: Option<Instant>,
    /// Branch-and-bound nodes whose relaxation was solved.
    pub nodes_explored: u64,
    /// Times a new best integral solution was found.
    pub incumbents: u64,
}

impl SolveStats {
    /// Marks the start of the solve.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Elapsed time since the solve started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Records one explored node.
    pub fn record_node(&mut self) {
        self.nodes_explored += 1;
    }

    /// Records a new incumbent.
    pub fn record_incumbent(&mut self) {
        self.incumbents += 1;
    }

    /// Nodes explored per second.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.nodes_explored as f64 / secs
        } else {
            0.0
        }
    }
}
