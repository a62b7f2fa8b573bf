//! The pluggable MILP solving capability.
//!
//! [`MilpBackend`] is the seam between model construction and the engine
//! that searches for integral solutions. The default implementation is
//! [`crate::branch_bound::BranchAndBound`]; any conforming engine can be
//! substituted through [`crate::optimizer::GroupingOptimizer::with_backend`].

use std::time::Duration;

use thiserror::Error;

use crate::model::{LinearModel, VarId, INTEGRALITY_TOLERANCE};
use crate::stats::SolveStats;

/// Backend-internal failures.
///
/// Infeasibility and running out of time are *outcomes*, not errors; see
/// [`SolveOutcome`].
#[derive(Debug, Error)]
pub enum BackendError {
    /// The linear-relaxation engine failed.
    #[error("linear relaxation failed: {0}")]
    Relaxation(String),

    /// The model is unbounded, which a well-formed grouping model never is.
    #[error("the model is unbounded")]
    Unbounded,
}

/// Terminal state of one solve.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    /// Optimality proven before the time limit.
    Optimal(MilpSolution),
    /// The time limit elapsed; the best incumbent found so far is returned.
    FeasibleTimeLimit(MilpSolution),
    /// No integral solution exists.
    Infeasible,
    /// The time limit elapsed before any incumbent was found.
    NoSolutionTimeLimit,
}

/// A feasible integral solution with its objective value.
#[derive(Debug, Clone)]
pub struct MilpSolution {
    values: Vec<f64>,
    objective: f64,
    stats: SolveStats,
}

impl MilpSolution {
    pub fn new(values: Vec<f64>, objective: f64, stats: SolveStats) -> Self {
        MilpSolution {
            values,
            objective,
            stats,
        }
    }

    /// Solved value of a variable.
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    /// Reads a binary variable back as a bool.
    ///
    /// Returns `None` when the solved value is farther than
    /// [`INTEGRALITY_TOLERANCE`] from both 0 and 1.
    pub fn binary_value(&self, var: VarId) -> Option<bool> {
        let value = self.values[var.index()];
        if (value - 1.0).abs() <= INTEGRALITY_TOLERANCE {
            Some(true)
        } else if value.abs() <= INTEGRALITY_TOLERANCE {
            Some(false)
        } else {
            None
        }
    }

    /// Achieved objective value.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Search statistics recorded while this solution was found.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }
}

/// A MILP engine: solves a finished model under a wall-clock time limit.
pub trait MilpBackend {
    fn solve(
        &self,
        model: &LinearModel,
        time_limit: Duration,
    ) -> Result<SolveOutcome, BackendError>;
}
