//! Depth-first branch-and-bound over linear relaxations.
//!
//! The default [`MilpBackend`]. Each node solves the relaxation of the
//! model under the binary fixings accumulated along its branch; fractional
//! relaxations branch on their most fractional binary variable, integral
//! ones become incumbents, and nodes whose bound cannot beat the incumbent
//! are pruned. The deadline is checked between nodes.
//!
//! Logging levels:
//! - **DEBUG**: search start/end summaries and new incumbents
//! - **TRACE**: individual node bounds

use std::time::Duration;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::backend::{BackendError, MilpBackend, MilpSolution, SolveOutcome};
use crate::deadline::SolveDeadline;
use crate::model::{LinearModel, VarId, VarKind, INTEGRALITY_TOLERANCE};
use crate::relaxation::{solve_relaxation, Fixing};
use crate::stats::SolveStats;

/// Slack below the incumbent objective a node bound must reach to stay open.
const BOUND_TOLERANCE: f64 = 1e-9;

/// Fixings accumulated along one branch; short for any realistic dive.
type Fixings = SmallVec<[Fixing; 16]>;

/// Branch-and-bound MILP engine on top of the `microlp` simplex.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBound;

impl BranchAndBound {
    pub fn new() -> Self {
        BranchAndBound
    }
}

impl MilpBackend for BranchAndBound {
    fn solve(
        &self,
        model: &LinearModel,
        time_limit: Duration,
    ) -> Result<SolveOutcome, BackendError> {
        let deadline = SolveDeadline::start(time_limit);
        let mut stats = SolveStats::default();
        stats.start();

        debug!(
            event = "search_start",
            columns = model.variable_count(),
            integers = model.integer_count(),
            rows = model.constraint_count(),
            time_limit_secs = time_limit.as_secs_f64(),
        );

        let mut incumbent: Option<(Vec<f64>, f64)> = None;
        let mut pending: Vec<Fixings> = vec![Fixings::new()];
        let mut timed_out = false;

        while let Some(fixings) = pending.pop() {
            if deadline.expired() {
                timed_out = true;
                break;
            }

            stats.record_node();
            let Some(relaxed) = solve_relaxation(model, &fixings)? else {
                continue;
            };
            trace!(
                event = "node_bounded",
                depth = fixings.len(),
                bound = relaxed.objective,
            );

            if let Some((_, best)) = &incumbent {
                if relaxed.objective >= best - BOUND_TOLERANCE {
                    continue;
                }
            }

            match most_fractional(model, &relaxed.values) {
                None => {
                    // Integral, and it beat the incumbent bound check above.
                    stats.record_incumbent();
                    debug!(
                        event = "incumbent",
                        objective = relaxed.objective,
                        nodes = stats.nodes_explored,
                    );
                    incumbent = Some((relaxed.values, relaxed.objective));
                }
                Some(branch_var) => {
                    let value = relaxed.values[branch_var.index()];
                    let nearer = value >= 0.5;

                    let mut away = fixings.clone();
                    away.push(Fixing {
                        var: branch_var,
                        value: !nearer,
                    });
                    let mut toward = fixings;
                    toward.push(Fixing {
                        var: branch_var,
                        value: nearer,
                    });
                    // Dive toward the nearer bound first: pushed last, popped first.
                    pending.push(away);
                    pending.push(toward);
                }
            }
        }

        debug!(
            event = "search_end",
            nodes = stats.nodes_explored,
            incumbents = stats.incumbents,
            elapsed_secs = stats.elapsed().as_secs_f64(),
            timed_out,
        );

        let outcome = match (incumbent, timed_out) {
            (Some((values, objective)), false) => {
                SolveOutcome::Optimal(MilpSolution::new(values, objective, stats))
            }
            (Some((values, objective)), true) => {
                SolveOutcome::FeasibleTimeLimit(MilpSolution::new(values, objective, stats))
            }
            (None, false) => SolveOutcome::Infeasible,
            (None, true) => SolveOutcome::NoSolutionTimeLimit,
        };
        Ok(outcome)
    }
}

// Picks the binary variable whose relaxed value is farthest from integral,
// or None when every binary is integral within tolerance.
fn most_fractional(model: &LinearModel, values: &[f64]) -> Option<VarId> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, variable) in model.variables().iter().enumerate() {
        if !matches!(variable.kind(), VarKind::Binary) {
            continue;
        }
        let distance = (values[idx] - values[idx].round()).abs();
        if distance <= INTEGRALITY_TOLERANCE {
            continue;
        }
        if best.map_or(true, |(_, best_distance)| distance > best_distance) {
            best = Some((idx, distance));
        }
    }
    best.map(|(idx, _)| VarId(idx))
}

#[cfg(test)]
mod tests;
