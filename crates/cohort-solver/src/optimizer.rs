//! The assignment optimizer.
//!
//! Builds the grouping model from a roster and a group plan, hands it to a
//! [`MilpBackend`], and turns the solved variables back into a validated
//! [`Assignment`] with per-group statistics.
//!
//! Logging levels:
//! - **INFO**: optimize start/end with problem scale and outcome
//! - **DEBUG**: model statistics after construction

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use cohort_core::{Assignment, CohortError, GroupPlan, GroupStatistics, Result, Roster};

use crate::backend::{MilpBackend, MilpSolution, SolveOutcome};
use crate::branch_bound::BranchAndBound;
use crate::model::{LinearModel, Relation, VarId};
use crate::stats::SolveStats;

/// Relative tolerance when cross-checking the achieved objective against
/// the spread recomputed from the extracted assignment.
const OBJECTIVE_CHECK_TOLERANCE: f64 = 1e-6;

/// Terminal status of a successful optimization.
///
/// Infeasibility and empty-handed timeouts surface as errors instead; see
/// [`CohortError::Solver`] and [`CohortError::TimeoutNoSolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The returned assignment is proven optimal.
    Optimal,
    /// The time limit elapsed; the returned assignment is the best found.
    FeasibleTimeLimit,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => f.write_str("optimal"),
            SolveStatus::FeasibleTimeLimit => f.write_str("feasible (time limit reached)"),
        }
    }
}

/// Everything one optimization run produces.
#[derive(Debug, Clone)]
pub struct GroupingOutcome {
    pub assignment: Assignment,
    /// Achieved spread: largest group mean minus smallest group mean.
    pub objective_value: f64,
    pub status: SolveStatus,
    pub statistics: GroupStatistics,
    pub solve_stats: SolveStats,
}

/// Assigns subjects to planned groups so that group means match as closely
/// as possible.
///
/// Each [`optimize`](GroupingOptimizer::optimize) call builds a fresh model
/// and runs to completion or deadline; the optimizer itself is immutable
/// and calls are independent of each other.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use cohort_core::{GroupPlan, Roster, Subject};
/// use cohort_solver::GroupingOptimizer;
///
/// let roster = Roster::new(vec![
///     Subject::new("m1", 1.0),
///     Subject::new("m2", 2.0),
///     Subject::new("m3", 3.0),
///     Subject::new("m4", 4.0),
/// ]).unwrap();
/// let plan = GroupPlan::new(roster.len(), 2).unwrap();
///
/// let outcome = GroupingOptimizer::new()
///     .optimize(&roster, &plan, Duration::from_secs(10))
///     .unwrap();
/// assert!(outcome.objective_value.abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupingOptimizer<B = BranchAndBound> {
    backend: B,
    model_dump_path: Option<PathBuf>,
}

impl GroupingOptimizer<BranchAndBound> {
    /// Creates an optimizer with the default branch-and-bound backend.
    pub fn new() -> Self {
        GroupingOptimizer {
            backend: BranchAndBound::new(),
            model_dump_path: None,
        }
    }
}

impl<B: MilpBackend> GroupingOptimizer<B> {
    /// Substitutes another MILP engine.
    pub fn with_backend<B2: MilpBackend>(self, backend: B2) -> GroupingOptimizer<B2> {
        GroupingOptimizer {
            backend,
            model_dump_path: self.model_dump_path,
        }
    }

    /// Writes the constructed model to `path` in LP format before solving.
    pub fn with_model_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_dump_path = Some(path.into());
        self
    }

    /// Finds the assignment minimizing the spread between group means.
    ///
    /// # Errors
    ///
    /// [`CohortError::InvalidConfiguration`] when the plan does not cover
    /// the roster or the time limit is zero — checked before any model is
    /// built. [`CohortError::Solver`] when the backend fails or reports the
    /// model infeasible. [`CohortError::TimeoutNoSolution`] when the
    /// deadline expires before a first incumbent.
    pub fn optimize(
        &self,
        roster: &Roster,
        plan: &GroupPlan,
        time_limit: Duration,
    ) -> Result<GroupingOutcome> {
        if plan.subject_count() != roster.len() {
            return Err(CohortError::InvalidConfiguration(format!(
                "the group plan accounts for {} subjects, the roster holds {}",
                plan.subject_count(),
                roster.len()
            )));
        }
        if time_limit.is_zero() {
            return Err(CohortError::InvalidConfiguration(
                "the time limit must be positive".into(),
            ));
        }

        let (model, assign_vars) = build_grouping_model(roster, plan);
        debug!(
            event = "model_built",
            columns = model.variable_count(),
            integers = model.integer_count(),
            rows = model.constraint_count(),
            nonzeros = model.nonzero_count(),
        );

        if let Some(path) = &self.model_dump_path {
            model
                .write_lp_file(path)
                .map_err(|source| CohortError::ModelWrite {
                    path: path.clone(),
                    source,
                })?;
            info!(event = "model_dumped", path = %path.display());
        }

        info!(
            event = "optimize_start",
            subjects = roster.len(),
            groups = plan.group_count(),
            time_limit_secs = time_limit.as_secs_f64(),
        );

        let outcome = self
            .backend
            .solve(&model, time_limit)
            .map_err(|err| self.solver_error(err.to_string(), roster, plan))?;

        let (solution, status) = match outcome {
            SolveOutcome::Optimal(solution) => (solution, SolveStatus::Optimal),
            SolveOutcome::FeasibleTimeLimit(solution) => {
                (solution, SolveStatus::FeasibleTimeLimit)
            }
            SolveOutcome::Infeasible => {
                return Err(self.solver_error(
                    "backend reported an infeasible model".into(),
                    roster,
                    plan,
                ));
            }
            SolveOutcome::NoSolutionTimeLimit => {
                return Err(CohortError::TimeoutNoSolution {
                    limit_seconds: time_limit.as_secs_f64(),
                });
            }
        };

        let assignment = self.extract_assignment(&solution, &assign_vars, roster, plan)?;
        let statistics = GroupStatistics::compute(roster, &assignment);

        // The mean variables are pinned by the solved binaries, so the
        // objective must agree with the spread recomputed from scratch.
        let objective_value = solution.objective();
        let scale = statistics.overall_mean().abs().max(1.0);
        if (statistics.spread() - objective_value).abs() > OBJECTIVE_CHECK_TOLERANCE * scale {
            return Err(self.solver_error(
                format!(
                    "objective value {} disagrees with recomputed spread {}",
                    objective_value,
                    statistics.spread()
                ),
                roster,
                plan,
            ));
        }

        info!(
            event = "optimize_end",
            status = %status,
            objective = objective_value,
            nodes = solution.stats().nodes_explored,
            elapsed_secs = solution.stats().elapsed().as_secs_f64(),
        );

        Ok(GroupingOutcome {
            assignment,
            objective_value,
            status,
            statistics,
            solve_stats: solution.stats().clone(),
        })
    }

    // Reads the solved binaries back into a validated assignment.
    fn extract_assignment(
        &self,
        solution: &MilpSolution,
        assign_vars: &[Vec<VarId>],
        roster: &Roster,
        plan: &GroupPlan,
    ) -> Result<Assignment> {
        let mut entries = Vec::with_capacity(roster.len());
        for (subject_idx, subject) in roster.iter().enumerate() {
            let mut chosen = None;
            for (group, &var) in assign_vars[subject_idx].iter().enumerate() {
                let selected = solution.binary_value(var).ok_or_else(|| {
                    self.solver_error(
                        format!(
                            "assignment variable for subject \"{}\" and group {} solved to \
                             fractional value {}",
                            subject.id(),
                            group,
                            solution.value(var)
                        ),
                        roster,
                        plan,
                    )
                })?;
                if selected {
                    if chosen.is_some() {
                        return Err(self.solver_error(
                            format!("subject \"{}\" selected for two groups", subject.id()),
                            roster,
                            plan,
                        ));
                    }
                    chosen = Some(group);
                }
            }
            let group = chosen.ok_or_else(|| {
                self.solver_error(
                    format!("subject \"{}\" selected for no group", subject.id()),
                    roster,
                    plan,
                )
            })?;
            entries.push((subject.id().clone(), group));
        }

        Assignment::new(entries, plan)
            .map_err(|err| self.solver_error(err.to_string(), roster, plan))
    }

    fn solver_error(&self, detail: String, roster: &Roster, plan: &GroupPlan) -> CohortError {
        CohortError::Solver {
            detail,
            subject_count: roster.len(),
            group_sizes: plan.sizes().to_vec(),
        }
    }
}

/// Builds the grouping model.
///
/// One binary per subject/group pair, one continuous mean per group, and
/// two scalar variables bracketing the group means; the objective minimizes
/// their difference. Returns the model and the assignment variables indexed
/// `[subject][group]`.
fn build_grouping_model(roster: &Roster, plan: &GroupPlan) -> (LinearModel, Vec<Vec<VarId>>) {
    let tumor_sizes = roster.tumor_sizes();
    let largest_size = tumor_sizes.iter().fold(0.0f64, |acc, &s| acc.max(s));
    let group_count = plan.group_count();

    let mut model = LinearModel::new("cohort_grouping");

    let assign_vars: Vec<Vec<VarId>> = (0..roster.len())
        .map(|subject| {
            (0..group_count)
                .map(|group| model.add_binary(format!("x_{subject}_{group}")))
                .collect()
        })
        .collect();
    let mean_vars: Vec<VarId> = (0..group_count)
        .map(|group| model.add_continuous(format!("group_mean_{group}"), 0.0, largest_size))
        .collect();
    let max_mean = model.add_continuous("max_mean", 0.0, largest_size);
    let min_mean = model.add_continuous("min_mean", 0.0, largest_size);

    // Each subject lands in exactly one group.
    for (subject, vars) in assign_vars.iter().enumerate() {
        let terms = vars.iter().map(|&var| (var, 1.0)).collect();
        model.add_constraint(format!("assign_once_{subject}"), terms, Relation::Equal, 1.0);
    }

    // Each group holds exactly its planned number of subjects.
    for (group, &size) in plan.sizes().iter().enumerate() {
        let terms = assign_vars.iter().map(|vars| (vars[group], 1.0)).collect();
        model.add_constraint(
            format!("group_size_{group}"),
            terms,
            Relation::Equal,
            size as f64,
        );
    }

    // Pin each group mean: sum of member sizes equals size * mean.
    for (group, &size) in plan.sizes().iter().enumerate() {
        let mut terms: Vec<(VarId, f64)> = assign_vars
            .iter()
            .zip(&tumor_sizes)
            .map(|(vars, &tumor_size)| (vars[group], tumor_size))
            .collect();
        terms.push((mean_vars[group], -(size as f64)));
        model.add_constraint(format!("group_mean_def_{group}"), terms, Relation::Equal, 0.0);
    }

    // Bracket the means and minimize the bracket width.
    for (group, &mean) in mean_vars.iter().enumerate() {
        model.add_constraint(
            format!("max_mean_ge_{group}"),
            vec![(max_mean, 1.0), (mean, -1.0)],
            Relation::GreaterOrEqual,
            0.0,
        );
        model.add_constraint(
            format!("min_mean_le_{group}"),
            vec![(min_mean, 1.0), (mean, -1.0)],
            Relation::LessOrEqual,
            0.0,
        );
    }
    model.set_objective(max_mean, 1.0);
    model.set_objective(min_mean, -1.0);

    (model, assign_vars)
}

#[cfg(test)]
mod tests;
