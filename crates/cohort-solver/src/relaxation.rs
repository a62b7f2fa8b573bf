//! Linear relaxation of a model via the `microlp` simplex engine.
//!
//! Integrality is dropped: binary variables become continuous within
//! `[0, 1]`, narrowed to a single point by the branching fixings in force
//! at the node being bounded.

use microlp::{ComparisonOp, OptimizationDirection, Problem};

use crate::backend::BackendError;
use crate::model::{LinearModel, Relation, VarId, VarKind};

/// One branching decision: a binary variable pinned to 0 or 1.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fixing {
    pub var: VarId,
    pub value: bool,
}

/// Optimum of one relaxation.
#[derive(Debug, Clone)]
pub(crate) struct RelaxedSolution {
    pub objective: f64,
    pub values: Vec<f64>,
}

/// Solves the relaxation of `model` under the given fixings.
///
/// Returns `Ok(None)` when the relaxation is infeasible, which during
/// branching just prunes the node.
pub(crate) fn solve_relaxation(
    model: &LinearModel,
    fixings: &[Fixing],
) -> Result<Option<RelaxedSolution>, BackendError> {
    let mut lower = Vec::with_capacity(model.variable_count());
    let mut upper = Vec::with_capacity(model.variable_count());
    for variable in model.variables() {
        match variable.kind() {
            VarKind::Binary => {
                lower.push(0.0);
                upper.push(1.0);
            }
            VarKind::Continuous {
                lower: l,
                upper: u,
            } => {
                lower.push(l);
                upper.push(u);
            }
        }
    }
    for fixing in fixings {
        let pinned = if fixing.value { 1.0 } else { 0.0 };
        lower[fixing.var.index()] = pinned;
        upper[fixing.var.index()] = pinned;
    }

    let mut problem = Problem::new(OptimizationDirection::Minimize);
    let engine_vars: Vec<microlp::Variable> = model
        .variables()
        .iter()
        .enumerate()
        .map(|(idx, variable)| problem.add_var(variable.objective(), (lower[idx], upper[idx])))
        .collect();

    for constraint in model.constraints() {
        let terms: Vec<(microlp::Variable, f64)> = constraint
            .terms()
            .iter()
            .map(|&(var, coefficient)| (engine_vars[var.index()], coefficient))
            .collect();
        let op = match constraint.relation() {
            Relation::Equal => ComparisonOp::Eq,
            Relation::LessOrEqual => ComparisonOp::Le,
            Relation::GreaterOrEqual => ComparisonOp::Ge,
        };
        problem.add_constraint(terms.as_slice(), op, constraint.rhs());
    }

    match problem.solve() {
        Ok(solution) => {
            let values = engine_vars.iter().map(|&var| solution[var]).collect();
            Ok(Some(RelaxedSolution {
                objective: solution.objective(),
                values,
            }))
        }
        Err(microlp::Error::Infeasible) => Ok(None),
        Err(microlp::Error::Unbounded) => Err(BackendError::Unbounded),
        Err(other) => Err(BackendError::Relaxation(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearModel;

    #[test]
    fn test_continuous_minimum_at_bound() {
        let mut model = LinearModel::new("m");
        let y = model.add_continuous("y", 0.0, 10.0);
        model.set_objective(y, 1.0);
        model.add_constraint("floor", vec![(y, 1.0)], Relation::GreaterOrEqual, 3.0);

        let relaxed = solve_relaxation(&model, &[]).unwrap().unwrap();
        assert!((relaxed.objective - 3.0).abs() < 1e-6);
        assert!((relaxed.values[y.index()] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_binary_relaxes_to_fraction() {
        // minimize -(a + b) with 2a + 2b <= 3 relaxes to a = b = 0.75.
        let mut model = LinearModel::new("m");
        let a = model.add_binary("a");
        let b = model.add_binary("b");
        model.set_objective(a, -1.0);
        model.set_objective(b, -1.0);
        model.add_constraint(
            "cap",
            vec![(a, 2.0), (b, 2.0)],
            Relation::LessOrEqual,
            3.0,
        );

        let relaxed = solve_relaxation(&model, &[]).unwrap().unwrap();
        assert!((relaxed.objective + 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_fixing_narrows_a_binary() {
        let mut model = LinearModel::new("m");
        let a = model.add_binary("a");
        model.set_objective(a, -1.0);
        model.add_constraint("cap", vec![(a, 1.0)], Relation::LessOrEqual, 1.0);

        let fixed_off = solve_relaxation(&model, &[Fixing { var: a, value: false }])
            .unwrap()
            .unwrap();
        assert!(fixed_off.values[a.index()].abs() < 1e-6);
        assert!(fixed_off.objective.abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_relaxation_is_none() {
        let mut model = LinearModel::new("m");
        let a = model.add_binary("a");
        model.add_constraint("high", vec![(a, 1.0)], Relation::GreaterOrEqual, 0.7);
        model.add_constraint("low", vec![(a, 1.0)], Relation::LessOrEqual, 0.3);

        assert!(solve_relaxation(&model, &[]).unwrap().is_none());
    }
}
