//! Tests for the branch-and-bound backend.

use std::time::Duration;

use super::*;
use crate::model::Relation;

const MINUTE: Duration = Duration::from_secs(60);

#[test]
fn test_pure_lp_solves_at_the_root() {
    let mut model = LinearModel::new("lp");
    let y = model.add_continuous("y", 0.0, 10.0);
    model.set_objective(y, 1.0);
    model.add_constraint("floor", vec![(y, 1.0)], Relation::GreaterOrEqual, 3.0);

    let outcome = BranchAndBound::new().solve(&model, MINUTE).unwrap();
    let SolveOutcome::Optimal(solution) = outcome else {
        panic!("expected an optimal outcome");
    };
    assert!((solution.objective() - 3.0).abs() < 1e-6);
    assert_eq!(solution.stats().nodes_explored, 1);
}

#[test]
fn test_integral_relaxation_needs_no_branching() {
    // minimize -(a + 2b) with a + b <= 1: the relaxation lands on b = 1.
    let mut model = LinearModel::new("m");
    let a = model.add_binary("a");
    let b = model.add_binary("b");
    model.set_objective(a, -1.0);
    model.set_objective(b, -2.0);
    model.add_constraint("pick_one", vec![(a, 1.0), (b, 1.0)], Relation::LessOrEqual, 1.0);

    let outcome = BranchAndBound::new().solve(&model, MINUTE).unwrap();
    let SolveOutcome::Optimal(solution) = outcome else {
        panic!("expected an optimal outcome");
    };
    assert!((solution.objective() + 2.0).abs() < 1e-6);
    assert_eq!(solution.binary_value(a), Some(false));
    assert_eq!(solution.binary_value(b), Some(true));
}

#[test]
fn test_fractional_relaxation_is_driven_integral() {
    // The relaxation of minimize -(a + b) with 2a + 2b <= 3 sits at
    // a = b = 0.75; the integral optimum picks exactly one variable.
    let mut model = LinearModel::new("m");
    let a = model.add_binary("a");
    let b = model.add_binary("b");
    model.set_objective(a, -1.0);
    model.set_objective(b, -1.0);
    model.add_constraint("cap", vec![(a, 2.0), (b, 2.0)], Relation::LessOrEqual, 3.0);

    let outcome = BranchAndBound::new().solve(&model, MINUTE).unwrap();
    let SolveOutcome::Optimal(solution) = outcome else {
        panic!("expected an optimal outcome");
    };
    assert!((solution.objective() + 1.0).abs() < 1e-6);
    let picked = [a, b]
        .iter()
        .filter(|&&var| solution.binary_value(var) == Some(true))
        .count();
    assert_eq!(picked, 1);
    assert!(solution.stats().nodes_explored > 1);
}

#[test]
fn test_lp_infeasible_model() {
    let mut model = LinearModel::new("m");
    let a = model.add_binary("a");
    model.add_constraint("high", vec![(a, 1.0)], Relation::GreaterOrEqual, 0.7);
    model.add_constraint("low", vec![(a, 1.0)], Relation::LessOrEqual, 0.3);

    let outcome = BranchAndBound::new().solve(&model, MINUTE).unwrap();
    assert!(matches!(outcome, SolveOutcome::Infeasible));
}

#[test]
fn test_integer_infeasible_model_is_found_by_branching() {
    // a = 0.5 is LP-feasible but admits no integral value.
    let mut model = LinearModel::new("m");
    let a = model.add_binary("a");
    model.add_constraint("half", vec![(a, 1.0)], Relation::Equal, 0.5);

    let outcome = BranchAndBound::new().solve(&model, MINUTE).unwrap();
    assert!(matches!(outcome, SolveOutcome::Infeasible));
}

#[test]
fn test_expired_deadline_without_incumbent() {
    let mut model = LinearModel::new("m");
    let a = model.add_binary("a");
    model.set_objective(a, 1.0);
    model.add_constraint("cap", vec![(a, 1.0)], Relation::LessOrEqual, 1.0);

    let outcome = BranchAndBound::new().solve(&model, Duration::ZERO).unwrap();
    assert!(matches!(outcome, SolveOutcome::NoSolutionTimeLimit));
}
