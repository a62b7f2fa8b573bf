//! Tests for the assignment optimizer.

use std::time::Duration;

use cohort_core::{Subject, SubjectId};

use super::*;

const MINUTE: Duration = Duration::from_secs(60);

fn roster_of(values: &[f64]) -> Roster {
    let subjects = values
        .iter()
        .enumerate()
        .map(|(idx, &value)| Subject::new(format!("m{}", idx + 1), value))
        .collect();
    Roster::new(subjects).unwrap()
}

#[test]
fn test_equal_values_reach_zero_spread() {
    let roster = roster_of(&[7.5; 6]);
    let plan = GroupPlan::new(6, 2).unwrap();

    let outcome = GroupingOptimizer::new()
        .optimize(&roster, &plan, MINUTE)
        .unwrap();

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert!(outcome.objective_value.abs() < 1e-6);
}

#[test]
fn test_one_two_three_four_balances_perfectly() {
    // {1, 4} and {2, 3} both average 2.5; any grouping achieving spread 0
    // is acceptable, so only the objective is asserted.
    let roster = roster_of(&[1.0, 2.0, 3.0, 4.0]);
    let plan = GroupPlan::new(4, 2).unwrap();

    let outcome = GroupingOptimizer::new()
        .optimize(&roster, &plan, MINUTE)
        .unwrap();

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert!(outcome.objective_value.abs() < 1e-6);
    assert!(outcome.statistics.spread().abs() < 1e-6);
}

#[test]
fn test_unavoidable_spread_is_minimized() {
    // 1..=6 into two groups of three: sums split 10/11 at best, so the
    // smallest achievable spread is 1/3.
    let roster = roster_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let plan = GroupPlan::new(6, 3).unwrap();

    let outcome = GroupingOptimizer::new()
        .optimize(&roster, &plan, MINUTE)
        .unwrap();

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert!((outcome.objective_value - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn test_single_group_has_zero_spread() {
    let roster = roster_of(&[3.0, 9.0, 27.0]);
    let plan = GroupPlan::new(3, 3).unwrap();

    let outcome = GroupingOptimizer::new()
        .optimize(&roster, &plan, MINUTE)
        .unwrap();

    assert_eq!(outcome.assignment.group_count(), 1);
    assert!(outcome.objective_value.abs() < 1e-6);
}

#[test]
fn test_cardinalities_match_the_plan() {
    let roster = roster_of(&[4.0, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0]);
    let plan = GroupPlan::new(7, 3).unwrap();
    assert_eq!(plan.sizes(), &[4, 3]);

    let outcome = GroupingOptimizer::new()
        .optimize(&roster, &plan, MINUTE)
        .unwrap();

    for (group, &size) in plan.sizes().iter().enumerate() {
        assert_eq!(outcome.assignment.members_of(group).count(), size);
    }
    let assigned: Vec<SubjectId> = outcome
        .assignment
        .iter()
        .map(|(id, _)| id.clone())
        .collect();
    assert_eq!(assigned.len(), roster.len());
}

#[test]
fn test_plan_not_covering_roster_fails_before_solving() {
    let roster = roster_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let plan = GroupPlan::new(4, 2).unwrap();

    let err = GroupingOptimizer::new()
        .optimize(&roster, &plan, MINUTE)
        .unwrap_err();
    assert!(matches!(err, CohortError::InvalidConfiguration(_)));
}

#[test]
fn test_zero_time_limit_is_invalid() {
    let roster = roster_of(&[1.0, 2.0]);
    let plan = GroupPlan::new(2, 1).unwrap();

    let err = GroupingOptimizer::new()
        .optimize(&roster, &plan, Duration::ZERO)
        .unwrap_err();
    assert!(matches!(err, CohortError::InvalidConfiguration(_)));
}

#[test]
fn test_vanishing_time_limit_times_out_without_solution() {
    let roster = roster_of(&[1.0, 2.0, 3.0, 4.0]);
    let plan = GroupPlan::new(4, 2).unwrap();

    let err = GroupingOptimizer::new()
        .optimize(&roster, &plan, Duration::from_nanos(1))
        .unwrap_err();
    assert!(matches!(err, CohortError::TimeoutNoSolution { .. }));
}

#[test]
fn test_model_dump_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grouping.lp");
    let roster = roster_of(&[1.0, 2.0, 3.0, 4.0]);
    let plan = GroupPlan::new(4, 2).unwrap();

    GroupingOptimizer::new()
        .with_model_dump(&path)
        .optimize(&roster, &plan, MINUTE)
        .unwrap();

    let dump = std::fs::read_to_string(&path).unwrap();
    assert!(dump.contains("Minimize"));
    assert!(dump.contains(" obj: max_mean - min_mean"));
    assert!(dump.contains("x_0_0"));
    assert!(dump.contains("End"));
}

#[test]
fn test_two_spaced_pairs_balance_exactly() {
    let roster = roster_of(&[0.0, 10.0, 0.0, 10.0]);
    let plan = GroupPlan::new(4, 2).unwrap();

    let outcome = GroupingOptimizer::new()
        .optimize(&roster, &plan, MINUTE)
        .unwrap();
    assert!(outcome.objective_value.abs() < 1e-6);

    // Each group must pair one small with one large subject.
    for summary in outcome.statistics.groups() {
        assert!((summary.mean_tumor_size - 5.0).abs() < 1e-6);
        assert_eq!(summary.member_count, 2);
    }
}
