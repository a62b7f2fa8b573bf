//! Post-solve group statistics.

use crate::assignment::Assignment;
use crate::subject::{Roster, SubjectId};

/// Summary of one group after solving.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// 0-based group index.
    pub group: usize,
    /// Number of subjects in the group.
    pub member_count: usize,
    /// Member ids in roster order.
    pub member_ids: Vec<SubjectId>,
    /// Mean tumor size within the group.
    pub mean_tumor_size: f64,
    /// Deviation of the group mean from the overall mean.
    pub overall_mean_deviation: f64,
}

/// Per-group statistics derived from a solved assignment.
///
/// Read-only; computed once after the solve and handed to reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatistics {
    groups: Vec<GroupSummary>,
    overall_mean: f64,
}

impl GroupStatistics {
    /// Aggregates tumor sizes per group.
    ///
    /// The assignment is already validated against its plan, so every group
    /// is non-empty and every subject resolves to exactly one group.
    pub fn compute(roster: &Roster, assignment: &Assignment) -> Self {
        let group_count = assignment.group_count();
        let mut totals = vec![0.0f64; group_count];
        let mut member_ids = vec![Vec::new(); group_count];

        for subject in roster.iter() {
            let group = assignment
                .group_of(subject.id())
                .expect("assignment covers every roster subject");
            totals[group] += subject.tumor_size();
            member_ids[group].push(subject.id().clone());
        }

        let overall_mean = roster.overall_mean();
        let groups = totals
            .iter()
            .zip(member_ids)
            .enumerate()
            .map(|(group, (&total, ids))| {
                let mean = total / ids.len() as f64;
                GroupSummary {
                    group,
                    member_count: ids.len(),
                    member_ids: ids,
                    mean_tumor_size: mean,
                    overall_mean_deviation: mean - overall_mean,
                }
            })
            .collect();

        GroupStatistics {
            groups,
            overall_mean,
        }
    }

    /// Summaries in group order.
    pub fn groups(&self) -> &[GroupSummary] {
        &self.groups
    }

    /// Mean tumor size across all subjects.
    pub fn overall_mean(&self) -> f64 {
        self.overall_mean
    }

    /// Largest group mean minus smallest group mean.
    pub fn spread(&self) -> f64 {
        let mut smallest = f64::INFINITY;
        let mut largest = f64::NEG_INFINITY;
        for summary in &self.groups {
            smallest = smallest.min(summary.mean_tumor_size);
            largest = largest.max(summary.mean_tumor_size);
        }
        largest - smallest
    }
}
