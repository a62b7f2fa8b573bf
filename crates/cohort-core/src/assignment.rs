//! Subject-to-group assignments.

use std::collections::HashSet;

use crate::error::{CohortError, Result};
use crate::plan::GroupPlan;
use crate::subject::SubjectId;

/// Maps every subject to exactly one group index.
///
/// Group indices are 0-based internally; user-facing output renders them
/// 1-based. An assignment is validated against its [`GroupPlan`] at
/// construction and never mutated afterwards: each subject appears exactly
/// once and each group holds exactly its planned number of subjects.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    entries: Vec<(SubjectId, usize)>,
    group_count: usize,
}

impl Assignment {
    /// Validates `(subject, group index)` pairs against the plan.
    ///
    /// # Errors
    ///
    /// [`CohortError::DuplicateIdentifier`] when a subject appears twice,
    /// [`CohortError::InvalidConfiguration`] when a group index is out of
    /// range or a group's cardinality differs from its planned size.
    pub fn new(entries: Vec<(SubjectId, usize)>, plan: &GroupPlan) -> Result<Self> {
        let group_count = plan.group_count();
        let mut cardinalities = vec![0usize; group_count];
        let mut seen = HashSet::with_capacity(entries.len());

        for (id, group) in &entries {
            if !seen.insert(id) {
                return Err(CohortError::DuplicateIdentifier(id.as_str().to_owned()));
            }
            if *group >= group_count {
                return Err(CohortError::InvalidConfiguration(format!(
                    "subject \"{id}\" assigned to group index {group}, but the plan has {group_count} groups"
                )));
            }
            cardinalities[*group] += 1;
        }

        if entries.len() != plan.subject_count() {
            return Err(CohortError::InvalidConfiguration(format!(
                "assignment covers {} subjects, but the plan accounts for {}",
                entries.len(),
                plan.subject_count()
            )));
        }
        for (group, (&actual, &planned)) in
            cardinalities.iter().zip(plan.sizes().iter()).enumerate()
        {
            if actual != planned {
                return Err(CohortError::InvalidConfiguration(format!(
                    "group {group} holds {actual} subjects, planned size is {planned}"
                )));
            }
        }

        Ok(Assignment {
            entries,
            group_count,
        })
    }

    /// Number of assigned subjects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of groups in the underlying plan.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// `(subject, group index)` pairs in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (&SubjectId, usize)> {
        self.entries.iter().map(|(id, group)| (id, *group))
    }

    /// The group a subject was assigned to.
    pub fn group_of(&self, id: &SubjectId) -> Option<usize> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, group)| *group)
    }

    /// Subjects assigned to a group, in roster order.
    pub fn members_of(&self, group: usize) -> impl Iterator<Item = &SubjectId> {
        self.entries
            .iter()
            .filter(move |(_, entry_group)| *entry_group == group)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, usize)]) -> Vec<(SubjectId, usize)> {
        pairs
            .iter()
            .map(|(id, group)| (SubjectId::new(*id), *group))
            .collect()
    }

    #[test]
    fn test_valid_assignment() {
        let plan = GroupPlan::new(4, 2).unwrap();
        let assignment =
            Assignment::new(entries(&[("a", 0), ("b", 1), ("c", 0), ("d", 1)]), &plan).unwrap();
        assert_eq!(assignment.len(), 4);
        assert_eq!(assignment.group_of(&SubjectId::new("c")), Some(0));
        let group_one: Vec<_> = assignment.members_of(1).map(SubjectId::as_str).collect();
        assert_eq!(group_one, vec!["b", "d"]);
    }

    #[test]
    fn test_cardinality_mismatch_is_rejected() {
        let plan = GroupPlan::new(4, 2).unwrap();
        let err =
            Assignment::new(entries(&[("a", 0), ("b", 0), ("c", 0), ("d", 1)]), &plan).unwrap_err();
        assert!(matches!(err, CohortError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_out_of_range_group_is_rejected() {
        let plan = GroupPlan::new(4, 2).unwrap();
        let err =
            Assignment::new(entries(&[("a", 0), ("b", 1), ("c", 0), ("d", 2)]), &plan).unwrap_err();
        assert!(matches!(err, CohortError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_duplicate_subject_is_rejected() {
        let plan = GroupPlan::new(4, 2).unwrap();
        let err =
            Assignment::new(entries(&[("a", 0), ("a", 1), ("c", 0), ("d", 1)]), &plan).unwrap_err();
        assert!(matches!(err, CohortError::DuplicateIdentifier(_)));
    }

    #[test]
    fn test_missing_subject_is_rejected() {
        let plan = GroupPlan::new(4, 2).unwrap();
        let err = Assignment::new(entries(&[("a", 0), ("b", 1)]), &plan).unwrap_err();
        assert!(matches!(err, CohortError::InvalidConfiguration(_)));
    }
}
