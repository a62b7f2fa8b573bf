//! Group-size planning.

use crate::error::{CohortError, Result};

/// Ordered target group sizes for one run.
///
/// The plan is derived once from the subject count and the minimum group
/// size. Invariants, checked by construction:
///
/// - sizes sum exactly to the subject count,
/// - every size is at least the minimum group size,
/// - sizes differ by at most one across groups.
///
/// The remainder left after filling `subject_count / min_group_size` groups
/// is spread evenly, with the first `remainder % group_count` groups taking
/// one extra subject. Which groups receive the extra subject carries no
/// meaning; the policy only has to be deterministic.
///
/// # Example
///
/// ```
/// use cohort_core::GroupPlan;
///
/// // 44 subjects with a minimum group size of 5: four groups of 6, four of 5.
/// let plan = GroupPlan::new(44, 5).unwrap();
/// assert_eq!(plan.group_count(), 8);
/// assert_eq!(plan.sizes(), &[6, 6, 6, 6, 5, 5, 5, 5]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    sizes: Vec<usize>,
    min_group_size: usize,
}

impl GroupPlan {
    /// Computes the group sizes for `subject_count` subjects with at least
    /// `min_group_size` subjects per group.
    ///
    /// # Errors
    ///
    /// [`CohortError::InvalidConfiguration`] when either argument is zero or
    /// when the subjects cannot fill even one minimum-size group.
    pub fn new(subject_count: usize, min_group_size: usize) -> Result<Self> {
        if subject_count == 0 {
            return Err(CohortError::InvalidConfiguration(
                "subject count must be positive".into(),
            ));
        }
        if min_group_size == 0 {
            return Err(CohortError::InvalidConfiguration(
                "minimum group size must be positive".into(),
            ));
        }

        let group_count = subject_count / min_group_size;
        if group_count == 0 {
            return Err(CohortError::InvalidConfiguration(format!(
                "{subject_count} subjects cannot fill one group of at least {min_group_size}"
            )));
        }

        let remainder = subject_count % min_group_size;
        let base = min_group_size + remainder / group_count;
        let bumped = remainder % group_count;
        let sizes = (0..group_count)
            .map(|group| if group < bumped { base + 1 } else { base })
            .collect();

        Ok(GroupPlan {
            sizes,
            min_group_size,
        })
    }

    /// Target sizes, one per group.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.sizes.len()
    }

    /// Total number of subjects the plan accounts for.
    pub fn subject_count(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// The minimum group size the plan was derived from.
    pub fn min_group_size(&self) -> usize {
        self.min_group_size
    }
}

#[cfg(test)]
mod tests;
