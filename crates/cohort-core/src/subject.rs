//! Subjects and the validated roster they are collected into.

use std::collections::HashSet;
use std::fmt;

use crate::error::{CohortError, Result};

/// Opaque unique identifier of a subject.
///
/// Identifiers read from input files may be strings or numbers; numbers are
/// rendered to their textual form so that the rest of the pipeline only deals
/// with one representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        SubjectId(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        SubjectId::new(id)
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        SubjectId::new(id)
    }
}

/// A single lab subject: unique id plus measured tumor size.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    id: SubjectId,
    tumor_size: f64,
}

impl Subject {
    /// Creates a subject. Validation happens when subjects are collected
    /// into a [`Roster`].
    pub fn new(id: impl Into<SubjectId>, tumor_size: f64) -> Self {
        Subject {
            id: id.into(),
            tumor_size,
        }
    }

    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    pub fn tumor_size(&self) -> f64 {
        self.tumor_size
    }
}

/// The immutable, validated subject set for one run.
///
/// Construction enforces the input invariants once, so downstream code never
/// re-checks them: at least one subject, unique ids, and finite non-negative
/// tumor sizes.
///
/// # Example
///
/// ```
/// use cohort_core::{Roster, Subject};
///
/// let roster = Roster::new(vec![
///     Subject::new("m1", 120.0),
///     Subject::new("m2", 90.5),
/// ]).unwrap();
///
/// assert_eq!(roster.len(), 2);
/// assert!((roster.overall_mean() - 105.25).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Roster {
    subjects: Vec<Subject>,
}

impl Roster {
    /// Validates and wraps a subject list.
    ///
    /// # Errors
    ///
    /// [`CohortError::DuplicateIdentifier`] when two subjects share an id,
    /// [`CohortError::InvalidConfiguration`] when the list is empty or a
    /// tumor size is negative or not finite.
    pub fn new(subjects: Vec<Subject>) -> Result<Self> {
        if subjects.is_empty() {
            return Err(CohortError::InvalidConfiguration(
                "the roster must contain at least one subject".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(subjects.len());
        for subject in &subjects {
            if !seen.insert(subject.id()) {
                return Err(CohortError::DuplicateIdentifier(
                    subject.id().as_str().to_owned(),
                ));
            }
            if !subject.tumor_size().is_finite() || subject.tumor_size() < 0.0 {
                return Err(CohortError::InvalidConfiguration(format!(
                    "subject \"{}\" has invalid tumor size {}; sizes must be finite and non-negative",
                    subject.id(),
                    subject.tumor_size()
                )));
            }
        }

        Ok(Roster { subjects })
    }

    /// Number of subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Subjects in input order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subject> {
        self.subjects.iter()
    }

    /// Tumor sizes in input order.
    pub fn tumor_sizes(&self) -> Vec<f64> {
        self.subjects.iter().map(Subject::tumor_size).collect()
    }

    /// Mean tumor size across the whole roster.
    pub fn overall_mean(&self) -> f64 {
        let total: f64 = self.subjects.iter().map(Subject::tumor_size).sum();
        total / self.subjects.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_accepts_valid_subjects() {
        let roster = Roster::new(vec![
            Subject::new("a", 1.0),
            Subject::new("b", 0.0),
            Subject::new("c", 2.5),
        ])
        .unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.tumor_sizes(), vec![1.0, 0.0, 2.5]);
    }

    #[test]
    fn test_roster_rejects_duplicate_ids() {
        let err = Roster::new(vec![Subject::new("a", 1.0), Subject::new("a", 2.0)]).unwrap_err();
        assert!(matches!(err, CohortError::DuplicateIdentifier(id) if id == "a"));
    }

    #[test]
    fn test_roster_rejects_negative_sizes() {
        let err = Roster::new(vec![Subject::new("a", -0.1)]).unwrap_err();
        assert!(matches!(err, CohortError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_roster_rejects_non_finite_sizes() {
        let err = Roster::new(vec![Subject::new("a", f64::NAN)]).unwrap_err();
        assert!(matches!(err, CohortError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_roster_rejects_empty_input() {
        let err = Roster::new(Vec::new()).unwrap_err();
        assert!(matches!(err, CohortError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_overall_mean() {
        let roster = Roster::new(vec![Subject::new("a", 2.0), Subject::new("b", 4.0)]).unwrap();
        assert!((roster.overall_mean() - 3.0).abs() < 1e-12);
    }
}
