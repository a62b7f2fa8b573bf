//! Error types for cohort grouping.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for cohort grouping operations.
#[derive(Debug, Error)]
pub enum CohortError {
    /// Counts or sizes that cannot produce a valid grouping.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Two subjects share an identifier.
    #[error("duplicate subject id \"{0}\"")]
    DuplicateIdentifier(String),

    /// The solver failed on a model that must admit an assignment.
    ///
    /// A group plan whose sizes sum to the subject count is always
    /// satisfiable, so this points at a bug in model construction or in
    /// the backend, not at the input data.
    #[error(
        "solver failure on a satisfiable model \
         ({subject_count} subjects, group sizes {group_sizes:?}): {detail}"
    )]
    Solver {
        detail: String,
        subject_count: usize,
        group_sizes: Vec<usize>,
    },

    /// The time budget elapsed before any feasible assignment was found.
    ///
    /// Unlike [`CohortError::Solver`] this is a resource problem; rerunning
    /// with a larger time budget may succeed.
    #[error("no feasible assignment found within {limit_seconds} s")]
    TimeoutNoSolution { limit_seconds: f64 },

    /// Writing the optimization-model dump failed.
    #[error("failed to write model file \"{}\": {source}", .path.display())]
    ModelWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for cohort grouping operations.
pub type Result<T> = std::result::Result<T, CohortError>;
