//! Cohort CLI - load a roster, balance it, report the groups
//!
//! The binary lives in `main.rs`; this library carries the pieces it is
//! assembled from:
//! - [`input`]: roster loading from XLSX and CSV files
//! - [`report`]: the two-sheet results workbook
//! - [`console`]: banner, configuration block, and result tables

use std::path::PathBuf;

use thiserror::Error;

pub mod console;
pub mod input;
pub mod report;

/// Everything that can go wrong in one CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Grouping(#[from] cohort_core::CohortError),

    #[error(transparent)]
    Config(#[from] cohort_config::ConfigError),

    #[error(transparent)]
    Input(#[from] input::InputError),

    #[error(transparent)]
    Report(#[from] report::ReportError),

    #[error("output directory not found: \"{}\"", .0.display())]
    OutputDirMissing(PathBuf),
}
