//! Roster loading from spreadsheet and CSV files.
//!
//! The original data arrives as a worksheet with one row per mouse; a CSV
//! export of the same sheet is accepted too. Both readers resolve the
//! configured column headers, coerce cells, and hand back plain subjects;
//! roster-level invariants (unique ids, non-negative sizes) are enforced by
//! `Roster::new` afterwards.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use thiserror::Error;

use cohort_config::InputColumns;
use cohort_core::Subject;

/// Input-file errors.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input file not found: \"{}\"", .0.display())]
    FileNotFound(std::path::PathBuf),

    #[error("unsupported input extension \"{0}\" (expected .xlsx, .xlsm or .csv)")]
    UnsupportedExtension(String),

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("the workbook has no worksheets")]
    NoWorksheet,

    #[error("the input file has no header row")]
    NoHeader,

    #[error("column \"{0}\" not found in the input header row")]
    MissingColumn(String),

    #[error("row {row}: missing value in column \"{column}\"")]
    MissingValue { row: usize, column: String },

    #[error("row {row}: cannot read \"{value}\" as a tumor size")]
    InvalidNumber { row: usize, value: String },
}

/// Reads `(id, tumor size)` records from an input file, dispatching on the
/// file extension.
pub fn load_records(path: &Path, columns: &InputColumns) -> Result<Vec<Subject>, InputError> {
    if !path.is_file() {
        return Err(InputError::FileNotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" | "xlsm" => read_worksheet(path, columns),
        "csv" => read_csv(path, columns),
        other => Err(InputError::UnsupportedExtension(other.to_owned())),
    }
}

fn read_worksheet(path: &Path, columns: &InputColumns) -> Result<Vec<Subject>, InputError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(InputError::NoWorksheet)??;

    let mut rows = range.rows();
    let header = rows.next().ok_or(InputError::NoHeader)?;
    let id_idx = find_column(header, &columns.id_column)?;
    let size_idx = find_column(header, &columns.tumor_size_column)?;

    let mut subjects = Vec::new();
    for (offset, row) in rows.enumerate() {
        // Worksheets often carry formatted-but-empty trailing rows.
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let row_number = offset + 2;
        let id = cell_text(row.get(id_idx)).ok_or_else(|| InputError::MissingValue {
            row: row_number,
            column: columns.id_column.clone(),
        })?;
        let size_cell = row.get(size_idx);
        let size_text = cell_text(size_cell).ok_or_else(|| InputError::MissingValue {
            row: row_number,
            column: columns.tumor_size_column.clone(),
        })?;
        let size = cell_number(size_cell).ok_or(InputError::InvalidNumber {
            row: row_number,
            value: size_text,
        })?;
        subjects.push(Subject::new(id, size));
    }
    Ok(subjects)
}

fn read_csv(path: &Path, columns: &InputColumns) -> Result<Vec<Subject>, InputError> {
    let mut reader = csv::Reader::from_path(path)?;
    let header = reader.headers()?.clone();
    let id_idx = header
        .iter()
        .position(|field| field.trim() == columns.id_column)
        .ok_or_else(|| InputError::MissingColumn(columns.id_column.clone()))?;
    let size_idx = header
        .iter()
        .position(|field| field.trim() == columns.tumor_size_column)
        .ok_or_else(|| InputError::MissingColumn(columns.tumor_size_column.clone()))?;

    let mut subjects = Vec::new();
    for (offset, record) in reader.records().enumerate() {
        let record = record?;
        let row_number = offset + 2;
        let id = record
            .get(id_idx)
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .ok_or_else(|| InputError::MissingValue {
                row: row_number,
                column: columns.id_column.clone(),
            })?;
        let size_text = record
            .get(size_idx)
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .ok_or_else(|| InputError::MissingValue {
                row: row_number,
                column: columns.tumor_size_column.clone(),
            })?;
        let size: f64 = size_text.parse().map_err(|_| InputError::InvalidNumber {
            row: row_number,
            value: size_text.to_owned(),
        })?;
        subjects.push(Subject::new(id, size));
    }
    Ok(subjects)
}

// Resolves a header name to its column position.
fn find_column(header: &[Data], name: &str) -> Result<usize, InputError> {
    header
        .iter()
        .position(|cell| cell_text(Some(cell)).as_deref() == Some(name))
        .ok_or_else(|| InputError::MissingColumn(name.to_owned()))
}

// Renders a cell as trimmed text; numeric ids lose a trailing ".0".
fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::Empty => None,
        Data::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Data::Int(value) => Some(value.to_string()),
        Data::Float(value) => {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                Some(format!("{}", *value as i64))
            } else {
                Some(value.to_string())
            }
        }
        other => Some(other.to_string()),
    }
}

// Reads a cell as a number, accepting numeric strings.
fn cell_number(cell: Option<&Data>) -> Option<f64> {
    match cell? {
        Data::Int(value) => Some(*value as f64),
        Data::Float(value) => Some(*value),
        Data::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
