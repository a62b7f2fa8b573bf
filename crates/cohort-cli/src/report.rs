//! The two-sheet results workbook.
//!
//! Sheet `mouse_grouping` lists every subject with its group; sheet
//! `group_statistics` summarizes each group. Header rows are bold on a
//! light blue fill, numeric columns carry fixed formats, and column widths
//! follow their content.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use thiserror::Error;

use cohort_core::{Roster, SubjectId};
use cohort_solver::GroupingOutcome;

/// Workbook-writing errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] XlsxError),
}

/// Extra characters added to every computed column width.
const COLUMN_PADDING: f64 = 2.0;

/// Cell formats shared by both sheets.
struct Formats {
    header: Format,
    integer: Format,
    text: Format,
    float2: Format,
    float4: Format,
}

impl Formats {
    fn new() -> Self {
        Formats {
            header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xDDEEFF))
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            integer: Format::new().set_num_format("#0").set_align(FormatAlign::Center),
            text: Format::new().set_align(FormatAlign::Center),
            float2: Format::new()
                .set_num_format("#,##0.00")
                .set_align(FormatAlign::Center),
            float4: Format::new()
                .set_num_format("#,##0.0000")
                .set_align(FormatAlign::Center),
        }
    }
}

/// Writes the results workbook.
pub fn write_workbook(
    path: &Path,
    roster: &Roster,
    outcome: &GroupingOutcome,
) -> Result<(), ReportError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    let grouping_sheet = workbook.add_worksheet();
    write_grouping_sheet(grouping_sheet, roster, outcome, &formats)?;

    let statistics_sheet = workbook.add_worksheet();
    write_statistics_sheet(statistics_sheet, outcome, &formats)?;

    workbook.save(path)?;
    Ok(())
}

fn write_grouping_sheet(
    sheet: &mut Worksheet,
    roster: &Roster,
    outcome: &GroupingOutcome,
    formats: &Formats,
) -> Result<(), ReportError> {
    sheet.set_name("mouse_grouping")?;

    let headers = ["group", "mouse_id", "tumor_size"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
    }

    let mut rows: Vec<(usize, &SubjectId, f64)> = roster
        .iter()
        .map(|subject| {
            let group = outcome
                .assignment
                .group_of(subject.id())
                .expect("assignment covers every roster subject");
            (group, subject.id(), subject.tumor_size())
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    for (offset, (group, id, tumor_size)) in rows.iter().enumerate() {
        let row = offset as u32 + 1;
        sheet.write_number_with_format(row, 0, (group + 1) as f64, &formats.integer)?;
        sheet.write_string_with_format(row, 1, id.as_str(), &formats.text)?;
        sheet.write_number_with_format(row, 2, *tumor_size, &formats.float2)?;
    }

    set_width(sheet, 0, headers[0], rows.iter().map(|(g, _, _)| (g + 1).to_string()))?;
    set_width(sheet, 1, headers[1], rows.iter().map(|(_, id, _)| id.to_string()))?;
    set_width(sheet, 2, headers[2], rows.iter().map(|(_, _, t)| format!("{t:.2}")))?;
    Ok(())
}

fn write_statistics_sheet(
    sheet: &mut Worksheet,
    outcome: &GroupingOutcome,
    formats: &Formats,
) -> Result<(), ReportError> {
    sheet.set_name("group_statistics")?;

    let headers = [
        "group",
        "num_mice_in_group",
        "mouse_ids_in_group",
        "tumor_size_mean",
        "overall_mean_diff",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
    }

    let summaries = outcome.statistics.groups();
    for (offset, summary) in summaries.iter().enumerate() {
        let row = offset as u32 + 1;
        let member_ids = joined_ids(&summary.member_ids);
        sheet.write_number_with_format(row, 0, (summary.group + 1) as f64, &formats.integer)?;
        sheet.write_number_with_format(row, 1, summary.member_count as f64, &formats.integer)?;
        sheet.write_string_with_format(row, 2, member_ids, &formats.text)?;
        sheet.write_number_with_format(row, 3, summary.mean_tumor_size, &formats.float2)?;
        sheet.write_number_with_format(
            row,
            4,
            summary.overall_mean_deviation,
            &formats.float4,
        )?;
    }

    set_width(sheet, 0, headers[0], summaries.iter().map(|s| (s.group + 1).to_string()))?;
    set_width(sheet, 1, headers[1], summaries.iter().map(|s| s.member_count.to_string()))?;
    set_width(sheet, 2, headers[2], summaries.iter().map(|s| joined_ids(&s.member_ids)))?;
    set_width(sheet, 3, headers[3], summaries.iter().map(|s| format!("{:.2}", s.mean_tumor_size)))?;
    set_width(sheet, 4, headers[4], summaries.iter().map(|s| format!("{:.4}", s.overall_mean_deviation)))?;
    Ok(())
}

fn joined_ids(ids: &[SubjectId]) -> String {
    ids.iter()
        .map(SubjectId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// Widens a column to its longest rendered value.
fn set_width(
    sheet: &mut Worksheet,
    col: u16,
    header: &str,
    values: impl Iterator<Item = String>,
) -> Result<(), ReportError> {
    let longest = values
        .map(|value| value.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.chars().count());
    sheet.set_column_width(col, longest as f64 + COLUMN_PADDING)?;
    Ok(())
}
