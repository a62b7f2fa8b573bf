//! Console rendering for the cohort CLI.
//!
//! Banner, configuration block, group-size list, and the bordered result
//! table shown after a solve.

use std::io::{self, Write};
use std::path::Path;

use owo_colors::OwoColorize;

use cohort_config::CohortConfig;
use cohort_core::GroupPlan;
use cohort_solver::GroupingOutcome;

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prints the startup banner.
pub fn print_banner() {
    let banner = r#"
   ____      _                _
  / ___|___ | |__   ___  _ __| |_
 | |   / _ \| '_ \ / _ \| '__| __|
 | |__| (_) | | | | (_) | |  | |_
  \____\___/|_| |_|\___/|_|   \__|
"#;
    let version_line = format!("        v{} - Balanced cohort assignment\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// Prints the effective configuration for this run.
pub fn print_configuration(input_file: &Path, output_dir: &Path, config: &CohortConfig) {
    println!("{}", "Configuration:".bold());
    println!("- Input file path:     {}", input_file.display());
    println!("- Output folder path:  {}", output_dir.display());
    println!("- Minimum group size:  {}", config.min_group_size);
    println!("- Maximum seconds:     {}", config.time_limit_seconds);
    println!("- Save model to file:  {}", config.save_model);
    println!();
}

/// Prints the planned group sizes, one group per line plus a total.
pub fn print_group_plan(plan: &GroupPlan) {
    println!("{}", "Group sizes:".bold());
    for (group, size) in plan.sizes().iter().enumerate() {
        println!("- Group {}: {} mice", group + 1, size);
    }
    println!("- ({} mice in total)", plan.subject_count());
    println!();
}

/// Prints the solve outcome: status, objective, and the per-group table.
pub fn print_outcome(outcome: &GroupingOutcome) {
    println!("Optimization done.");
    println!("Status: {}", outcome.status);
    println!(
        "Objective function value: {}",
        format!("{:.4}", outcome.objective_value).bold()
    );
    println!("The objective value is the spread between the largest and smallest group mean.");
    println!();

    let headers = [
        "group",
        "num_mice_in_group",
        "mouse_ids_in_group",
        "tumor_size_mean",
        "overall_mean_diff",
    ];
    let rows: Vec<Vec<String>> = outcome
        .statistics
        .groups()
        .iter()
        .map(|summary| {
            let ids = summary
                .member_ids
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                (summary.group + 1).to_string(),
                summary.member_count.to_string(),
                ids,
                format!("{:.2}", summary.mean_tumor_size),
                format!("{:+.4}", summary.overall_mean_deviation),
            ]
        })
        .collect();
    print!("{}", render_table(&headers, &rows));
    println!();
}

// Renders a psql-style bordered table.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    let outer_border = border_line(&widths, '+', '+');
    let header_border = border_line(&widths, '|', '|');

    let mut out = String::new();
    out.push_str(&outer_border);
    out.push_str(&format_row(headers.iter().map(|h| h.to_string()), &widths));
    out.push_str(&header_border);
    for row in rows {
        out.push_str(&format_row(row.iter().cloned(), &widths));
    }
    out.push_str(&outer_border);
    out
}

fn border_line(widths: &[usize], left: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (col, width) in widths.iter().enumerate() {
        if col > 0 {
            line.push('+');
        }
        line.push_str(&"-".repeat(width + 2));
    }
    line.push(right);
    line.push('\n');
    line
}

fn format_row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    let mut line = String::new();
    line.push('|');
    for (cell, width) in cells.zip(widths) {
        line.push(' ');
        line.push_str(&cell);
        line.push_str(&" ".repeat(width - cell.chars().count() + 1));
        line.push('|');
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rendering() {
        let table = render_table(
            &["group", "mice"],
            &[
                vec!["1".to_owned(), "6".to_owned()],
                vec!["2".to_owned(), "5".to_owned()],
            ],
        );
        let expected = "\
+-------+------+
| group | mice |
|-------+------|
| 1     | 6    |
| 2     | 5    |
+-------+------+
";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_table_widths_follow_cells() {
        let table = render_table(&["id"], &[vec!["a-very-long-cell".to_owned()]]);
        assert!(table.contains("| a-very-long-cell |"));
    }
}
