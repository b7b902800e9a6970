//! Console table of submitted rules

use std::fmt::Write;

use crate::core::RuleOutcome;

const COLUMN_GAP: usize = 2;
const HEADERS: [&str; 5] = ["Rule Name", "Resource", "Event Type", "Email", "Response"];

/// Renders one row per (rule, email) pair under a dashed header.
///
/// Columns are as wide as their longest cell plus a two-space gap; the last
/// column is not padded.
pub fn render_table(resource_name: &str, outcomes: &[RuleOutcome]) -> String {
    let rows: Vec<[String; 5]> = outcomes
        .iter()
        .flat_map(|outcome| {
            outcome.emails.iter().map(move |email| {
                [
                    outcome.rule_name.clone(),
                    resource_name.to_string(),
                    outcome.event.to_string(),
                    email.clone(),
                    outcome.status.to_string(),
                ]
            })
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS, &widths);
    let underline = widths.map(|w| "-".repeat(w));
    push_row(&mut out, &underline, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S; 5], widths: &[usize; 5]) {
    let last = cells.len() - 1;
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            let _ = writeln!(out, "{}", cell.as_ref());
        } else {
            let _ = write!(out, "{:<pad$}", cell.as_ref(), pad = width + COLUMN_GAP);
        }
    }
}
