use std::fmt::Write;

use pivotab_core::TableState;

use crate::format::NumberFormat;

/// How a cell relates to the current pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    Plain,
    /// In the pivot row or pivot column
    Line,
    /// The pivot element itself
    Pivot,
}

/// Mark for matrix entry (`row`, `column`); the RHS counts as part of its row.
pub(crate) fn mark(table: &TableState, row: usize, column: usize) -> Mark {
    let in_row = table.pivot_row() == Some(row);
    let in_column = table.pivot_column() == Some(column);
    match (in_row, in_column) {
        (true, true) => Mark::Pivot,
        (false, false) => Mark::Plain,
        _ => Mark::Line,
    }
}

/// Render the tableau as an aligned text table.
///
/// Cells on the pivot row or column are shown as `[v]`, the pivot element
/// as `<v>`. The basic-variable label column is never marked.
pub fn render(table: &TableState, format: NumberFormat) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(table.num_rows() + 1);

    let mut header = vec!["Basic".to_string()];
    header.extend(table.columns().iter().cloned());
    header.push("RHS".to_string());
    grid.push(header);

    for (i, (label, values)) in table.variables().iter().zip(table.matrix()).enumerate() {
        let mut line = vec![label.clone()];
        for (j, &value) in values.iter().enumerate() {
            let text = format.format(value);
            line.push(match mark(table, i, j) {
                Mark::Plain => text,
                Mark::Line => format!("[{}]", text),
                Mark::Pivot => format!("<{}>", text),
            });
        }
        grid.push(line);
    }

    let widths: Vec<usize> = (0..grid[0].len())
        .map(|j| grid.iter().map(|line| line[j].chars().count()).max().unwrap_or(0))
        .collect();
    let rule: String = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut out = String::new();
    for (i, line) in grid.iter().enumerate() {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(j, (cell, w))| {
                if j == 0 {
                    format!("{:<w$}", cell, w = *w)
                } else {
                    format!("{:>w$}", cell, w = *w)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | ").trim_end());
        // Rule under the header and under the objective row
        if i <= 1 {
            let _ = writeln!(out, "{}", rule);
        }
    }
    out
}
