use std::fmt::Write;

use pivotab_core::TableState;

use crate::console::{mark, Mark};
use crate::format::NumberFormat;

/// `s12` -> `s_{12}`; labels without a numeric suffix pass through.
fn label(name: &str) -> String {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.is_empty() || stem.len() == name.len() {
        return name.replace('_', "\\_");
    }
    format!("{}_{{{}}}", stem.replace('_', "\\_"), &name[stem.len()..])
}

/// Render the tableau as a LaTeX `array`, ready for a math environment.
///
/// The pivot element is `\boxed{}`, the rest of its row and column bold.
pub fn render(table: &TableState, format: NumberFormat) -> String {
    let mut out = String::new();
    let spec = format!("c|{}|c", "c".repeat(table.num_columns()));
    let _ = writeln!(out, "\\begin{{array}}{{{}}}", spec);

    let header: Vec<String> = table.columns().iter().map(|c| label(c)).collect();
    let _ = writeln!(out, " & {} & \\text{{RHS}} \\\\", header.join(" & "));
    let _ = writeln!(out, "\\hline");

    for (i, (name, values)) in table.variables().iter().zip(table.matrix()).enumerate() {
        let cells: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(j, &value)| {
                let text = format.format_latex(value);
                match mark(table, i, j) {
                    Mark::Plain => text,
                    Mark::Line => format!("\\mathbf{{{}}}", text),
                    Mark::Pivot => format!("\\boxed{{{}}}", text),
                }
            })
            .collect();
        let _ = writeln!(out, "{} & {} \\\\", label(name), cells.join(" & "));
        if i == 0 {
            let _ = writeln!(out, "\\hline");
        }
    }
    let _ = write!(out, "\\end{{array}}");
    out
}
