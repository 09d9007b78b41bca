use log::trace;

use crate::error::{Result, TableauError};
use crate::select::{Criterion, Entry, Exit};
use crate::table::{PivotState, TableState};

/// Outcome of one full simplex iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The objective row admits no entering column
    Optimal,
    /// `column` entered the basis at `exit.row`, displacing `exit.leaving`
    Pivoted { column: usize, exit: Exit },
}

impl TableState {
    /// Scale the pivot row so the pivot element becomes 1.
    pub fn normalize(&mut self) -> Result<()> {
        let (row, column) = self.pivot.cell().ok_or(TableauError::PivotNotSet)?;
        let pivot = self.matrix[row][column];
        if pivot == 0.0 {
            return Err(TableauError::ZeroPivot {
                row,
                column: self.columns[column].clone(),
            });
        }

        let scaled: Vec<f64> = self.matrix[row].iter().map(|v| v / pivot).collect();
        self.matrix[row] = scaled;
        trace!("normalized row {} by {}", row, pivot);
        if !matches!(self.pivot, PivotState::Eliminated { .. }) {
            self.pivot = PivotState::Normalized { row, column };
        }
        Ok(())
    }

    /// Clear the pivot column in every row but the pivot row.
    ///
    /// The pivot row has to be normalized first. The selection stays in place
    /// afterwards; the next [`select_entry`](TableState::select_entry) replaces it.
    pub fn eliminate(&mut self) -> Result<()> {
        let (row, column) = match self.pivot {
            PivotState::Normalized { row, column } | PivotState::Eliminated { row, column } => (row, column),
            PivotState::Selected { row, .. } => return Err(TableauError::NotNormalized { row }),
            _ => return Err(TableauError::PivotNotSet),
        };

        let source = self.matrix[row].clone();
        for (i, target) in self.matrix.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = target[column];
            if factor == 0.0 {
                continue;
            }
            let updated: Vec<f64> = target.iter().zip(&source).map(|(t, s)| t - factor * s).collect();
            *target = updated;
        }
        trace!("eliminated column {} around row {}", column, row);
        self.pivot = PivotState::Eliminated { row, column };
        Ok(())
    }

    /// Run entry selection, ratio test, normalization and elimination once.
    pub fn step(&mut self, criterion: Criterion) -> Result<Step> {
        let column = match self.select_entry(criterion)? {
            Entry::Optimal => return Ok(Step::Optimal),
            Entry::Column(column) => column,
        };
        let exit = self.select_exit()?;
        self.normalize()?;
        self.eliminate()?;
        Ok(Step::Pivoted { column, exit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    /// maximize Z = 3x + 5y s.t. x <= 4, 2y <= 12, 3x + 2y <= 18
    fn wyndor() -> TableState {
        TableState::new(
            ["Z", "x", "y", "s1", "s2", "s3"],
            ["Z", "s1", "s2", "s3"],
            vec![
                vec![1, -3, -5, 0, 0, 0, 0],
                vec![0, 1, 0, 1, 0, 0, 4],
                vec![0, 0, 2, 0, 1, 0, 12],
                vec![0, 3, 2, 0, 0, 1, 18],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_sets_pivot_to_one() {
        let mut t = wyndor();
        t.select_entry(Criterion::MostNegative).unwrap();
        t.select_exit().unwrap();
        t.normalize().unwrap();
        assert!((t.matrix()[2][2] - 1.0).abs() < TOL);
        assert!((t.rhs(2) - 6.0).abs() < TOL);
        assert_eq!(t.pivot(), PivotState::Normalized { row: 2, column: 2 });
    }

    #[test]
    fn test_normalize_requires_full_pivot() {
        let mut t = wyndor();
        assert_eq!(t.normalize().unwrap_err(), TableauError::PivotNotSet);
        t.select_entry(Criterion::MostNegative).unwrap();
        assert_eq!(t.normalize().unwrap_err(), TableauError::PivotNotSet);
    }

    #[test]
    fn test_zero_pivot_is_rejected() {
        let mut t = wyndor();
        t.pivot = PivotState::Selected { row: 1, column: 2 };
        let before = t.clone();
        assert_eq!(
            t.normalize().unwrap_err(),
            TableauError::ZeroPivot { row: 1, column: "y".to_string() }
        );
        assert_eq!(t, before);
    }

    #[test]
    fn test_eliminate_before_normalize_is_rejected() {
        let mut t = wyndor();
        t.select_entry(Criterion::MostNegative).unwrap();
        t.select_exit().unwrap();
        let before = t.clone();
        assert_eq!(t.eliminate().unwrap_err(), TableauError::NotNormalized { row: 2 });
        assert_eq!(t, before);
    }

    #[test]
    fn test_eliminate_clears_pivot_column() {
        let mut t = wyndor();
        t.select_entry(Criterion::MostNegative).unwrap();
        t.select_exit().unwrap();
        t.normalize().unwrap();
        t.eliminate().unwrap();
        for (r, row) in t.matrix().iter().enumerate() {
            if r != 2 {
                assert!(row[2].abs() < TOL, "row {} column y = {}", r, row[2]);
            }
        }
        assert_eq!(t.pivot(), PivotState::Eliminated { row: 2, column: 2 });
        assert!((t.objective_value() - 30.0).abs() < TOL);
    }

    #[test]
    fn test_wyndor_reaches_optimum_in_two_pivots() {
        let mut t = wyndor();

        let first = t.step(Criterion::MostNegative).unwrap();
        assert_eq!(
            first,
            Step::Pivoted { column: 2, exit: Exit { row: 2, leaving: "s2".to_string() } }
        );

        let second = t.step(Criterion::MostNegative).unwrap();
        assert_eq!(
            second,
            Step::Pivoted { column: 1, exit: Exit { row: 3, leaving: "s3".to_string() } }
        );

        assert_eq!(t.step(Criterion::MostNegative).unwrap(), Step::Optimal);
        assert_eq!(t.pivot_row(), None);
        assert_eq!(t.pivot_column(), None);
        assert!((t.objective_value() - 36.0).abs() < TOL, "Z = {}", t.objective_value());
        assert!((t.value_of("x") - 2.0).abs() < TOL, "x = {}", t.value_of("x"));
        assert!((t.value_of("y") - 6.0).abs() < TOL, "y = {}", t.value_of("y"));
        assert_eq!(t.variables(), ["Z", "s1", "y", "x"]);
    }

    #[test]
    fn test_unbounded_step() {
        let mut t = TableState::new(
            ["Z", "x", "s1"],
            ["Z", "s1"],
            vec![vec![1, -1, 0, 0], vec![0, -1, 1, 3]],
        )
        .unwrap();
        assert_eq!(
            t.step(Criterion::MostNegative).unwrap_err(),
            TableauError::Unbounded { column: "x".to_string() }
        );
        assert_eq!(t.pivot(), PivotState::ColumnChosen { column: 1 });
    }
}
