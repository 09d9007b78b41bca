use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::{Result, TableauError};
use crate::table::{PivotState, TableState};

/// Rule used to pick the entering column from the objective row.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion {
    /// Most negative reduced cost enters (maximization optimality test)
    #[default]
    MostNegative,
    /// Most positive reduced cost enters (minimization-oriented rows)
    MostPositive,
}

impl FromStr for Criterion {
    type Err = TableauError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "most-negative" | "negative" | "min" => Ok(Criterion::MostNegative),
            "most-positive" | "positive" | "max" => Ok(Criterion::MostPositive),
            _ => Err(TableauError::InvalidCriterion(s.to_string())),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::MostNegative => write!(f, "most-negative"),
            Criterion::MostPositive => write!(f, "most-positive"),
        }
    }
}

/// Result of an entering-variable scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// No column improves the objective; the pivot has been cleared
    Optimal,
    /// `column` enters the basis
    Column(usize),
}

/// Result of a ratio test: the pivot row and the variable it displaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub row: usize,
    pub leaving: String,
}

impl TableState {
    /// Pick the entering column by scanning the objective row, excluding the
    /// self label and RHS positions. The first extremal entry wins ties.
    pub fn select_entry(&mut self, criterion: Criterion) -> Result<Entry> {
        self.pivot.ensure_idle()?;

        let end = self.rhs_index();
        let costs = &self.matrix[0][1..end];
        let mut best: Option<(usize, f64)> = None;
        for (j, &value) in costs.iter().enumerate() {
            let better = match (criterion, best) {
                (_, None) => true,
                (Criterion::MostNegative, Some((_, b))) => value < b,
                (Criterion::MostPositive, Some((_, b))) => value > b,
            };
            if better {
                best = Some((j, value));
            }
        }

        let improving = best.filter(|&(_, value)| match criterion {
            Criterion::MostNegative => value < 0.0,
            Criterion::MostPositive => value > 0.0,
        });

        match improving {
            None => {
                debug!("{}: optimal under {} rule", self.objective_label(), criterion);
                self.pivot = PivotState::Optimal;
                Ok(Entry::Optimal)
            }
            Some((j, value)) => {
                let column = j + 1;
                debug!("entering '{}' (column {}, cost {})", self.columns[column], column, value);
                self.pivot = PivotState::ColumnChosen { column };
                Ok(Entry::Column(column))
            }
        }
    }

    /// Ratio test over the chosen column. The lowest row index wins among
    /// equal minimal ratios.
    pub fn select_exit(&mut self) -> Result<Exit> {
        self.pivot.ensure_idle()?;
        let column = match self.pivot {
            PivotState::ColumnChosen { column } => column,
            _ => return Err(TableauError::PivotColumnNotSet),
        };

        let rhs = self.rhs_index();
        let mut best: Option<(usize, f64)> = None;
        for (i, row) in self.matrix.iter().enumerate().skip(1) {
            let entry = row[column];
            if entry <= 0.0 {
                continue;
            }
            let ratio = row[rhs] / entry;
            if best.is_none_or(|(_, min)| ratio < min) {
                best = Some((i, ratio));
            }
        }

        let Some((row, ratio)) = best else {
            return Err(TableauError::Unbounded {
                column: self.columns[column].clone(),
            });
        };
        debug!("ratio test picked row {} (ratio {})", row, ratio);
        self.enter_basis(row, column)
    }

    /// Choose the pivot element directly, bypassing both selectors.
    ///
    /// Drivers use this to move a zero-level artificial variable out of the
    /// basis after phase one.
    pub fn select_pivot(&mut self, row: usize, column: usize) -> Result<Exit> {
        self.pivot.ensure_idle()?;
        if row == 0 || row >= self.num_rows() || column == 0 || column >= self.rhs_index() {
            return Err(TableauError::PivotOutOfRange { row, column });
        }
        if self.matrix[row][column] == 0.0 {
            return Err(TableauError::ZeroPivot {
                row,
                column: self.columns[column].clone(),
            });
        }
        self.enter_basis(row, column)
    }

    fn enter_basis(&mut self, row: usize, column: usize) -> Result<Exit> {
        let entering = &self.columns[column];
        if let Some(other) = self.basic_row(entering).filter(|&r| r != row) {
            debug!("'{}' is already basic in row {}", entering, other);
            return Err(TableauError::DuplicateLabel(entering.clone()));
        }

        let leaving = std::mem::replace(&mut self.variables[row], entering.clone());
        debug!("'{}' enters, '{}' leaves at row {}", self.variables[row], leaving, row);
        self.pivot = PivotState::Selected { row, column };
        Ok(Exit { row, leaving })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(objective: Vec<f64>, rows: Vec<Vec<f64>>) -> TableState {
        let n = objective.len() - 2;
        let mut columns = vec!["Z".to_string()];
        columns.extend((1..=n).map(|j| format!("x{}", j)));
        let mut variables = vec!["Z".to_string()];
        variables.extend((1..=rows.len()).map(|i| format!("s{}", i)));
        let mut matrix = vec![objective];
        matrix.extend(rows);
        TableState::new(columns, variables, matrix).unwrap()
    }

    #[test]
    fn test_criterion_from_str() {
        assert_eq!("most-negative".parse::<Criterion>().unwrap(), Criterion::MostNegative);
        assert_eq!("MOST_POSITIVE".parse::<Criterion>().unwrap(), Criterion::MostPositive);
        assert_eq!(
            "steepest".parse::<Criterion>().unwrap_err(),
            TableauError::InvalidCriterion("steepest".to_string())
        );
    }

    #[test]
    fn test_most_negative_picks_first_minimum() {
        let mut t = table(vec![1.0, -2.0, -5.0, -5.0, 0.0], vec![vec![0.0, 1.0, 1.0, 1.0, 4.0]]);
        assert_eq!(t.select_entry(Criterion::MostNegative).unwrap(), Entry::Column(2));
        assert_eq!(t.pivot(), PivotState::ColumnChosen { column: 2 });
        assert_eq!(t.pivot_row(), None);
    }

    #[test]
    fn test_most_positive_picks_maximum() {
        let mut t = table(vec![1.0, 3.0, -5.0, 7.0, 0.0], vec![vec![0.0, 1.0, 1.0, 1.0, 4.0]]);
        assert_eq!(t.select_entry(Criterion::MostPositive).unwrap(), Entry::Column(3));
    }

    #[test]
    fn test_optimal_when_no_negative_cost() {
        let mut t = table(vec![1.0, 0.0, 2.0, 0.0, 9.0], vec![vec![0.0, 1.0, 1.0, 1.0, 4.0]]);
        t.pivot = PivotState::Eliminated { row: 1, column: 2 };
        assert_eq!(t.select_entry(Criterion::MostNegative).unwrap(), Entry::Optimal);
        assert_eq!(t.pivot(), PivotState::Optimal);
        assert_eq!(t.pivot_row(), None);
        assert_eq!(t.pivot_column(), None);
    }

    #[test]
    fn test_optimal_when_no_positive_cost() {
        let mut t = table(vec![1.0, -1.0, 0.0, 0.0], vec![vec![0.0, 1.0, 1.0, 4.0]]);
        assert_eq!(t.select_entry(Criterion::MostPositive).unwrap(), Entry::Optimal);
    }

    #[test]
    fn test_self_label_and_rhs_are_ignored() {
        // Self column and RHS hold the extreme values but must not be picked.
        let mut t = table(vec![-9.0, -1.0, 0.0, -9.0], vec![vec![0.0, 1.0, 1.0, 4.0]]);
        assert_eq!(t.select_entry(Criterion::MostNegative).unwrap(), Entry::Column(1));
    }

    #[test]
    fn test_exit_requires_column() {
        let mut t = table(vec![1.0, -1.0, 0.0, 0.0], vec![vec![0.0, 1.0, 1.0, 4.0]]);
        assert_eq!(t.select_exit().unwrap_err(), TableauError::PivotColumnNotSet);

        t.select_entry(Criterion::MostPositive).unwrap();
        assert_eq!(t.select_exit().unwrap_err(), TableauError::PivotColumnNotSet);
    }

    #[test]
    fn test_ratio_test_minimum() {
        let mut t = table(
            vec![1.0, -3.0, -5.0, 0.0],
            vec![vec![0.0, 1.0, 0.0, 4.0], vec![0.0, 0.0, 2.0, 12.0], vec![0.0, 3.0, 2.0, 18.0]],
        );
        t.select_entry(Criterion::MostNegative).unwrap();
        let exit = t.select_exit().unwrap();
        assert_eq!(exit, Exit { row: 2, leaving: "s2".to_string() });
        assert_eq!(t.variables()[2], "x2");
        assert_eq!(t.pivot(), PivotState::Selected { row: 2, column: 2 });
    }

    #[test]
    fn test_ratio_tie_picks_lowest_row() {
        // Rows 1 and 3 both give ratio 2; row 2 is excluded by its negative entry.
        let mut t = table(
            vec![1.0, -1.0, 0.0],
            vec![vec![0.0, 2.0, 4.0], vec![0.0, -1.0, 1.0], vec![0.0, 3.0, 6.0]],
        );
        t.select_entry(Criterion::MostNegative).unwrap();
        let exit = t.select_exit().unwrap();
        assert_eq!(exit.row, 1);
        assert_eq!(exit.leaving, "s1");
    }

    #[test]
    fn test_unbounded_leaves_table_untouched() {
        let mut t = table(
            vec![1.0, -1.0, 0.0],
            vec![vec![0.0, 0.0, 4.0], vec![0.0, -2.0, 1.0]],
        );
        t.select_entry(Criterion::MostNegative).unwrap();
        let before = t.clone();
        assert_eq!(
            t.select_exit().unwrap_err(),
            TableauError::Unbounded { column: "x1".to_string() }
        );
        assert_eq!(t, before);
    }

    #[test]
    fn test_entry_rejected_mid_pivot() {
        let mut t = table(vec![1.0, -1.0, 0.0], vec![vec![0.0, 2.0, 4.0]]);
        t.select_entry(Criterion::MostNegative).unwrap();
        t.select_exit().unwrap();
        assert_eq!(
            t.select_entry(Criterion::MostNegative).unwrap_err(),
            TableauError::PivotInProgress { row: 1, column: 1 }
        );
    }

    #[test]
    fn test_select_pivot_checks_range_and_zero() {
        let mut t = table(vec![1.0, -1.0, -1.0, 0.0], vec![vec![0.0, 0.0, 2.0, 4.0]]);
        assert_eq!(
            t.select_pivot(0, 1).unwrap_err(),
            TableauError::PivotOutOfRange { row: 0, column: 1 }
        );
        assert_eq!(
            t.select_pivot(1, 3).unwrap_err(),
            TableauError::PivotOutOfRange { row: 1, column: 3 }
        );
        assert!(matches!(t.select_pivot(1, 1).unwrap_err(), TableauError::ZeroPivot { .. }));

        let exit = t.select_pivot(1, 2).unwrap();
        assert_eq!(exit.leaving, "s1");
        assert_eq!(t.pivot(), PivotState::Selected { row: 1, column: 2 });
    }
}
