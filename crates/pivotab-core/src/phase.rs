//! Tableau edits used at phase boundaries of the two-phase and Big-M methods.

use std::collections::HashSet;

use log::debug;

use crate::error::{Result, TableauError};
use crate::table::{PivotState, TableState};

impl TableState {
    /// Remove `variable`'s coefficient from the objective row using the
    /// constraint row in which it is basic.
    pub fn adjust_objective(&mut self, variable: &str) -> Result<()> {
        self.pivot.ensure_idle()?;
        let column = self
            .column_index(variable)
            .ok_or_else(|| TableauError::UnknownVariable(variable.to_string()))?;
        let row = self
            .basic_row(variable)
            .ok_or_else(|| TableauError::VariableNotBasic(variable.to_string()))?;
        let coef = self.matrix[row][column];
        if coef == 0.0 {
            return Err(TableauError::ZeroCoefficient {
                variable: variable.to_string(),
                row,
            });
        }

        let cost = self.matrix[0][column];
        let adjusted: Vec<f64> = self.matrix[0]
            .iter()
            .zip(&self.matrix[row])
            .map(|(o, b)| o - b * cost / coef)
            .collect();
        self.matrix[0] = adjusted;
        debug!("removed cost {} of '{}' from objective using row {}", cost, variable, row);
        self.pivot = PivotState::Unset;
        Ok(())
    }

    /// Copy of this table without the named columns.
    ///
    /// Rows whose basic variable is removed go with it, so every remaining
    /// row keeps a label. The copy has no pivot selected.
    pub fn prune_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<TableState> {
        let mut removed = HashSet::new();
        for name in names {
            let name = name.as_ref();
            match self.column_index(name) {
                None => return Err(TableauError::UnknownVariable(name.to_string())),
                Some(0) => return Err(TableauError::ObjectiveColumn(name.to_string())),
                Some(j) => {
                    removed.insert(j);
                }
            }
        }

        let keep_columns: Vec<usize> = (0..self.columns.len()).filter(|j| !removed.contains(j)).collect();
        let rhs = self.rhs_index();
        let dropped: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();

        let mut variables = Vec::with_capacity(self.variables.len());
        let mut matrix = Vec::with_capacity(self.matrix.len());
        for (label, row) in self.variables.iter().zip(&self.matrix) {
            if dropped.contains(label.as_str()) {
                debug!("pruning row of basic variable '{}' (rhs {})", label, row[rhs]);
                continue;
            }
            variables.push(label.clone());
            let mut values: Vec<f64> = keep_columns.iter().map(|&j| row[j]).collect();
            values.push(row[rhs]);
            matrix.push(values);
        }
        let columns: Vec<String> = keep_columns.iter().map(|&j| self.columns[j].clone()).collect();

        debug!("pruned {} column(s), {} row(s) remain", removed.len(), matrix.len());
        TableState::validate(&columns, &variables, &matrix)?;
        Ok(TableState {
            columns,
            variables,
            matrix,
            pivot: PivotState::Unset,
        })
    }

    /// Swap in a new objective row, e.g. when moving from the phase-one
    /// feasibility objective to the real cost row.
    ///
    /// `row` covers every position, self label and RHS included.
    pub fn replace_objective(&mut self, label: impl Into<String>, row: Vec<f64>) -> Result<()> {
        self.pivot.ensure_idle()?;
        let expected = self.columns.len() + 1;
        if row.len() != expected {
            return Err(TableauError::InvalidReplacementShape {
                expected,
                found: row.len(),
            });
        }
        let label = label.into();
        let clash = self.columns[1..].contains(&label) || self.variables[1..].contains(&label);
        if clash {
            return Err(TableauError::DuplicateLabel(label));
        }

        debug!("objective '{}' replaced by '{}'", self.columns[0], label);
        self.matrix[0] = row;
        self.columns[0] = label.clone();
        self.variables[0] = label;
        self.pivot = PivotState::Unset;
        Ok(())
    }
}
