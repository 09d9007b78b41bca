use std::collections::HashSet;

use crate::error::{Result, TableauError};

/// Where the current pivot stands.
///
/// Row and column indices always address the full matrix, so a selected
/// column is never 0 (the objective self label) and a selected row is never 0
/// (the objective row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotState {
    /// No pivot chosen
    #[default]
    Unset,
    /// Entering column chosen, leaving row not yet known
    ColumnChosen { column: usize },
    /// Pivot element chosen, pivot row not yet scaled
    Selected { row: usize, column: usize },
    /// Pivot row scaled so the pivot element is 1
    Normalized { row: usize, column: usize },
    /// Pivot column cleared in every other row
    Eliminated { row: usize, column: usize },
    /// No entering column improves the objective
    Optimal,
}

impl PivotState {
    pub fn row(&self) -> Option<usize> {
        self.cell().map(|(row, _)| row)
    }

    pub fn column(&self) -> Option<usize> {
        match *self {
            PivotState::ColumnChosen { column } => Some(column),
            _ => self.cell().map(|(_, column)| column),
        }
    }

    /// The pivot element, when both row and column are known.
    pub fn cell(&self) -> Option<(usize, usize)> {
        match *self {
            PivotState::Selected { row, column }
            | PivotState::Normalized { row, column }
            | PivotState::Eliminated { row, column } => Some((row, column)),
            _ => None,
        }
    }

    /// True between exit selection and elimination, where the basis labels
    /// have already moved but the matrix has not caught up.
    pub fn in_progress(&self) -> bool {
        matches!(self, PivotState::Selected { .. } | PivotState::Normalized { .. })
    }

    pub(crate) fn ensure_idle(&self) -> Result<()> {
        match *self {
            PivotState::Selected { row, column } | PivotState::Normalized { row, column } => {
                Err(TableauError::PivotInProgress { row, column })
            }
            _ => Ok(()),
        }
    }
}

/// Raw labelled tableau, before its invariants are checked.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub columns: Vec<String>,
    pub variables: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

/// A simplex tableau in Gauss-Jordan form.
///
/// Row 0 is the objective row and `columns[0] == variables[0]` is its self
/// label. Every row carries one trailing, unnamed right-hand-side entry.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TableSpec", into = "TableSpec"))]
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub(crate) columns: Vec<String>,
    pub(crate) variables: Vec<String>,
    pub(crate) matrix: Vec<Vec<f64>>,
    pub(crate) pivot: PivotState,
}

impl TableState {
    /// Build a tableau from column labels, row labels and a real or integer matrix.
    pub fn new<C, V, T>(
        columns: impl IntoIterator<Item = C>,
        variables: impl IntoIterator<Item = V>,
        matrix: Vec<Vec<T>>,
    ) -> Result<Self>
    where
        C: Into<String>,
        V: Into<String>,
        T: Into<f64>,
    {
        let spec = TableSpec {
            columns: columns.into_iter().map(Into::into).collect(),
            variables: variables.into_iter().map(Into::into).collect(),
            matrix: matrix
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        };
        Self::try_from(spec)
    }

    pub(crate) fn validate(columns: &[String], variables: &[String], matrix: &[Vec<f64>]) -> Result<()> {
        if columns.is_empty() {
            return Err(TableauError::InvalidShape("no columns".to_string()));
        }
        if variables.is_empty() {
            return Err(TableauError::InvalidShape("no rows".to_string()));
        }
        if matrix.len() != variables.len() {
            return Err(TableauError::InvalidShape(format!(
                "{} row labels for {} matrix rows",
                variables.len(),
                matrix.len()
            )));
        }
        let width = columns.len() + 1;
        if let Some((i, row)) = matrix.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(TableauError::InvalidShape(format!(
                "row {} has {} entries, expected {}",
                i,
                row.len(),
                width
            )));
        }
        if columns[0] != variables[0] {
            return Err(TableauError::ObjectiveLabelMismatch {
                column: columns[0].clone(),
                variable: variables[0].clone(),
            });
        }
        for labels in [columns, variables] {
            let mut seen = HashSet::new();
            if let Some(dup) = labels.iter().find(|l| !seen.insert(l.as_str())) {
                return Err(TableauError::DuplicateLabel(dup.clone()));
            }
        }
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    pub fn pivot(&self) -> PivotState {
        self.pivot
    }

    pub fn pivot_row(&self) -> Option<usize> {
        self.pivot.row()
    }

    pub fn pivot_column(&self) -> Option<usize> {
        self.pivot.column()
    }

    /// Label of the objective row.
    pub fn objective_label(&self) -> &str {
        &self.columns[0]
    }

    pub fn num_rows(&self) -> usize {
        self.matrix.len()
    }

    /// Number of named columns (the RHS column is not counted).
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Index of the right-hand-side entry in every row.
    pub fn rhs_index(&self) -> usize {
        self.columns.len()
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.matrix[row][self.rhs_index()]
    }

    /// Right-hand side of the objective row.
    pub fn objective_value(&self) -> f64 {
        self.rhs(0)
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Constraint row in which `label` is basic.
    pub fn basic_row(&self, label: &str) -> Option<usize> {
        self.variables.iter().skip(1).position(|v| v == label).map(|i| i + 1)
    }

    /// Current value of a variable: its row's RHS when basic, zero otherwise.
    pub fn value_of(&self, label: &str) -> f64 {
        self.basic_row(label).map(|row| self.rhs(row)).unwrap_or(0.0)
    }

    /// Drop any pivot selection so the next entry selection starts fresh.
    pub fn clear_pivot(&mut self) {
        self.pivot = PivotState::Unset;
    }
}

impl TryFrom<TableSpec> for TableState {
    type Error = TableauError;

    fn try_from(spec: TableSpec) -> Result<Self> {
        Self::validate(&spec.columns, &spec.variables, &spec.matrix)?;
        Ok(Self {
            columns: spec.columns,
            variables: spec.variables,
            matrix: spec.matrix,
            pivot: PivotState::Unset,
        })
    }
}

impl From<TableState> for TableSpec {
    fn from(table: TableState) -> Self {
        Self {
            columns: table.columns,
            variables: table.variables,
            matrix: table.matrix,
        }
    }
}
