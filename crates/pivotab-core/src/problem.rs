use thiserror::Error;

use crate::error::TableauError;
use crate::table::TableState;

/// Label given to the objective row of a freshly built table.
pub const OBJECTIVE_LABEL: &str = "Z";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("{name} has {found} coefficients, expected {expected}")]
    CoefficientCount {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Table(#[from] TableauError),
}

/// Represents a linear programming problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Variable names
    pub variables: Vec<String>,
    /// Objective function
    pub objective: Objective,
    /// Constraints
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to minimize or maximize
    #[cfg_attr(feature = "serde", serde(default))]
    pub minimize: bool,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

/// A standard-form table together with the artificial columns it introduced.
#[derive(Debug, Clone)]
pub struct StandardForm {
    pub table: TableState,
    /// Artificial variables, each basic in its own row
    pub artificials: Vec<String>,
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                minimize: false,
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, minimize: bool) {
        self.objective = Objective { coefficients, minimize };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// The maximization cost row `[1, -c.., 0.. | 0]` over `columns`.
    ///
    /// Minimization problems are maximized as `-c`.
    pub fn cost_row(&self, columns: &[String]) -> Vec<f64> {
        let mut row = vec![0.0; columns.len() + 1];
        row[0] = 1.0;
        for (name, &coef) in self.variables.iter().zip(&self.objective.coefficients) {
            if let Some(j) = columns.iter().position(|c| c == name) {
                row[j] = if self.objective.minimize { coef } else { -coef };
            }
        }
        row
    }

    /// Build the initial tableau: a slack per `<=`, a surplus and an
    /// artificial per `>=`, an artificial per `=`. Rows with a negative RHS
    /// are flipped first so every RHS starts non-negative.
    pub fn to_table(&self) -> Result<StandardForm, ProblemError> {
        let n_vars = self.num_variables();
        if self.objective.coefficients.len() != n_vars {
            return Err(ProblemError::CoefficientCount {
                name: "objective".to_string(),
                expected: n_vars,
                found: self.objective.coefficients.len(),
            });
        }
        if let Some(c) = self.constraints.iter().find(|c| c.coefficients.len() != n_vars) {
            return Err(ProblemError::CoefficientCount {
                name: c.name.clone(),
                expected: n_vars,
                found: c.coefficients.len(),
            });
        }

        // Normalize orientation before laying out columns
        let rows: Vec<(Vec<f64>, ConstraintOp, f64)> = self
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    let flipped = match c.op {
                        ConstraintOp::Le => ConstraintOp::Ge,
                        ConstraintOp::Ge => ConstraintOp::Le,
                        ConstraintOp::Eq => ConstraintOp::Eq,
                    };
                    (c.coefficients.iter().map(|v| -v).collect(), flipped, -c.rhs)
                } else {
                    (c.coefficients.clone(), c.op, c.rhs)
                }
            })
            .collect();

        let mut columns = vec![OBJECTIVE_LABEL.to_string()];
        columns.extend(self.variables.iter().cloned());
        let mut extra: Vec<(usize, String, f64)> = Vec::new();
        let mut basic = Vec::with_capacity(rows.len());
        let mut artificials = Vec::new();

        for (i, (_, op, _)) in rows.iter().enumerate() {
            let k = i + 1;
            match op {
                ConstraintOp::Le => {
                    extra.push((i, format!("s{}", k), 1.0));
                    basic.push(format!("s{}", k));
                }
                ConstraintOp::Ge => {
                    extra.push((i, format!("e{}", k), -1.0));
                    artificials.push(format!("a{}", k));
                    basic.push(format!("a{}", k));
                }
                ConstraintOp::Eq => {
                    artificials.push(format!("a{}", k));
                    basic.push(format!("a{}", k));
                }
            }
        }
        // Artificials come last, after slacks and surpluses
        for (i, (_, op, _)) in rows.iter().enumerate() {
            if *op != ConstraintOp::Le {
                extra.push((i, format!("a{}", i + 1), 1.0));
            }
        }
        columns.extend(extra.iter().map(|(_, name, _)| name.clone()));

        let width = columns.len() + 1;
        let mut matrix = vec![self.cost_row(&columns)];
        for (i, (coefficients, _, rhs)) in rows.iter().enumerate() {
            let mut row = vec![0.0; width];
            row[1..=n_vars].copy_from_slice(coefficients);
            for (j, (_, _, sign)) in extra.iter().enumerate().filter(|(_, (r, _, _))| *r == i) {
                row[1 + n_vars + j] = *sign;
            }
            row[width - 1] = *rhs;
            matrix.push(row);
        }

        let mut variables = vec![OBJECTIVE_LABEL.to_string()];
        variables.extend(basic);
        let table = TableState::new(columns, variables, matrix)?;
        Ok(StandardForm { table, artificials })
    }
}
