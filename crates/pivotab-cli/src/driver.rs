use log::{debug, info};
use pivotab_core::{
    Criterion, Entry, LpProblem, ProblemError, StandardForm, TableState, TableauError, OBJECTIVE_LABEL,
};

/// Label of the phase-one feasibility objective.
const PHASE_ONE_LABEL: &str = "W";

/// How a pivot loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Optimal { iterations: usize },
    Unbounded { column: String },
    IterationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// Gave up after the configured number of pivots
    IterationLimit,
}

/// The result of solving an LP problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    /// Optimal values for each decision variable
    pub values: Vec<f64>,
    /// Optimal objective value, in the problem's own sense
    pub objective_value: f64,
    /// Final tableau, when the run got that far
    pub table: Option<TableState>,
}

impl Solution {
    fn without_values(status: SolutionStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value: f64::NAN,
            table: None,
        }
    }
}

/// Repeats the core pivot operations until a terminal state.
pub struct Driver {
    /// Maximum pivots per phase before giving up
    max_iterations: usize,
    /// Tolerance for the phase-one feasibility check
    tolerance: f64,
    criterion: Criterion,
}

impl Default for Driver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
            criterion: Criterion::MostNegative,
        }
    }
}

impl Driver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Pivot until optimal, unbounded or out of iterations. `observe` sees the
    /// table each time a pivot element has been chosen, before the row
    /// operations run.
    pub fn iterate(
        &self,
        table: &mut TableState,
        observe: &mut dyn FnMut(&TableState),
    ) -> Result<Outcome, TableauError> {
        table.clear_pivot();
        for iteration in 0..self.max_iterations {
            if table.select_entry(self.criterion)? == Entry::Optimal {
                debug!("optimal after {} pivot(s)", iteration);
                return Ok(Outcome::Optimal { iterations: iteration });
            }
            match table.select_exit() {
                Ok(_) => {}
                Err(TableauError::Unbounded { column }) => return Ok(Outcome::Unbounded { column }),
                Err(e) => return Err(e),
            }
            observe(table);
            table.normalize()?;
            table.eliminate()?;
        }
        Ok(Outcome::IterationLimit)
    }

    /// Solve with the two-phase method.
    pub fn solve(
        &self,
        problem: &LpProblem,
        observe: &mut dyn FnMut(&TableState),
    ) -> Result<Solution, ProblemError> {
        let StandardForm { mut table, artificials } = problem.to_table()?;

        if !artificials.is_empty() {
            info!("phase 1: {} artificial variable(s)", artificials.len());
            if let Some(status) = self.phase1(&mut table, &artificials, observe)? {
                return Ok(Solution::without_values(status));
            }
            table = table.prune_columns(artificials.as_slice())?;
            table.replace_objective(OBJECTIVE_LABEL, problem.cost_row(table.columns()))?;
            let basic: Vec<String> = table.variables()[1..].to_vec();
            for name in &basic {
                let column = table.column_index(name).ok_or_else(|| TableauError::UnknownVariable(name.clone()))?;
                if table.matrix()[0][column] != 0.0 {
                    table.adjust_objective(name)?;
                }
            }
        }

        info!("phase 2");
        match self.iterate(&mut table, observe)? {
            Outcome::Optimal { .. } => {}
            Outcome::Unbounded { column } => {
                info!("unbounded along '{}'", column);
                return Ok(Solution::without_values(SolutionStatus::Unbounded));
            }
            Outcome::IterationLimit => return Ok(Solution::without_values(SolutionStatus::IterationLimit)),
        }

        let values: Vec<f64> = problem.variables.iter().map(|v| table.value_of(v)).collect();
        let objective_value: f64 = values
            .iter()
            .zip(&problem.objective.coefficients)
            .map(|(x, c)| x * c)
            .sum();
        Ok(Solution {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            table: Some(table),
        })
    }

    /// Drive the artificial variables to zero. Returns a terminal status when
    /// the problem turns out infeasible or the loop gives up.
    fn phase1(
        &self,
        table: &mut TableState,
        artificials: &[String],
        observe: &mut dyn FnMut(&TableState),
    ) -> Result<Option<SolutionStatus>, TableauError> {
        // maximize -sum(a): coefficient +1 on each artificial in row form
        let mut row = vec![0.0; table.num_columns() + 1];
        row[0] = 1.0;
        for name in artificials {
            let column = table.column_index(name).ok_or_else(|| TableauError::UnknownVariable(name.clone()))?;
            row[column] = 1.0;
        }
        table.replace_objective(PHASE_ONE_LABEL, row)?;
        for name in artificials {
            table.adjust_objective(name)?;
        }

        match self.iterate(table, observe)? {
            Outcome::Optimal { .. } => {}
            // -sum(a) is bounded above by zero, so this means a broken table
            Outcome::Unbounded { .. } => return Ok(Some(SolutionStatus::Infeasible)),
            Outcome::IterationLimit => return Ok(Some(SolutionStatus::IterationLimit)),
        }
        if table.objective_value() < -self.tolerance {
            info!("infeasible: phase 1 optimum {}", table.objective_value());
            return Ok(Some(SolutionStatus::Infeasible));
        }

        // Artificials left in the basis sit at zero; swap them for a real column
        // where the row allows it, otherwise the row is redundant and gets pruned.
        for name in artificials {
            let Some(row) = table.basic_row(name) else { continue };
            let candidate = (1..table.rhs_index()).find(|&j| {
                !artificials.contains(&table.columns()[j]) && table.matrix()[row][j].abs() > self.tolerance
            });
            match candidate {
                Some(column) => {
                    debug!("driving '{}' out of row {} via '{}'", name, row, table.columns()[column]);
                    table.select_pivot(row, column)?;
                    table.normalize()?;
                    table.eliminate()?;
                    table.clear_pivot();
                }
                None => debug!("row {} is redundant", row),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivotab_core::ConstraintOp;

    fn solve(problem: &LpProblem) -> Solution {
        Driver::new().solve(problem, &mut |_| {}).unwrap()
    }

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=11
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = solve(&problem);
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 11.0).abs() < 1e-6, "obj = {} (expected 11)", solution.objective_value);
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = solve(&problem);
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 9.0).abs() < 1e-6, "obj = {} (expected 9)", solution.objective_value);

        let table = solution.table.unwrap();
        assert_eq!(table.objective_label(), "Z");
        assert!(table.column_index("a1").is_none());
    }

    #[test]
    fn test_equality_constraint() {
        // Maximize: x + y, x + y = 5, x <= 2
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 2.0], false);
        problem.add_constraint("total", vec![1.0, 1.0], ConstraintOp::Eq, 5.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 2.0);

        let solution = solve(&problem);
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[1] - 5.0).abs() < 1e-6, "y = {}", solution.values[1]);
        assert!((solution.objective_value - 10.0).abs() < 1e-6, "obj = {}", solution.objective_value);
    }

    #[test]
    fn test_redundant_equality_is_pruned() {
        // The second equality repeats the first, leaving a1/a2 basic at zero.
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 1.0], true);
        problem.add_constraint("first", vec![1.0, 1.0], ConstraintOp::Eq, 2.0);
        problem.add_constraint("again", vec![2.0, 2.0], ConstraintOp::Eq, 4.0);

        let solution = solve(&problem);
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.objective_value - 2.0).abs() < 1e-6, "obj = {}", solution.objective_value);
        assert_eq!(solution.table.unwrap().num_rows(), 2);
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 3
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("lower", vec![1.0], ConstraintOp::Ge, 5.0);
        problem.add_constraint("upper", vec![1.0], ConstraintOp::Le, 3.0);

        let solution = solve(&problem);
        assert_eq!(solution.status, SolutionStatus::Infeasible);
    }

    #[test]
    fn test_unbounded() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 1.0], false);
        problem.add_constraint("diff", vec![1.0, -1.0], ConstraintOp::Le, 1.0);

        let solution = solve(&problem);
        assert_eq!(solution.status, SolutionStatus::Unbounded);
    }

    #[test]
    fn test_iterate_observes_each_pivot() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, 5.0], false);
        problem.add_constraint("c1", vec![1.0, 0.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("c2", vec![0.0, 2.0], ConstraintOp::Le, 12.0);
        problem.add_constraint("c3", vec![3.0, 2.0], ConstraintOp::Le, 18.0);
        let mut table = problem.to_table().unwrap().table;

        let mut seen = Vec::new();
        let outcome = Driver::new()
            .iterate(&mut table, &mut |t| seen.push((t.pivot_row(), t.pivot_column())))
            .unwrap();
        assert_eq!(outcome, Outcome::Optimal { iterations: 2 });
        assert_eq!(seen, vec![(Some(2), Some(2)), (Some(3), Some(1))]);
        assert!((table.objective_value() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_iteration_limit() {
        let mut table = TableState::new(
            ["Z", "x", "y", "s1", "s2"],
            ["Z", "s1", "s2"],
            vec![vec![1, -1, -1, 0, 0, 0], vec![0, 1, 0, 1, 0, 1], vec![0, 0, 1, 0, 1, 1]],
        )
        .unwrap();
        let outcome = Driver::new().with_max_iterations(1).iterate(&mut table, &mut |_| {}).unwrap();
        assert_eq!(outcome, Outcome::IterationLimit);
    }
}
