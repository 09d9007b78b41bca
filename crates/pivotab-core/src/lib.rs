mod error;
mod phase;
mod pivot;
mod problem;
mod select;
mod table;

pub use error::{Result, TableauError};
pub use pivot::Step;
pub use problem::{Constraint, ConstraintOp, LpProblem, Objective, ProblemError, StandardForm, OBJECTIVE_LABEL};
pub use select::{Criterion, Entry, Exit};
pub use table::{PivotState, TableSpec, TableState};
