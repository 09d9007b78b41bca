use thiserror::Error;

/// Failures raised by tableau construction and pivot operations.
///
/// Every operation checks its preconditions before touching the table, so an
/// error always leaves the [`TableState`](crate::TableState) as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableauError {
    #[error("Pivot column not set: select an entering variable first")]
    PivotColumnNotSet,
    #[error("Pivot not set: both pivot row and pivot column are required")]
    PivotNotSet,
    #[error("Pivot row {row} must be normalized before elimination")]
    NotNormalized { row: usize },
    #[error("Pivot at row {row}, column {column} is in progress; finish elimination first")]
    PivotInProgress { row: usize, column: usize },
    #[error("Pivot ({row}, {column}) is outside the constraint area of the tableau")]
    PivotOutOfRange { row: usize, column: usize },
    #[error("Zero pivot at row {row}, column '{column}'")]
    ZeroPivot { row: usize, column: String },
    #[error("Unbounded: no candidate rows with a positive entry in column '{column}'")]
    Unbounded { column: String },
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Variable '{0}' is not basic in any constraint row")]
    VariableNotBasic(String),
    #[error("Variable '{variable}' has a zero coefficient in its basic row {row}")]
    ZeroCoefficient { variable: String, row: usize },
    #[error("Invalid replacement row: expected {expected} entries, found {found}")]
    InvalidReplacementShape { expected: usize, found: usize },
    #[error("Invalid selection criterion: {0}")]
    InvalidCriterion(String),
    #[error("Cannot remove the objective column '{0}'")]
    ObjectiveColumn(String),
    #[error("Invalid tableau shape: {0}")]
    InvalidShape(String),
    #[error("Duplicate label '{0}'")]
    DuplicateLabel(String),
    #[error("Objective label mismatch: column '{column}' vs row '{variable}'")]
    ObjectiveLabelMismatch { column: String, variable: String },
}

pub type Result<T> = std::result::Result<T, TableauError>;
