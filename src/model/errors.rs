//! Errors for the structural model (configuration validation, pre-solve
//! checks, transition matrices, backward-induction invariants, and the
//! diagnostics writer).
//!
//! This module defines [`ModelError`], used across the Rust core and the
//! optional Python surface. It implements `Display`/`Error` and converts to
//! `PyErr` when the `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based**; periods run `0..num_periods`.
//! - Optimizer failures that abort a solve (invalid configuration, unknown
//!   exit codes) are wrapped in [`ModelError::Optimization`]. Plain
//!   non-convergence is never an error; it is recorded in diagnostics.
use crate::optimization::errors::OptError;
use statrs::distribution::NormalError;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Crate-wide result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for model setup and solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Model specification ----
    /// At least one period is required.
    InvalidNumPeriods { num_periods: usize },

    /// Schooling bounds need `edu_start <= edu_max`.
    InvalidEducationBounds { edu_start: usize, edu_max: usize },

    /// Discount factor must be finite and non-negative.
    InvalidDelta { delta: f64 },

    /// A reward coefficient is NaN/±inf.
    NonFiniteCoefficient { group: &'static str, index: usize, value: f64 },

    /// Shock Cholesky factor must be 4×4.
    InvalidCholeskyShape { rows: usize, cols: usize },

    /// Shock Cholesky factor must be lower triangular with finite entries.
    InvalidCholeskyEntry { row: usize, col: usize, value: f64, reason: &'static str },

    // ---- Solve options ----
    /// At least one Monte Carlo draw is required.
    InvalidNumDraws { num_draws: usize },

    /// Interpolation needs at least one simulated state.
    InvalidNumPointsInterp { num_points: usize },

    /// Unknown ambiguity measure name.
    InvalidAmbiguityMeasure { name: String, reason: &'static str },

    /// Pre-generated draws do not match the model dimensions.
    DrawsShapeMismatch { expected: (usize, usize, usize), found: (usize, usize, usize) },

    // ---- Pre-solve checks ----
    /// Observed data file does not exist.
    DataFileMissing { path: String },

    /// Configuration must be locked before it is solved or processed.
    ConfigurationNotLocked,

    // ---- Transition matrices ----
    /// Transition probability outside `[0, 1]`.
    InvalidProbability { row: usize, col: usize, value: f64 },

    /// Transition row does not sum to one.
    RowNotStochastic { row: usize, sum: f64 },

    /// Labels do not match the matrix shape.
    TransitionShapeMismatch { rows: usize, cols: usize, row_labels: usize, col_labels: usize },

    /// A source label contains more than one process state.
    AmbiguousStateLabel { label: String, matches: Vec<String> },

    // ---- Backward-induction invariants ----
    /// Successor state of a non-terminal choice is not in the next period.
    MissingSuccessor { period: usize, state: usize, choice: usize },

    /// Expected maximal value is NaN/±inf.
    NonFiniteEmax { period: usize, state: usize, value: f64 },

    /// Interpolation regression could not be solved.
    RegressionFailed { period: usize, reason: &'static str },

    // ---- Diagnostics output ----
    /// Writing the diagnostics report failed.
    Io { path: String, reason: String },

    // ---- Optimizer ----
    /// Wrapper for errors raised by the optimization layer.
    Optimization(OptError),

    // ---- statrs distribution errors ----
    /// Wrapper for statrs::distribution::NormalError
    InvalidNormalParam,
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Model specification ----
            ModelError::InvalidNumPeriods { num_periods } => {
                write!(f, "Number of periods must be at least one; got: {num_periods}")
            }
            ModelError::InvalidEducationBounds { edu_start, edu_max } => {
                write!(f, "Initial schooling ({edu_start}) exceeds maximum schooling ({edu_max}).")
            }
            ModelError::InvalidDelta { delta } => {
                write!(f, "Discount factor must be finite and >= 0; got: {delta}")
            }
            ModelError::NonFiniteCoefficient { group, index, value } => {
                write!(f, "Coefficient {index} of {group} must be finite; got: {value}")
            }
            ModelError::InvalidCholeskyShape { rows, cols } => {
                write!(f, "Shock Cholesky factor must be 4x4; got: {rows}x{cols}")
            }
            ModelError::InvalidCholeskyEntry { row, col, value, reason } => {
                write!(f, "Invalid shock Cholesky entry ({row}, {col}) = {value}: {reason}")
            }
            // ---- Solve options ----
            ModelError::InvalidNumDraws { num_draws } => {
                write!(f, "Number of EMAX draws must be at least one; got: {num_draws}")
            }
            ModelError::InvalidNumPointsInterp { num_points } => {
                write!(f, "Number of interpolation points must be at least one; got: {num_points}")
            }
            ModelError::InvalidAmbiguityMeasure { name, reason } => {
                write!(f, "Invalid ambiguity measure '{name}': {reason}")
            }
            ModelError::DrawsShapeMismatch { expected, found } => {
                write!(f, "Draws shape mismatch: expected {expected:?}, found {found:?}")
            }
            // ---- Pre-solve checks ----
            ModelError::DataFileMissing { path } => {
                write!(f, "Data file does not exist: {path}")
            }
            ModelError::ConfigurationNotLocked => {
                write!(f, "Model configuration must be locked before processing.")
            }
            // ---- Transition matrices ----
            ModelError::InvalidProbability { row, col, value } => {
                write!(f, "Transition probability at ({row}, {col}) must lie in [0, 1]; got: {value}")
            }
            ModelError::RowNotStochastic { row, sum } => {
                write!(f, "Transition probabilities in row {row} must sum to one; got: {sum}")
            }
            ModelError::TransitionShapeMismatch { rows, cols, row_labels, col_labels } => {
                write!(
                    f,
                    "Transition matrix is {rows}x{cols} but has {row_labels} row and {col_labels} column labels"
                )
            }
            ModelError::AmbiguousStateLabel { label, matches } => {
                write!(f, "Label '{label}' matches more than one process state: {matches:?}")
            }
            // ---- Backward-induction invariants ----
            ModelError::MissingSuccessor { period, state, choice } => {
                write!(
                    f,
                    "Successor of state {state} in period {period} under choice {choice} is not in the state space"
                )
            }
            ModelError::NonFiniteEmax { period, state, value } => {
                write!(f, "Non-finite EMAX for state {state} in period {period}: {value}")
            }
            ModelError::RegressionFailed { period, reason } => {
                write!(f, "Interpolation regression failed in period {period}: {reason}")
            }
            // ---- Diagnostics output ----
            ModelError::Io { path, reason } => {
                write!(f, "I/O error on {path}: {reason}")
            }
            // ---- Optimizer ----
            ModelError::Optimization(err) => {
                write!(f, "Optimization error: {err}")
            }
            // ---- statrs distribution errors ----
            ModelError::InvalidNormalParam => {
                write!(f, "Normal distribution requires a finite mean and sd > 0.")
            }
        }
    }
}

impl From<OptError> for ModelError {
    fn from(err: OptError) -> ModelError {
        ModelError::Optimization(err)
    }
}

impl From<NormalError> for ModelError {
    fn from(_: NormalError) -> ModelError {
        ModelError::InvalidNormalParam
    }
}

/// Convert a [`ModelError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Optimizer errors are wrapped, not flattened, and keep their message.
    fn opt_errors_are_wrapped() {
        let err: ModelError = OptError::UnknownExitCode { code: 99 }.into();

        assert_eq!(err, ModelError::Optimization(OptError::UnknownExitCode { code: 99 }));
        assert!(err.to_string().contains("99"));
    }

    #[test]
    // Purpose
    // -------
    // Precondition errors name the violated condition.
    fn precondition_messages_are_descriptive() {
        let missing = ModelError::DataFileMissing { path: "obs.dat".to_string() };
        assert!(missing.to_string().contains("obs.dat"));
        assert!(ModelError::ConfigurationNotLocked.to_string().contains("locked"));
    }
}
