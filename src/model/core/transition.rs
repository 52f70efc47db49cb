//! Transition matrices of exogenous processes.
//!
//! Purpose
//! -------
//! Validate a user-supplied transition matrix of an exogenous process (e.g.
//! health shocks), derive the covariate expression each source state is
//! conditioned on, and return the log-probabilities as model parameters.
//!
//! Key behaviors
//! -------------
//! - [`check_numerics`] requires every probability in `[0, 1]` and every row
//!   to sum to one within `1e-8 + 1e-5`.
//! - [`create_covariates_options`] maps each source label to
//!   `"{process} == {state}"` when it *is* a process state,
//!   `"{process} == {state} & ?"` when it merely contains one (the `?`
//!   stands for the other conditioning variables), and `"?"` when it
//!   contains none. Labels containing several process states are rejected.
//! - [`transform_matrix`] takes elementwise logarithms.
//! - [`parse_transition_matrix`] chains the three and emits one parameter
//!   per `(source, target)` pair, named
//!   `exogenous_process_{process}_{target}`.
//!
//! Conventions
//! -----------
//! - Rows are source states, columns are process states (targets).
use crate::model::errors::{ModelError, ModelResult};
use ndarray::{Array2, ArrayView2};
use std::collections::BTreeMap;

/// Absolute tolerance on row sums.
pub const ROW_SUM_ATOL: f64 = 1e-8;

/// Relative tolerance on row sums.
pub const ROW_SUM_RTOL: f64 = 1e-5;

/// A labelled transition matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub probabilities: Array2<f64>,
}

impl TransitionMatrix {
    /// # Errors
    /// - [`ModelError::TransitionShapeMismatch`] if the label counts do not
    ///   match the matrix shape.
    pub fn new(
        row_labels: Vec<String>, col_labels: Vec<String>, probabilities: Array2<f64>,
    ) -> ModelResult<Self> {
        let (rows, cols) = probabilities.dim();
        if row_labels.len() != rows || col_labels.len() != cols {
            return Err(ModelError::TransitionShapeMismatch {
                rows,
                cols,
                row_labels: row_labels.len(),
                col_labels: col_labels.len(),
            });
        }
        Ok(Self { row_labels, col_labels, probabilities })
    }
}

/// One log-probability parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionParam {
    /// `exogenous_process_{process}_{target}`.
    pub category: String,
    /// Source state label.
    pub name: String,
    /// `ln P(target | source)`.
    pub value: f64,
}

/// Output of [`parse_transition_matrix`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransition {
    pub params: Vec<TransitionParam>,
    pub covariates: BTreeMap<String, String>,
}

/// Check that `probabilities` is row-stochastic.
///
/// # Errors
/// - [`ModelError::InvalidProbability`] for the first entry outside `[0, 1]`.
/// - [`ModelError::RowNotStochastic`] for the first row whose sum is not
///   within `ROW_SUM_ATOL + ROW_SUM_RTOL` of one.
pub fn check_numerics(probabilities: ArrayView2<f64>) -> ModelResult<()> {
    if let Some(((row, col), &value)) =
        probabilities.indexed_iter().find(|(_, v)| !(0.0..=1.0).contains(*v))
    {
        return Err(ModelError::InvalidProbability { row, col, value });
    }
    for (row, values) in probabilities.rows().into_iter().enumerate() {
        let sum = values.sum();
        if (sum - 1.0).abs() > ROW_SUM_ATOL + ROW_SUM_RTOL {
            return Err(ModelError::RowNotStochastic { row, sum });
        }
    }
    Ok(())
}

/// Covariate expression of every source label.
///
/// # Errors
/// - [`ModelError::AmbiguousStateLabel`] if a label contains more than one
///   process state.
pub fn create_covariates_options(
    states: &[String], process: &str, process_states: &[String],
) -> ModelResult<BTreeMap<String, String>> {
    let mut covariates = BTreeMap::new();
    for label in states {
        let matches: Vec<&String> =
            process_states.iter().filter(|state| label.contains(state.as_str())).collect();
        let expression = match matches.as_slice() {
            [] => "?".to_string(),
            [state] if *state == label => format!("{process} == {state}"),
            [state] => format!("{process} == {state} & ?"),
            _ => {
                return Err(ModelError::AmbiguousStateLabel {
                    label: label.clone(),
                    matches: matches.into_iter().cloned().collect(),
                });
            }
        };
        covariates.insert(label.clone(), expression);
    }
    Ok(covariates)
}

/// Elementwise natural logarithm; zero probabilities become `-inf`.
pub fn transform_matrix(probabilities: ArrayView2<f64>) -> Array2<f64> {
    probabilities.mapv(f64::ln)
}

/// Validate a transition matrix and turn it into parameters and covariates.
///
/// # Errors
/// - Propagates [`check_numerics`] and [`create_covariates_options`] errors.
pub fn parse_transition_matrix(
    matrix: &TransitionMatrix, process: &str,
) -> ModelResult<ParsedTransition> {
    check_numerics(matrix.probabilities.view())?;
    let covariates = create_covariates_options(&matrix.row_labels, process, &matrix.col_labels)?;
    let log_matrix = transform_matrix(matrix.probabilities.view());

    let params = matrix
        .row_labels
        .iter()
        .enumerate()
        .flat_map(|(i, source)| {
            let log_matrix = &log_matrix;
            matrix.col_labels.iter().enumerate().map(move |(j, target)| TransitionParam {
                category: format!("exogenous_process_{process}_{target}"),
                name: source.clone(),
                value: log_matrix[[i, j]],
            })
        })
        .collect();

    Ok(ParsedTransition { params, covariates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Row-stochastic checks, including a row summing to 1.2.
    // - Covariate expressions for dependent, independent and ambiguous labels.
    // - The log transform and the full parse on integer-like labels.
    // -------------------------------------------------------------------------

    const PROCESS: &str = "health_shocks";

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    // Purpose
    // -------
    // A normalized matrix passes; a row summing to 1.2 or a negative entry
    // fails.
    fn numerics_are_checked() {
        let good = array![[0.25, 0.75], [0.6, 0.4]];
        let heavy = array![[0.25, 0.75], [0.6, 0.6]];
        let negative = array![[1.1, -0.1], [0.5, 0.5]];

        assert!(check_numerics(good.view()).is_ok());
        assert!(matches!(
            check_numerics(heavy.view()),
            Err(ModelError::RowNotStochastic { row: 1, .. })
        ));
        assert!(matches!(
            check_numerics(negative.view()),
            Err(ModelError::InvalidProbability { row: 0, col: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Labels built from process states condition on that state; unrelated
    // labels get the bare placeholder.
    fn covariates_for_dependent_and_independent_processes() {
        let process_states = labels(&["sick", "healthy"]);
        let dependent =
            labels(&["sick_and_young", "sick_and_old", "healthy_and_young", "healthy_and_old"]);
        let independent = labels(&["young", "old"]);

        let dep = create_covariates_options(&dependent, PROCESS, &process_states).unwrap();
        let indep = create_covariates_options(&independent, PROCESS, &process_states).unwrap();

        assert_eq!(dep["sick_and_old"], "health_shocks == sick & ?");
        assert_eq!(dep["healthy_and_young"], "health_shocks == healthy & ?");
        assert_eq!(indep["young"], "?");
        assert_eq!(indep["old"], "?");
    }

    #[test]
    // Purpose
    // -------
    // A label containing two process states is ambiguous.
    fn ambiguous_labels_are_rejected() {
        let process_states = labels(&["sick", "healthy"]);
        let states = labels(&["sick_healthy", "sick"]);

        let err = create_covariates_options(&states, PROCESS, &process_states);

        assert!(matches!(err, Err(ModelError::AmbiguousStateLabel { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Exponentiating the transformed matrix gives back a valid matrix, and
    // the full parse names parameters and covariates as documented.
    fn parse_integer_labels() {
        let matrix =
            TransitionMatrix::new(labels(&["0", "1"]), labels(&["0", "1"]), array![[0.9, 0.1], [0.3, 0.7]])
                .unwrap();

        let parsed = parse_transition_matrix(&matrix, PROCESS).unwrap();

        assert_eq!(parsed.covariates["0"], "health_shocks == 0");
        assert_eq!(parsed.covariates["1"], "health_shocks == 1");
        assert_eq!(parsed.params.len(), 4);
        assert_eq!(parsed.params[1].category, "exogenous_process_health_shocks_1");
        assert_eq!(parsed.params[1].name, "0");
        assert_relative_eq!(parsed.params[1].value, 0.1_f64.ln());
        assert!(check_numerics(transform_matrix(matrix.probabilities.view()).mapv(f64::exp).view()).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Label counts must match the matrix shape.
    fn shape_mismatch_is_rejected() {
        let err = TransitionMatrix::new(labels(&["a"]), labels(&["x", "y"]), Array2::zeros((2, 2)));
        assert!(matches!(err, Err(ModelError::TransitionShapeMismatch { .. })));
    }
}
