//! EMAX interpolation — solve a random subset of states, predict the rest.
//!
//! Purpose
//! -------
//! Periods with many states are expensive to integrate state by state. With
//! interpolation enabled, only `num_points` randomly chosen states are solved
//! by Monte Carlo; the others are predicted by an OLS regression of the
//! simulated EMAX on functions of the state's "no-shock" values.
//!
//! Key behaviors
//! -------------
//! - [`get_simulated_indicator`] picks the simulated states without
//!   replacement from a `SmallRng` seeded with `seed + period`.
//! - [`get_exogenous_variables`] evaluates each alternative at its expected
//!   shock, `maxe = max_j v_j`, and builds the regressor row
//!   `[maxe − v_j (4), √(maxe − v_j) (4), 1]`.
//! - [`get_coefficients`] fits `EMAX − maxe` on the simulated rows via an
//!   SVD least-squares solve.
//! - [`get_predictions`] returns `maxe + max(Xβ, 0)` for predicted states and
//!   keeps the exact value of simulated states.
//!
//! Invariants & assumptions
//! ------------------------
//! - Expected occupation shocks are `exp(σ²/2)` (log-normal mean), the
//!   additive shocks have mean zero.
//! - Predictions are never below `maxe`, the value without shock variation.
use crate::model::{
    core::constants::{NUM_ALTERNATIVES, OCCUPATION_A, OCCUPATION_B},
    errors::{ModelError, ModelResult},
    solve::emax::{EmaxInputs, total_values},
};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::{SeedableRng, rngs::SmallRng, seq::index::sample};

/// Regressors per state: four deviations, their square roots, intercept.
pub const NUM_REGRESSORS: usize = 2 * NUM_ALTERNATIVES + 1;

/// Singular values below this threshold are ignored by the OLS solve.
pub const SVD_EPS: f64 = 1e-12;

/// Which states of `period` are solved exactly.
///
/// `num_points >= num_states` simulates every state.
pub fn get_simulated_indicator(
    num_points: usize, num_states: usize, period: usize, seed: u64,
) -> Vec<bool> {
    if num_points >= num_states {
        return vec![true; num_states];
    }
    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(period as u64));
    let mut indicator = vec![false; num_states];
    for k in sample(&mut rng, num_states, num_points) {
        indicator[k] = true;
    }
    indicator
}

/// Expected realized shocks: `[exp(σ_A²/2), exp(σ_B²/2), 0, 0]`.
pub fn expected_shocks(shocks_cov: ArrayView2<f64>) -> Array1<f64> {
    let mut expected = Array1::zeros(NUM_ALTERNATIVES);
    for j in [OCCUPATION_A, OCCUPATION_B] {
        expected[j] = (shocks_cov[[j, j]] / 2.0).exp();
    }
    expected
}

/// Regressor matrix and `maxe` of every state.
pub fn get_exogenous_variables(
    inputs: &[EmaxInputs], shocks_expected: ArrayView1<f64>,
) -> (Array2<f64>, Array1<f64>) {
    let mut exogenous = Array2::zeros((inputs.len(), NUM_REGRESSORS));
    let mut maxe = Array1::zeros(inputs.len());
    for (k, state) in inputs.iter().enumerate() {
        let values = total_values(state, shocks_expected);
        let max = values.into_iter().fold(f64::NEG_INFINITY, f64::max);
        maxe[k] = max;
        let mut row = exogenous.row_mut(k);
        for (j, &v) in values.iter().enumerate() {
            let deviation = max - v;
            row[j] = deviation;
            row[NUM_ALTERNATIVES + j] = deviation.sqrt();
        }
        row[2 * NUM_ALTERNATIVES] = 1.0;
    }
    (exogenous, maxe)
}

/// Dependent variable `EMAX − maxe`; only meaningful on simulated rows.
pub fn get_endogenous_variable(emax: ArrayView1<f64>, maxe: ArrayView1<f64>) -> Array1<f64> {
    &emax - &maxe
}

/// OLS coefficients from the simulated rows.
///
/// # Errors
/// - [`ModelError::RegressionFailed`] when no state is simulated or the SVD
///   solve fails.
pub fn get_coefficients(
    exogenous: ArrayView2<f64>, endogenous: ArrayView1<f64>, is_simulated: &[bool],
    period: usize,
) -> ModelResult<Array1<f64>> {
    let rows: Vec<usize> =
        is_simulated.iter().enumerate().filter_map(|(k, &sim)| sim.then_some(k)).collect();
    if rows.is_empty() {
        return Err(ModelError::RegressionFailed { period, reason: "no simulated states" });
    }
    let ncols = exogenous.ncols();
    let x = DMatrix::from_fn(rows.len(), ncols, |i, j| exogenous[[rows[i], j]]);
    let y = DVector::from_iterator(rows.len(), rows.iter().map(|&k| endogenous[k]));

    let beta = x
        .svd(true, true)
        .solve(&y, SVD_EPS)
        .map_err(|reason| ModelError::RegressionFailed { period, reason })?;
    Ok(Array1::from_iter(beta.iter().copied()))
}

/// Interpolated EMAX of every state.
pub fn get_predictions(
    exogenous: ArrayView2<f64>, coeffs: ArrayView1<f64>, maxe: ArrayView1<f64>,
    emax_simulated: ArrayView1<f64>, is_simulated: &[bool],
) -> Array1<f64> {
    let fitted = exogenous.dot(&coeffs);
    Array1::from_shape_fn(maxe.len(), |k| {
        if is_simulated[k] { emax_simulated[k] } else { maxe[k] + fitted[k].max(0.0) }
    })
}
