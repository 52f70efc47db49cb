//! dcdp_solver — backward-induction solver for finite-horizon dynamic
//! discrete-choice models, with optional ambiguity-robust continuation values.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, behind the
//! `python-bindings` feature, as the PyO3 bridge exposing the solver to
//! Python via the `_dcdp_solver` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules:
//!   - `model`: state space, rewards, shocks, options, and the solver.
//!   - `optimization`: the worst-case (ambiguity) search and covariance
//!     numerics.
//!   - `record`: progress events and the ambiguity report.
//! - Define the `#[pymodule]` initializer and a `solve` function returning
//!   the padded EMAX array.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - Python callers cannot bypass validation: every input goes through the
//!   same constructors as native callers.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code propagate as rich error types internally and
//!   are converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on `model::solve` (or `model::prelude`) and can
//!   ignore the items gated by `python-bindings`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_solve_pipeline.rs`.

pub mod model;
pub mod optimization;
pub mod record;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

#[cfg(feature = "python-bindings")]
use crate::{
    model::core::{
        options::{AmbiguityOptions, InterpolationOptions, ModelSpec, SolveOptions},
        rewards::RewardCoefficients,
    },
    optimization::ambiguity::OptimizerOptions,
    record::progress::TracingRecorder,
};

/// solve — solve a model from Python and return its padded EMAX array.
///
/// Parameters
/// ----------
/// - `num_periods`, `edu_start`, `edu_max`, `delta`: model horizon,
///   schooling bounds and discount factor.
/// - `coeffs_a`, `coeffs_b` (length 6), `coeffs_edu` (length 3),
///   `coeffs_home` (length 1): reward coefficients.
/// - `shocks_cholesky`: 4×4 lower-triangular factor.
/// - `num_draws_emax`, `seed_emax`: Monte Carlo integration.
/// - `ambiguity_measure`: `None`, `"kl"` or `"absolute"`; with
///   `ambiguity_level` its radius.
/// - `num_points_interp`, `seed_interp`: interpolation, off when `None`.
///
/// Returns
/// -------
/// `numpy.ndarray` of shape `(num_periods, max_states_period)` with NaN
/// padding.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    num_periods,
    edu_start,
    edu_max,
    delta,
    coeffs_a,
    coeffs_b,
    coeffs_edu,
    coeffs_home,
    shocks_cholesky,
    num_draws_emax = 500,
    seed_emax = 456,
    ambiguity_measure = None,
    ambiguity_level = 0.0,
    num_points_interp = None,
    seed_interp = 456,
))]
#[allow(clippy::too_many_arguments)]
fn solve<'py>(
    py: Python<'py>, num_periods: usize, edu_start: usize, edu_max: usize, delta: f64,
    coeffs_a: Vec<f64>, coeffs_b: Vec<f64>, coeffs_edu: Vec<f64>, coeffs_home: Vec<f64>,
    shocks_cholesky: PyReadonlyArray2<'py, f64>, num_draws_emax: usize, seed_emax: u64,
    ambiguity_measure: Option<&str>, ambiguity_level: f64, num_points_interp: Option<usize>,
    seed_interp: u64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let coeffs = RewardCoefficients::new(
        fixed_length("coeffs_a", &coeffs_a)?,
        fixed_length("coeffs_b", &coeffs_b)?,
        fixed_length("coeffs_edu", &coeffs_edu)?,
        fixed_length("coeffs_home", &coeffs_home)?,
    )?;
    let spec = ModelSpec::new(
        num_periods,
        edu_start,
        edu_max,
        delta,
        coeffs,
        shocks_cholesky.as_array().to_owned(),
    )?
    .lock();

    let ambiguity = ambiguity_measure
        .map(|name| {
            AmbiguityOptions::new(name.parse()?, ambiguity_level, OptimizerOptions::default())
        })
        .transpose()?;
    let interpolation =
        num_points_interp.map(|n| InterpolationOptions::new(n, seed_interp)).transpose()?;
    let opts = SolveOptions::new(num_draws_emax, seed_emax, ambiguity, interpolation)?;

    let solution = py.allow_threads(|| model::solve::solve(&spec, &opts, &TracingRecorder))?;
    Ok(solution.periods_emax().into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
fn fixed_length<const N: usize>(name: &str, values: &[f64]) -> PyResult<[f64; N]> {
    <[f64; N]>::try_from(values).map_err(|_| {
        PyValueError::new_err(format!("{name} must have length {N}; got: {}", values.len()))
    })
}

/// Python module initializer for `_dcdp_solver`.
///
/// Invoked automatically by Python when importing the compiled extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _dcdp_solver<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(solve, m)?)?;
    Ok(())
}
