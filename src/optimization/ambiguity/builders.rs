//! ambiguity::builders — Nelder–Mead solver construction.
//!
//! Purpose
//! -------
//! Build the initial simplex around the reference point and wire crate-level
//! options into an Argmin [`NelderMead`](argmin::solver::neldermead::NelderMead)
//! so higher-level code never touches Argmin generics.
//!
//! Key behaviors
//! -------------
//! - The simplex has `n + 1` vertices: the reference point and one vertex per
//!   coordinate, displaced by `simplex_scale · steps[i]`.
//! - The standard-deviation tolerance from [`OptimizerOptions`] is applied via
//!   Argmin's `with_sd_tolerance`.
//!
//! Conventions
//! -----------
//! - Builders do not set `max_iters`; that is a runner concern.
//! - Argmin errors are converted into [`OptError`](crate::optimization::errors::OptError).
//!
//! Testing notes
//! -------------
//! - Unit tests check simplex geometry and length validation; full solves are
//!   exercised in `api`.
use crate::optimization::{
    ambiguity::{
        traits::OptimizerOptions,
        types::{NelderMeadSolver, Theta},
    },
    errors::{OptError, OptResult},
};

/// Initial simplex around `reference`.
///
/// Vertex `0` is `reference`; vertex `i + 1` is `reference` with coordinate
/// `i` moved by `scale · steps[i]`. A zero step is replaced by `scale` so the
/// simplex never collapses.
///
/// # Errors
/// - `ThetaLengthMismatch` when `steps` and `reference` differ in length.
pub fn build_simplex(reference: &Theta, steps: &Theta, scale: f64) -> OptResult<Vec<Theta>> {
    if steps.len() != reference.len() {
        return Err(OptError::ThetaLengthMismatch {
            expected: reference.len(),
            actual: steps.len(),
        });
    }
    let mut simplex = Vec::with_capacity(reference.len() + 1);
    simplex.push(reference.clone());
    for (i, &step) in steps.iter().enumerate() {
        let step = if step.abs() > 0.0 { step } else { 1.0 };
        let mut vertex = reference.clone();
        vertex[i] += scale * step;
        simplex.push(vertex);
    }
    Ok(simplex)
}

/// build_nelder_mead — construct a configured Nelder–Mead solver.
///
/// Parameters
/// ----------
/// - `simplex`: starting vertices, usually from [`build_simplex`].
/// - `opts`: consulted for `sd_tolerance`.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) if Argmin rejects the
///   tolerance.
pub fn build_nelder_mead(
    simplex: Vec<Theta>, opts: &OptimizerOptions,
) -> OptResult<NelderMeadSolver> {
    let solver = NelderMeadSolver::new(simplex).with_sd_tolerance(opts.sd_tolerance)?;
    Ok(solver)
}
