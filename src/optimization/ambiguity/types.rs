//! ambiguity::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and solver aliases used by the worst-case
//! optimizer, so the rest of the module stays agnostic to `ndarray` and
//! Argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` is the perturbation vector `(μ₀, μ₁, σ₀, σ₁)`: mean shifts and
//!   standard deviations of the two occupation shocks.
//! - `Cost` is the expected maximal value being *minimized*.
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases and constants; correctness is
//!   exercised by the optimizer tests that instantiate them.
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;

/// Perturbation vector `(μ₀, μ₁, σ₀, σ₁)`.
pub type Theta = Array1<f64>;

/// Scalar objective value (an expected maximal value).
pub type Cost = f64;

/// Number of free parameters in an ambiguity perturbation.
pub const NUM_PERTURBATION_PARAMS: usize = 4;

/// Bisection steps used when projecting onto the divergence ball.
pub const PROJECTION_STEPS: usize = 60;

/// Nelder–Mead specialized to this crate's numeric types.
pub type NelderMeadSolver = NelderMead<Theta, Cost>;
