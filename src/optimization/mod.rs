//! optimization — worst-case search, covariance numerics, and error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used by the ambiguity-robust EMAX: an
//! Argmin-backed minimizer over a divergence ball, the covariance and
//! divergence primitives it needs, and a single error/result surface.
//! Callers implement a criterion, choose options, and obtain the worst-case
//! perturbation without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing a criterion over an ambiguity
//!   set** (`ambiguity`), including the fixed exit-code enumeration used in
//!   diagnostics reports.
//! - Supply shared numerical primitives (`numerical_stability`) for moving
//!   between covariance and correlation form, factorizing singular
//!   covariances, and evaluating Gaussian KL divergences.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizer non-convergence is an *outcome*, not an error; only invalid
//!   configuration, criterion failures and unknown exit codes are reported
//!   as `OptError`.
//! - Inputs are finite once validation has passed; invalid states are
//!   reported as `OptError`, not panics.
//!
//! Conventions
//! -----------
//! - Parameters are `ndarray`-based (`Theta`); `nalgebra` is an internal
//!   detail of the numerical helpers.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - This module and its submodules avoid I/O and logging.
//!
//! Downstream usage
//! ----------------
//! - The model layer implements `AmbiguityCriterion` for the Monte Carlo EMAX
//!   of a state and calls `minimize_worst_case` with `OptimizerOptions`.
//! - The record layer maps `ExitCode`s to report messages.
//!
//! Testing notes
//! -------------
//! - `ambiguity`: solver wiring, projection, and exit-code mapping on toy
//!   criteria with known minimizers.
//! - `numerical_stability`: covariance round trips, PSD Cholesky, KL
//!   identities.
//! - `errors`: conversions from backend errors into `OptError`.

pub mod ambiguity;
pub mod errors;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use dcdp_solver::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::ambiguity::prelude::*;
    pub use super::errors::{OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
}
