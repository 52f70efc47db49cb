//! numerical_stability — guarded covariance transforms and divergences.
//!
//! Purpose
//! -------
//! Collect the small dense linear-algebra routines the ambiguity layer needs
//! to perturb a Gaussian shock distribution while keeping its correlation
//! structure fixed, and to measure how far a perturbation has moved.
//!
//! Key behaviors
//! -------------
//! - Convert between covariance and correlation form
//!   (`covariance_to_correlation`, `correlation_to_covariance`).
//! - Factorize positive semi-definite covariances (`cholesky_psd`) without
//!   failing on zero-variance dimensions.
//! - Evaluate the Gaussian Kullback–Leibler divergence (`kl_divergence`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite and symmetric; validation of user-facing matrices
//!   (shape, lower-triangularity of Cholesky factors) happens in the model
//!   layer.
//! - Zero-variance handling is governed by the shared [`PIVOT_EPS`].
//!
//! Conventions
//! -----------
//! - Matrices are `ndarray` types at the public boundary; `nalgebra` is used
//!   internally for determinants and inverses.
//! - Pure functions: no I/O, no logging, no global state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover the covariance round trip on a
//!   positive definite 4×4 matrix, Cholesky reconstruction, the all-zero
//!   edge case, and KL identities.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    GENERAL_TOL, PIVOT_EPS, cholesky_psd, correlation_to_covariance, covariance_to_correlation,
    kl_divergence,
};

pub mod prelude {
    pub use super::transformations::{
        cholesky_psd, correlation_to_covariance, covariance_to_correlation, kl_divergence,
    };
}
