//! Numerical stability utilities for shock covariance handling.
//!
//! Provides guarded implementations of the covariance manipulations used by
//! the ambiguity layer: moving between covariance and correlation form,
//! factorizing positive *semi*-definite matrices, and evaluating the
//! Kullback–Leibler divergence between two Gaussian laws.
//!
//! # Provided items
//! - [`PIVOT_EPS`]: threshold below which a variance or Cholesky pivot is
//!   treated as exactly zero.
//! - [`GENERAL_TOL`]: generic absolute tolerance for feasibility checks.
//! - [`covariance_to_correlation`] / [`correlation_to_covariance`]: the
//!   round trip used to hold correlations fixed while standard deviations
//!   move.
//! - [`cholesky_psd`]: lower-triangular factor that tolerates zero-variance
//!   dimensions.
//! - [`kl_divergence`]: `KL(N(μ₁, Σ₁) ‖ N(μ₀, Σ₀))`.
//!
//! # Rationale
//! Shock covariances in structural models are frequently singular (a
//! deterministic dimension, or the all-zero covariance of a model without
//! shocks). The naïve formulas divide by zero on those inputs; the versions
//! here degrade to well-defined limits instead.
use crate::optimization::errors::{OptError, OptResult};
use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Variances and Cholesky pivots at or below this value are treated as zero.
pub const PIVOT_EPS: f64 = 1e-12;

/// Generic absolute tolerance for feasibility comparisons.
pub const GENERAL_TOL: f64 = 1e-10;

/// Convert a covariance matrix into its correlation matrix.
///
/// Dimensions with (numerically) zero variance get a unit diagonal and zero
/// off-diagonal entries, so the result is always a valid correlation matrix
/// for the non-degenerate block.
///
/// # Parameters
/// - `cov`: square, symmetric covariance matrix.
///
/// # Returns
/// - Correlation matrix with the same shape as `cov`.
pub fn covariance_to_correlation(cov: ArrayView2<f64>) -> Array2<f64> {
    let n = cov.nrows();
    let sd: Vec<f64> = (0..n).map(|i| cov[[i, i]].max(0.0).sqrt()).collect();
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            1.0
        } else if sd[i] > PIVOT_EPS && sd[j] > PIVOT_EPS {
            cov[[i, j]] / (sd[i] * sd[j])
        } else {
            0.0
        }
    })
}

/// Rebuild a covariance matrix from a correlation matrix and standard deviations.
///
/// Computes `Σ_ij = ρ_ij · σ_i · σ_j`.
///
/// # Parameters
/// - `corr`: square correlation matrix.
/// - `sd`: standard deviations, one per row of `corr`.
pub fn correlation_to_covariance(corr: ArrayView2<f64>, sd: ArrayView1<f64>) -> Array2<f64> {
    let n = corr.nrows();
    Array2::from_shape_fn((n, n), |(i, j)| corr[[i, j]] * sd[i] * sd[j])
}

/// Lower-triangular Cholesky factor of a positive semi-definite matrix.
///
/// Standard column-by-column Cholesky, except that a pivot at or below
/// [`PIVOT_EPS`] zeroes the whole column instead of failing. For a positive
/// definite input this coincides with the textbook factor; for a singular
/// input `L Lᵀ` still reproduces the matrix on its support.
pub fn cholesky_psd(cov: ArrayView2<f64>) -> Array2<f64> {
    let n = cov.nrows();
    let mut chol = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut pivot = cov[[j, j]];
        for k in 0..j {
            pivot -= chol[[j, k]] * chol[[j, k]];
        }
        if pivot <= PIVOT_EPS {
            continue;
        }
        let diag = pivot.sqrt();
        chol[[j, j]] = diag;
        for i in (j + 1)..n {
            let mut value = cov[[i, j]];
            for k in 0..j {
                value -= chol[[i, k]] * chol[[j, k]];
            }
            chol[[i, j]] = value / diag;
        }
    }
    chol
}

/// Kullback–Leibler divergence of a perturbed Gaussian from a reference one.
///
/// Evaluates
/// `½ [tr(Σ₀⁻¹Σ₁) + (μ₀ − μ₁)ᵀΣ₀⁻¹(μ₀ − μ₁) − k + ln(det Σ₀ / det Σ₁)]`
/// where index 0 is the reference and index 1 the perturbed law.
///
/// # Returns
/// - `Ok(kl)` with `kl ≥ 0` (up to rounding).
/// - `Ok(f64::INFINITY)` when `Σ₁` is not positive definite; such a law is
///   infinitely far from any non-degenerate reference.
///
/// # Errors
/// - [`OptError::CovarianceDimMismatch`] when shapes disagree.
/// - [`OptError::SingularReferenceCovariance`] when `Σ₀` cannot be inverted.
pub fn kl_divergence(
    mean_old: ArrayView1<f64>, cov_old: ArrayView2<f64>, mean_new: ArrayView1<f64>,
    cov_new: ArrayView2<f64>,
) -> OptResult<f64> {
    let k = mean_old.len();
    for (rows, cols) in [cov_old.dim(), cov_new.dim()] {
        if rows != k || cols != k || mean_new.len() != k {
            return Err(OptError::CovarianceDimMismatch { expected: k, found: (rows, cols) });
        }
    }
    let old = to_dmatrix(cov_old);
    let new = to_dmatrix(cov_new);
    let det_old = old.determinant();
    if det_old <= PIVOT_EPS {
        return Err(OptError::SingularReferenceCovariance { determinant: det_old });
    }
    let det_new = new.determinant();
    if det_new <= 0.0 || !det_new.is_finite() {
        return Ok(f64::INFINITY);
    }
    let old_inv = old
        .try_inverse()
        .ok_or(OptError::SingularReferenceCovariance { determinant: det_old })?;

    let trace = (&old_inv * &new).trace();
    let diff = DMatrix::from_iterator(k, 1, mean_old.iter().zip(mean_new.iter()).map(|(a, b)| a - b));
    let quad = (diff.transpose() * &old_inv * &diff)[(0, 0)];
    let log_det = (det_old / det_new).ln();

    Ok(0.5 * (trace + quad - k as f64 + log_det))
}

// ---- Helper methods ----

fn to_dmatrix(m: ArrayView2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[[i, j]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The covariance → correlation → covariance round trip.
    // - Cholesky factorization of PD and singular matrices.
    // - Basic properties of the Gaussian KL divergence.
    // -------------------------------------------------------------------------

    fn pd_covariance() -> Array2<f64> {
        array![
            [0.40, 0.05, 0.02, 0.00],
            [0.05, 0.30, 0.01, 0.03],
            [0.02, 0.01, 1.50, 0.20],
            [0.00, 0.03, 0.20, 2.00],
        ]
    }

    #[test]
    // Purpose
    // -------
    // Check that covariance → correlation → covariance is the identity for a
    // positive definite 4×4 matrix.
    //
    // Expect
    // ------
    // - Every entry is recovered to 1e-12.
    fn covariance_round_trip_is_identity() {
        let cov = pd_covariance();
        let corr = covariance_to_correlation(cov.view());
        let sd: Array1<f64> = cov.diag().mapv(f64::sqrt);

        let back = correlation_to_covariance(corr.view(), sd.view());

        for ((i, j), &v) in cov.indexed_iter() {
            assert_relative_eq!(back[[i, j]], v, epsilon = 1e-12);
        }
        for i in 0..4 {
            assert_relative_eq!(corr[[i, i]], 1.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Zero-variance dimensions must not produce NaNs in the correlation.
    fn correlation_of_degenerate_dimension_is_finite() {
        let cov = array![[1.0, 0.0], [0.0, 0.0]];
        let corr = covariance_to_correlation(cov.view());
        assert_eq!(corr, array![[1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    // Purpose
    // -------
    // The PSD Cholesky factor reproduces a PD matrix and is lower triangular.
    fn cholesky_reproduces_positive_definite_matrix() {
        let cov = pd_covariance();
        let chol = cholesky_psd(cov.view());
        let rebuilt = chol.dot(&chol.t());

        for ((i, j), &v) in cov.indexed_iter() {
            assert_relative_eq!(rebuilt[[i, j]], v, epsilon = 1e-12);
            if j > i {
                assert_eq!(chol[[i, j]], 0.0);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A zero matrix factorizes to zero instead of failing.
    fn cholesky_of_zero_matrix_is_zero() {
        let chol = cholesky_psd(Array2::<f64>::zeros((4, 4)).view());
        assert!(chol.iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // KL of a law from itself is zero; shifting the mean makes it positive.
    fn kl_divergence_basic_properties() {
        let cov = array![[0.5, 0.1], [0.1, 0.8]];
        let zero = array![0.0, 0.0];
        let shifted = array![0.3, -0.1];

        let same = kl_divergence(zero.view(), cov.view(), zero.view(), cov.view()).unwrap();
        let moved = kl_divergence(zero.view(), cov.view(), shifted.view(), cov.view()).unwrap();

        assert_relative_eq!(same, 0.0, epsilon = 1e-12);
        assert!(moved > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Univariate check against the closed form
    // ½[(σ₁/σ₀)² + (μ₁−μ₀)²/σ₀² − 1 + 2 ln(σ₀/σ₁)].
    fn kl_divergence_matches_univariate_closed_form() {
        let (s0, s1, m1): (f64, f64, f64) = (1.2, 0.7, 0.4);
        let expected = 0.5 * ((s1 / s0).powi(2) + m1 * m1 / (s0 * s0) - 1.0 + 2.0 * (s0 / s1).ln());

        let kl = kl_divergence(
            array![0.0].view(),
            array![[s0 * s0]].view(),
            array![m1].view(),
            array![[s1 * s1]].view(),
        )
        .unwrap();

        assert_relative_eq!(kl, expected, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Degenerate perturbed laws are infinitely far away; degenerate
    // references are an error.
    fn kl_divergence_degenerate_inputs() {
        let cov = array![[1.0, 0.0], [0.0, 1.0]];
        let zero_cov = Array2::<f64>::zeros((2, 2));
        let zero = array![0.0, 0.0];

        let inf = kl_divergence(zero.view(), cov.view(), zero.view(), zero_cov.view()).unwrap();
        let err = kl_divergence(zero.view(), zero_cov.view(), zero.view(), cov.view());

        assert!(inf.is_infinite());
        assert!(matches!(err, Err(OptError::SingularReferenceCovariance { .. })));
    }
}
