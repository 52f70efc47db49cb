//! Shock draws — seeded Monte Carlo disturbances and their transformation.
//!
//! Purpose
//! -------
//! Produce the per-period standard-normal draws used to integrate the EMAX,
//! and map them into realized shocks for a given mean and Cholesky factor.
//!
//! Key behaviors
//! -------------
//! - [`create_draws`] fills one `num_draws × 4` block per period from a
//!   `SmallRng` seeded once, so a seed fully determines the solution.
//! - [`transform_disturbances`] computes `z Lᵀ + μ` row by row and
//!   exponentiates the two occupation columns (wages are log-normal),
//!   clipping them to `HUGE_FLOAT`.
//! - [`is_deterministic`] detects the all-zero Cholesky factor of a model
//!   without shocks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Draw blocks are read-only once created and shared by every state and
//!   every optimizer evaluation of a period.
use crate::model::{
    core::constants::{HUGE_FLOAT, NUM_ALTERNATIVES, OCCUPATION_A, OCCUPATION_B},
    errors::{ModelError, ModelResult},
};
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis};
use rand::{SeedableRng, distributions::Distribution, rngs::SmallRng};
use statrs::distribution::Normal;

/// Standard-normal draws, one `num_draws × 4` block per period.
#[derive(Debug, Clone, PartialEq)]
pub struct ShockDraws {
    periods: Vec<Array2<f64>>,
}

impl ShockDraws {
    /// Wrap externally generated draws of shape
    /// `(num_periods, num_draws, 4)`.
    ///
    /// # Errors
    /// - [`ModelError::DrawsShapeMismatch`] if the trailing axis is not 4 or
    ///   there are no draws.
    pub fn from_array(draws: Array3<f64>) -> ModelResult<Self> {
        let (num_periods, num_draws, width) = draws.dim();
        if width != NUM_ALTERNATIVES || num_draws == 0 {
            return Err(ModelError::DrawsShapeMismatch {
                expected: (num_periods, num_draws.max(1), NUM_ALTERNATIVES),
                found: (num_periods, num_draws, width),
            });
        }
        let periods = draws.axis_iter(Axis(0)).map(|block| block.to_owned()).collect();
        Ok(Self { periods })
    }

    pub fn num_periods(&self) -> usize {
        self.periods.len()
    }

    pub fn num_draws(&self) -> usize {
        self.periods.first().map_or(0, |block| block.nrows())
    }

    /// Draws of `period`.
    pub fn period(&self, period: usize) -> ArrayView2<'_, f64> {
        self.periods[period].view()
    }
}

/// Generate seeded standard-normal draws.
///
/// # Errors
/// - [`ModelError::InvalidNumDraws`] for zero draws.
pub fn create_draws(num_periods: usize, num_draws: usize, seed: u64) -> ModelResult<ShockDraws> {
    if num_draws == 0 {
        return Err(ModelError::InvalidNumDraws { num_draws });
    }
    let normal = Normal::new(0.0, 1.0)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let periods = (0..num_periods)
        .map(|_| Array2::from_shape_simple_fn((num_draws, NUM_ALTERNATIVES), || normal.sample(&mut rng)))
        .collect();
    Ok(ShockDraws { periods })
}

/// Map standard-normal draws into realized shocks.
///
/// Row `i` becomes `L z_i + μ`; the occupation columns are then
/// exponentiated and clipped to `[0, HUGE_FLOAT]`.
///
/// # Parameters
/// - `draws`: `num_draws × 4` standard normals.
/// - `mean`: length-4 shift applied before exponentiation.
/// - `cholesky`: 4×4 lower-triangular factor.
pub fn transform_disturbances(
    draws: ArrayView2<f64>, mean: ArrayView1<f64>, cholesky: ArrayView2<f64>,
) -> Array2<f64> {
    let mut shocks = draws.dot(&cholesky.t());
    shocks += &mean;
    for mut row in shocks.rows_mut() {
        for j in [OCCUPATION_A, OCCUPATION_B] {
            row[j] = row[j].exp().clamp(0.0, HUGE_FLOAT);
        }
    }
    shocks
}

/// A model without shocks has an all-zero Cholesky factor.
pub fn is_deterministic(cholesky: ArrayView2<f64>) -> bool {
    cholesky.iter().all(|&v| v == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    #[test]
    // Purpose
    // -------
    // The same seed reproduces the same draws; different seeds differ.
    fn draws_are_reproducible() {
        let a = create_draws(3, 50, 42).unwrap();
        let b = create_draws(3, 50, 42).unwrap();
        let c = create_draws(3, 50, 43).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.period(2).dim(), (50, 4));
        assert_eq!(a.num_draws(), 50);
    }

    #[test]
    // Purpose
    // -------
    // Sample moments of a large block are close to standard normal.
    fn draws_have_standard_normal_moments() {
        let draws = create_draws(1, 20_000, 7).unwrap();
        let block = draws.period(0);

        let mean = block.mean().unwrap();
        let var = block.mapv(|v| v * v).mean().unwrap() - mean * mean;

        assert!(mean.abs() < 0.03, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "var {var}");
    }

    #[test]
    // Purpose
    // -------
    // With a zero factor the shocks equal the (exponentiated) mean: occupation
    // columns become exp(μ), the others μ.
    fn transform_with_zero_factor_returns_mean() {
        let draws = create_draws(1, 3, 1).unwrap();
        let mean = array![0.5, -0.5, 1.0, 2.0];
        let zero = Array2::<f64>::zeros((4, 4));

        let shocks = transform_disturbances(draws.period(0), mean.view(), zero.view());

        for row in shocks.rows() {
            assert_relative_eq!(row[0], 0.5_f64.exp());
            assert_relative_eq!(row[1], (-0.5_f64).exp());
            assert_eq!(row[2], 1.0);
            assert_eq!(row[3], 2.0);
        }
        assert!(is_deterministic(zero.view()));
    }

    #[test]
    // Purpose
    // -------
    // A diagonal factor scales each column and leaves additive columns
    // un-exponentiated.
    fn transform_scales_by_cholesky() {
        let draws = array![[1.0, 1.0, 1.0, 1.0]];
        let chol = Array2::from_diag(&array![0.1, 0.2, 3.0, 4.0]);
        let zero = Array1::<f64>::zeros(4);

        let shocks = transform_disturbances(draws.view(), zero.view(), chol.view());

        assert_relative_eq!(shocks[[0, 0]], 0.1_f64.exp());
        assert_relative_eq!(shocks[[0, 1]], 0.2_f64.exp());
        assert_relative_eq!(shocks[[0, 2]], 3.0);
        assert_relative_eq!(shocks[[0, 3]], 4.0);
        assert!(!is_deterministic(chol.view()));
    }

    #[test]
    // Purpose
    // -------
    // External draws must have four columns and at least one row.
    fn external_draws_are_validated() {
        assert!(ShockDraws::from_array(Array3::zeros((2, 5, 4))).is_ok());
        assert!(ShockDraws::from_array(Array3::zeros((2, 5, 3))).is_err());
        assert!(ShockDraws::from_array(Array3::zeros((2, 0, 4))).is_err());
        assert!(create_draws(2, 0, 1).is_err());
    }
}
