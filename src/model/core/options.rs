//! Model options — specification of the structural model and of its solve.
//!
//! Purpose
//! -------
//! Collect every configuration knob of a solve in validated carriers, so the
//! engine receives explicit values instead of ad-hoc flags.
//!
//! Key behaviors
//! -------------
//! - [`ModelSpec`] describes the economic model: horizon, schooling bounds,
//!   discount factor, reward coefficients, shock Cholesky factor, and a lock
//!   flag that pre-solve checks require.
//! - [`SolveOptions`] describes the numerical treatment: Monte Carlo draws,
//!   seed, optional ambiguity and optional interpolation.
//! - [`AmbiguityOptions`] / [`AmbiguityMeasure`] select the robust EMAX and
//!   its optimizer; [`InterpolationOptions`] selects the EMAX approximation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every constructor validates its inputs and never panics; `Default`
//!   impls produce valid values.
//! - The shock Cholesky factor is 4×4, lower triangular and finite.
//!
//! Conventions
//! -----------
//! - `delta == 0` means agents are myopic.
//! - A locked spec is immutable by convention: locking consumes the value.
//!
//! Testing notes
//! -------------
//! - Unit tests cover rejection of each invalid input, the derived
//!   `min_idx`, and parsing of measure names.
use crate::{
    model::{
        core::rewards::RewardCoefficients,
        errors::{ModelError, ModelResult},
    },
    optimization::ambiguity::{OptimizerOptions, validation::verify_level},
};
use ndarray::{Array2, ArrayView2};
use std::str::FromStr;

/// ModelSpec — the structural model to be solved.
///
/// Fields are private and read through accessors, so a spec always
/// satisfies the checks of [`ModelSpec::new`], locked or not.
///
/// Fields
/// ------
/// - `num_periods`: horizon, at least 1.
/// - `edu_start` / `edu_max`: schooling at entry and its maximum.
/// - `delta`: discount factor, finite and `>= 0`.
/// - `coeffs`: reward equation coefficients.
/// - `shocks_cholesky`: 4×4 lower-triangular factor of the shock covariance.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    num_periods: usize,
    edu_start: usize,
    edu_max: usize,
    delta: f64,
    coeffs: RewardCoefficients,
    shocks_cholesky: Array2<f64>,
    is_locked: bool,
}

impl ModelSpec {
    /// Construct a validated, unlocked model specification.
    ///
    /// # Errors
    /// - [`ModelError::InvalidNumPeriods`] for a zero horizon.
    /// - [`ModelError::InvalidEducationBounds`] when `edu_start > edu_max`.
    /// - [`ModelError::InvalidDelta`] for a negative or non-finite discount
    ///   factor.
    /// - [`ModelError::InvalidCholeskyShape`] / [`ModelError::InvalidCholeskyEntry`]
    ///   for a malformed Cholesky factor.
    pub fn new(
        num_periods: usize, edu_start: usize, edu_max: usize, delta: f64,
        coeffs: RewardCoefficients, shocks_cholesky: Array2<f64>,
    ) -> ModelResult<Self> {
        if num_periods == 0 {
            return Err(ModelError::InvalidNumPeriods { num_periods });
        }
        if edu_start > edu_max {
            return Err(ModelError::InvalidEducationBounds { edu_start, edu_max });
        }
        if !delta.is_finite() || delta < 0.0 {
            return Err(ModelError::InvalidDelta { delta });
        }
        validate_cholesky(&shocks_cholesky)?;
        Ok(Self { num_periods, edu_start, edu_max, delta, coeffs, shocks_cholesky, is_locked: false })
    }

    /// Mark the specification as final.
    pub fn lock(mut self) -> Self {
        self.is_locked = true;
        self
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn num_periods(&self) -> usize {
        self.num_periods
    }

    pub fn edu_start(&self) -> usize {
        self.edu_start
    }

    pub fn edu_max(&self) -> usize {
        self.edu_max
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn coeffs(&self) -> &RewardCoefficients {
        &self.coeffs
    }

    pub fn shocks_cholesky(&self) -> ArrayView2<'_, f64> {
        self.shocks_cholesky.view()
    }

    pub fn is_myopic(&self) -> bool {
        self.delta == 0.0
    }

    /// Size of the schooling axis of the state index:
    /// `min(num_periods, edu_max - edu_start + 1)`.
    pub fn min_idx(&self) -> usize {
        self.num_periods.min(self.edu_max - self.edu_start + 1)
    }

    /// Shock covariance `L Lᵀ`.
    pub fn shocks_cov(&self) -> Array2<f64> {
        self.shocks_cholesky.dot(&self.shocks_cholesky.t())
    }
}

/// Distance used to bound the ambiguity set.
///
/// Parsing is case-insensitive: `"kl"` and `"absolute"` (or `"abs"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiguityMeasure {
    /// Kullback–Leibler divergence of the occupation shocks.
    Kl,
    /// Mean shift of `-level` on both occupation shocks.
    Absolute,
}

impl FromStr for AmbiguityMeasure {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kl" => Ok(AmbiguityMeasure::Kl),
            "abs" | "absolute" => Ok(AmbiguityMeasure::Absolute),
            _ => Err(ModelError::InvalidAmbiguityMeasure {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'kl' or 'absolute'.",
            }),
        }
    }
}

/// Robust-EMAX configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbiguityOptions {
    pub measure: AmbiguityMeasure,
    /// Radius of the ambiguity set.
    pub level: f64,
    pub optimizer: OptimizerOptions,
}

impl AmbiguityOptions {
    /// # Errors
    /// - `ModelError::Optimization(InvalidLevel)` for a negative or
    ///   non-finite level.
    pub fn new(
        measure: AmbiguityMeasure, level: f64, optimizer: OptimizerOptions,
    ) -> ModelResult<Self> {
        verify_level(level)?;
        Ok(Self { measure, level, optimizer })
    }
}

/// EMAX interpolation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpolationOptions {
    /// States solved exactly per period; interpolation only applies when
    /// this does not exceed the period's state count.
    pub num_points: usize,
    /// Seed for selecting the simulated states.
    pub seed: u64,
}

impl InterpolationOptions {
    /// # Errors
    /// - [`ModelError::InvalidNumPointsInterp`] for zero points.
    pub fn new(num_points: usize, seed: u64) -> ModelResult<Self> {
        if num_points == 0 {
            return Err(ModelError::InvalidNumPointsInterp { num_points });
        }
        Ok(Self { num_points, seed })
    }
}

/// SolveOptions — numerical treatment of the backward induction.
///
/// Default: 500 draws, seed 456, no ambiguity, no interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    pub num_draws_emax: usize,
    pub seed_emax: u64,
    pub ambiguity: Option<AmbiguityOptions>,
    pub interpolation: Option<InterpolationOptions>,
}

impl SolveOptions {
    /// # Errors
    /// - [`ModelError::InvalidNumDraws`] for zero draws.
    pub fn new(
        num_draws_emax: usize, seed_emax: u64, ambiguity: Option<AmbiguityOptions>,
        interpolation: Option<InterpolationOptions>,
    ) -> ModelResult<Self> {
        if num_draws_emax == 0 {
            return Err(ModelError::InvalidNumDraws { num_draws: num_draws_emax });
        }
        Ok(Self { num_draws_emax, seed_emax, ambiguity, interpolation })
    }
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self { num_draws_emax: 500, seed_emax: 456, ambiguity: None, interpolation: None }
    }
}

// ---- Helper methods ----

fn validate_cholesky(chol: &Array2<f64>) -> ModelResult<()> {
    let (rows, cols) = chol.dim();
    if rows != 4 || cols != 4 {
        return Err(ModelError::InvalidCholeskyShape { rows, cols });
    }
    for ((row, col), &value) in chol.indexed_iter() {
        if !value.is_finite() {
            return Err(ModelError::InvalidCholeskyEntry {
                row,
                col,
                value,
                reason: "Entries must be finite.",
            });
        }
        if col > row && value != 0.0 {
            return Err(ModelError::InvalidCholeskyEntry {
                row,
                col,
                value,
                reason: "Factor must be lower triangular.",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation in `ModelSpec::new` and the option constructors.
    // - Derived quantities (`min_idx`, `is_myopic`, `shocks_cov`).
    // - Parsing of `AmbiguityMeasure`.
    // -------------------------------------------------------------------------

    fn coeffs() -> RewardCoefficients {
        RewardCoefficients::new([0.0; 6], [0.0; 6], [0.0; 3], [0.0]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // A valid spec starts unlocked, locks on request, and derives min_idx
    // from the tighter of horizon and schooling range.
    fn spec_lock_and_min_idx() {
        let chol = Array2::<f64>::eye(4);
        let spec = ModelSpec::new(40, 10, 20, 0.95, coeffs(), chol.clone()).unwrap();
        assert!(!spec.is_locked());
        assert_eq!(spec.min_idx(), 11);

        let short = ModelSpec::new(3, 10, 20, 0.0, coeffs(), chol).unwrap().lock();
        assert!(short.is_locked());
        assert!(short.is_myopic());
        assert_eq!(short.min_idx(), 3);
        assert_eq!(short.shocks_cov(), Array2::<f64>::eye(4));
    }

    #[test]
    // Purpose
    // -------
    // Locking keeps the validated values, which stay readable through
    // accessors; equal schooling bounds give a single schooling level.
    fn locked_spec_exposes_validated_values() {
        let chol = Array2::<f64>::eye(4);
        let spec = ModelSpec::new(3, 12, 12, 0.9, coeffs(), chol.clone()).unwrap().lock();

        assert_eq!(
            (spec.num_periods(), spec.edu_start(), spec.edu_max(), spec.delta()),
            (3, 12, 12, 0.9)
        );
        assert_eq!(spec.coeffs(), &coeffs());
        assert_eq!(spec.shocks_cholesky(), chol.view());
        assert_eq!(spec.min_idx(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Each invalid input is rejected with its dedicated variant.
    fn spec_rejects_invalid_inputs() {
        let chol = Array2::<f64>::zeros((4, 4));
        let mut upper = Array2::<f64>::zeros((4, 4));
        upper[[0, 3]] = 0.1;

        assert!(matches!(
            ModelSpec::new(0, 10, 20, 0.9, coeffs(), chol.clone()),
            Err(ModelError::InvalidNumPeriods { .. })
        ));
        assert!(matches!(
            ModelSpec::new(2, 12, 10, 0.9, coeffs(), chol.clone()),
            Err(ModelError::InvalidEducationBounds { .. })
        ));
        assert!(matches!(
            ModelSpec::new(2, 10, 20, -0.1, coeffs(), chol.clone()),
            Err(ModelError::InvalidDelta { .. })
        ));
        assert!(matches!(
            ModelSpec::new(2, 10, 20, 0.9, coeffs(), Array2::zeros((3, 3))),
            Err(ModelError::InvalidCholeskyShape { rows: 3, cols: 3 })
        ));
        assert!(matches!(
            ModelSpec::new(2, 10, 20, 0.9, coeffs(), upper),
            Err(ModelError::InvalidCholeskyEntry { row: 0, col: 3, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Option constructors validate counts and levels; measure names parse
    // case-insensitively.
    fn solve_options_validation_and_parsing() {
        assert!(SolveOptions::new(0, 1, None, None).is_err());
        assert!(InterpolationOptions::new(0, 1).is_err());
        assert!(matches!(
            AmbiguityOptions::new(AmbiguityMeasure::Kl, -0.1, OptimizerOptions::default()),
            Err(ModelError::Optimization(OptError::InvalidLevel { .. }))
        ));
        assert_eq!("KL".parse::<AmbiguityMeasure>(), Ok(AmbiguityMeasure::Kl));
        assert_eq!("Absolute".parse::<AmbiguityMeasure>(), Ok(AmbiguityMeasure::Absolute));
        assert!("wasserstein".parse::<AmbiguityMeasure>().is_err());
        assert_eq!(SolveOptions::default().num_draws_emax, 500);
    }
}
