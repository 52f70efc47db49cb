//! Public API surface for worst-case (ambiguity-robust) minimization.
//!
//! - [`AmbiguityCriterion`]: trait a model implements to expose its expected
//!   value as a function of a shock-distribution perturbation.
//! - [`OptimizerOptions`]: configuration for the Nelder–Mead search.
//! - [`WorstCaseOutcome`]: normalized result returned by
//!   [`minimize_worst_case`](crate::optimization::ambiguity::minimize_worst_case).
//!
//! Convention: the agent is pessimistic, so we *minimize* the criterion over
//! the divergence ball `{θ : D(θ) ≤ level}` centred at the reference point.
use crate::optimization::{
    ambiguity::{
        exit_code::ExitCode,
        types::{Cost, Theta},
        validation::{verify_max_iter, verify_sd_tolerance, verify_simplex_scale},
    },
    errors::OptResult,
};

/// Model-side interface of the worst-case search.
///
/// Required:
/// - `value(&Theta) -> OptResult<Cost>`: criterion at a perturbation. Only
///   ever called with points inside the divergence ball.
/// - `divergence(&Theta) -> OptResult<f64>`: distance of a perturbation from
///   the reference law. May return `f64::INFINITY` for inadmissible points
///   (e.g. non-positive standard deviations).
/// - `reference() -> &Theta`: the unperturbed point, with divergence zero.
/// - `level() -> f64`: radius of the ambiguity set.
///
/// Optional:
/// - `simplex_steps() -> Theta`: per-coordinate step of the initial simplex.
///   Defaults to ones.
pub trait AmbiguityCriterion {
    fn value(&self, theta: &Theta) -> OptResult<Cost>;
    fn divergence(&self, theta: &Theta) -> OptResult<f64>;
    fn reference(&self) -> &Theta;
    fn level(&self) -> f64;

    fn simplex_steps(&self) -> Theta {
        Theta::ones(self.reference().len())
    }
}

/// Nelder–Mead configuration.
///
/// Fields:
/// - `max_iter` — hard cap on simplex iterations; hitting it yields exit
///   code 9.
/// - `sd_tolerance` — convergence threshold on the standard deviation of the
///   simplex costs.
/// - `simplex_scale` — multiplier applied to the criterion's
///   `simplex_steps` when building the initial simplex.
///
/// Default: `max_iter = 200`, `sd_tolerance = 1e-8`, `simplex_scale = 0.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerOptions {
    pub max_iter: usize,
    pub sd_tolerance: f64,
    pub simplex_scale: f64,
}

impl OptimizerOptions {
    /// Construct validated optimizer options.
    ///
    /// # Errors
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    /// - `OptError::InvalidSdTolerance` / `OptError::InvalidSimplexScale`
    ///   for non-finite or non-positive values.
    pub fn new(max_iter: usize, sd_tolerance: f64, simplex_scale: f64) -> OptResult<Self> {
        verify_max_iter(max_iter)?;
        verify_sd_tolerance(sd_tolerance)?;
        verify_simplex_scale(simplex_scale)?;
        Ok(Self { max_iter, sd_tolerance, simplex_scale })
    }
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self { max_iter: 200, sd_tolerance: 1e-8, simplex_scale: 0.1 }
    }
}

/// Canonical result of one worst-case search.
///
/// - `theta_hat`: best admissible perturbation (projected onto the ball).
/// - `value`: criterion at `theta_hat`.
/// - `divergence`: divergence of `theta_hat` from the reference.
/// - `exit_code`: solver status; see [`ExitCode`].
/// - `success`: `exit_code.is_success()`.
/// - `iterations`: simplex iterations performed.
#[derive(Debug, Clone, PartialEq)]
pub struct WorstCaseOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub divergence: f64,
    pub exit_code: ExitCode,
    pub success: bool,
    pub iterations: usize,
}

impl WorstCaseOutcome {
    pub fn new(
        theta_hat: Theta, value: f64, divergence: f64, exit_code: ExitCode, iterations: usize,
    ) -> Self {
        let success = exit_code.is_success();
        Self { theta_hat, value, divergence, exit_code, success, iterations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;

    #[test]
    // Purpose
    // -------
    // `OptimizerOptions::new` accepts the defaults and rejects a zero
    // iteration cap.
    fn optimizer_options_validate_inputs() {
        let d = OptimizerOptions::default();
        assert_eq!(OptimizerOptions::new(d.max_iter, d.sd_tolerance, d.simplex_scale), Ok(d));
        assert!(matches!(
            OptimizerOptions::new(0, 1e-8, 0.1),
            Err(OptError::InvalidMaxIter { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The success flag of an outcome is derived from its exit code.
    fn outcome_success_follows_exit_code() {
        let theta = Theta::zeros(4);
        let ok = WorstCaseOutcome::new(theta.clone(), 1.0, 0.0, ExitCode::Success, 3);
        let failed = WorstCaseOutcome::new(theta, 1.0, 0.0, ExitCode::IterationLimit, 200);
        assert!(ok.success);
        assert!(!failed.success);
    }
}
