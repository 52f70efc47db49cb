//! High-level entry point for the worst-case search.
//!
//! Wraps a user [`AmbiguityCriterion`] in an [`ArgMinAdapter`], builds the
//! Nelder–Mead simplex around the reference point, runs it and projects the
//! best vertex back onto the divergence ball.
use crate::optimization::{
    ambiguity::{
        adapter::{ArgMinAdapter, project_onto_ball, projected_value},
        builders::{build_nelder_mead, build_simplex},
        exit_code::ExitCode,
        run::run_nelder_mead,
        traits::{AmbiguityCriterion, OptimizerOptions, WorstCaseOutcome},
        validation::{validate_value, verify_level},
    },
    errors::OptResult,
    numerical_stability::GENERAL_TOL,
};

/// Minimize `f` over `{θ : D(θ) ≤ level}`.
///
/// # Behavior
/// - `level == 0` collapses the set to the reference point: the criterion is
///   evaluated there and reported as [`ExitCode::Success`] without iterating.
/// - Otherwise Nelder–Mead runs on the projected criterion. The best vertex
///   is projected, re-evaluated and its divergence recorded.
/// - If the final divergence still exceeds `level + GENERAL_TOL` the outcome
///   is flagged [`ExitCode::IncompatibleConstraints`]; the iterate is kept.
///
/// Non-convergence is not an error: it is returned as an unsuccessful
/// outcome.
///
/// # Errors
/// - `InvalidLevel` for a negative or non-finite level.
/// - Builder errors (simplex length, tolerance).
/// - Errors raised by the criterion at a starting vertex or during the run.
pub fn minimize_worst_case<F: AmbiguityCriterion>(
    f: &F, opts: &OptimizerOptions,
) -> OptResult<WorstCaseOutcome> {
    let level = f.level();
    verify_level(level)?;
    let reference = f.reference();

    if level == 0.0 {
        let value = f.value(reference)?;
        validate_value(value)?;
        return Ok(WorstCaseOutcome::new(reference.clone(), value, 0.0, ExitCode::Success, 0));
    }

    // argmin's Nelder–Mead unwraps the cost of the starting vertices.
    let simplex = build_simplex(reference, &f.simplex_steps(), opts.simplex_scale)?;
    for vertex in &simplex {
        projected_value(f, vertex)?;
    }
    let solver = build_nelder_mead(simplex, opts)?;
    let raw = run_nelder_mead(ArgMinAdapter::new(f), solver, opts)?;

    let theta_hat = project_onto_ball(f, &raw.theta_best)?;
    let value = f.value(&theta_hat)?;
    validate_value(value)?;
    let divergence = f.divergence(&theta_hat)?;

    let exit_code = if divergence > level + GENERAL_TOL {
        ExitCode::IncompatibleConstraints
    } else {
        raw.exit_code
    };
    Ok(WorstCaseOutcome::new(theta_hat, value, divergence, exit_code, raw.iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{ambiguity::types::{Cost, Theta}, errors::OptError};
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - A linear criterion over a Euclidean ball, whose minimizer is known.
    // - The level-zero shortcut.
    // - Iteration-limit exhaustion reported as exit code 9, not as an error.
    // - Criterion errors propagating out of the run.
    // -------------------------------------------------------------------------

    struct LinearOnDisk {
        reference: Theta,
        level: f64,
        fail: bool,
    }

    impl AmbiguityCriterion for LinearOnDisk {
        fn value(&self, theta: &Theta) -> OptResult<Cost> {
            if self.fail {
                return Err(OptError::NonFiniteCost { value: f64::NAN });
            }
            Ok(theta[0] + theta[1])
        }
        fn divergence(&self, theta: &Theta) -> OptResult<f64> {
            Ok((theta - &self.reference).mapv(|v| v * v).sum())
        }
        fn reference(&self) -> &Theta {
            &self.reference
        }
        fn level(&self) -> f64 {
            self.level
        }
    }

    #[test]
    // Purpose
    // -------
    // Minimizing θ₀ + θ₁ over the disk of squared radius 0.5 around the
    // origin reaches the boundary point (-0.5, -0.5).
    //
    // Expect
    // ------
    // - Success, value ≈ -1, divergence ≈ level and never above it.
    fn linear_criterion_reaches_boundary_minimum() {
        // Arrange
        let f = LinearOnDisk { reference: array![0.0, 0.0], level: 0.5, fail: false };
        let opts = OptimizerOptions::new(2000, 1e-10, 0.1).unwrap();

        // Act
        let out = minimize_worst_case(&f, &opts).unwrap();

        // Assert
        assert!(out.success, "exit code {:?}", out.exit_code);
        assert_relative_eq!(out.value, -1.0, epsilon = 1e-3);
        assert_relative_eq!(out.theta_hat[0], -0.5, epsilon = 5e-2);
        assert!(out.divergence <= 0.5 + GENERAL_TOL);
    }

    #[test]
    // Purpose
    // -------
    // A zero level pins the search to the reference point.
    fn zero_level_returns_reference() {
        let f = LinearOnDisk { reference: array![0.3, 0.2], level: 0.0, fail: false };

        let out = minimize_worst_case(&f, &OptimizerOptions::default()).unwrap();

        assert_eq!(out.theta_hat, array![0.3, 0.2]);
        assert_relative_eq!(out.value, 0.5);
        assert_eq!(out.exit_code, ExitCode::Success);
        assert_eq!(out.iterations, 0);
    }

    #[test]
    // Purpose
    // -------
    // Running out of iterations degrades to a best-effort, unsuccessful
    // outcome instead of failing.
    fn iteration_cap_is_not_an_error() {
        let f = LinearOnDisk { reference: array![0.0, 0.0], level: 0.5, fail: false };
        let opts = OptimizerOptions::new(1, 1e-14, 0.1).unwrap();

        let out = minimize_worst_case(&f, &opts).unwrap();

        assert_eq!(out.exit_code, ExitCode::IterationLimit);
        assert!(!out.success);
        assert!(out.divergence <= 0.5 + GENERAL_TOL);
    }

    #[test]
    // Purpose
    // -------
    // Errors from the criterion at the starting simplex are returned, not
    // raised as panics, and an invalid level is rejected up front.
    fn criterion_errors_propagate() {
        let failing = LinearOnDisk { reference: array![0.0, 0.0], level: 0.5, fail: true };
        let negative = LinearOnDisk { reference: array![0.0, 0.0], level: -1.0, fail: false };

        let outcome = std::panic::catch_unwind(|| {
            minimize_worst_case(&failing, &OptimizerOptions::default())
        });

        assert!(matches!(outcome, Ok(Err(OptError::NonFiniteCost { .. }))));
        assert!(matches!(
            minimize_worst_case(&negative, &OptimizerOptions::default()),
            Err(OptError::InvalidLevel { .. })
        ));
    }
}
