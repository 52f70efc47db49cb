//! Adapter that exposes an [`AmbiguityCriterion`] as an `argmin` problem.
//!
//! Nelder–Mead is unconstrained, so the divergence constraint is enforced by
//! evaluating the criterion at the *projection* of every trial point onto the
//! ball `{θ : D(θ) ≤ level}`. The projection moves along the segment from the
//! reference point (divergence zero) to the trial point and keeps the
//! farthest admissible point, found by bisection. This relies on `D` being
//! convex, so admissibility along the segment is an interval starting at the
//! reference.
use crate::optimization::{
    ambiguity::{
        traits::AmbiguityCriterion,
        types::{Cost, PROJECTION_STEPS, Theta},
    },
    errors::{OptError, OptResult},
};
use argmin::core::{CostFunction, Error};

/// Bridges an [`AmbiguityCriterion`] to `argmin`'s `CostFunction`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: AmbiguityCriterion> {
    pub f: &'a F,
}

impl<'a, F: AmbiguityCriterion> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F) -> Self {
        Self { f }
    }
}

impl<'a, F: AmbiguityCriterion> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the criterion at the projection of `theta` onto the ball.
    ///
    /// # Errors
    /// - `NonFiniteCost` if the criterion is not finite.
    /// - Propagates any `OptError` from the criterion.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(projected_value(self.f, theta)?)
    }
}

/// Criterion value at the projection of `theta` onto the ball.
///
/// # Errors
/// - `NonFiniteCost` if the criterion is not finite.
/// - Propagates projection and criterion errors.
pub fn projected_value<F: AmbiguityCriterion>(f: &F, theta: &Theta) -> OptResult<Cost> {
    let admissible = project_onto_ball(f, theta)?;
    let value = f.value(&admissible)?;
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(value)
}

/// Project `theta` onto the divergence ball of `f`.
///
/// Returns `theta` unchanged when it is already admissible, otherwise the
/// admissible point on the segment `[reference, theta]` closest to `theta`
/// (to within `2^-PROJECTION_STEPS` of the segment length).
///
/// # Errors
/// - `ThetaLengthMismatch` if `theta` and the reference disagree in length.
/// - Propagates divergence evaluation errors.
pub fn project_onto_ball<F: AmbiguityCriterion>(f: &F, theta: &Theta) -> OptResult<Theta> {
    let reference = f.reference();
    if theta.len() != reference.len() {
        return Err(OptError::ThetaLengthMismatch {
            expected: reference.len(),
            actual: theta.len(),
        });
    }
    let level = f.level();
    if f.divergence(theta)? <= level {
        return Ok(theta.clone());
    }

    let direction = theta - reference;
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..PROJECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        let candidate = reference + &(&direction * mid);
        if f.divergence(&candidate)? <= level {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(reference + &(&direction * lo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Projection onto a Euclidean ball (closed form available).
    // - The adapter evaluating the criterion at projected points only.
    // -------------------------------------------------------------------------

    /// Linear criterion `θ₀ + θ₁` with squared-Euclidean divergence.
    struct Disk {
        reference: Theta,
        level: f64,
    }

    impl AmbiguityCriterion for Disk {
        fn value(&self, theta: &Theta) -> OptResult<Cost> {
            Ok(theta.sum())
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
    // Points inside the ball are untouched; points outside land on the
    // boundary along the ray from the reference.
    //
    // Given
    // -----
    // - Reference (1, 1), level 1 (unit disk around (1, 1)).
    //
    // Expect
    // ------
    // - (1.5, 1) stays put.
    // - (4, 1) is mapped to (2, 1).
    fn projection_matches_closed_form_on_disk() {
        let f = Disk { reference: array![1.0, 1.0], level: 1.0 };

        let inside = project_onto_ball(&f, &array![1.5, 1.0]).unwrap();
        let outside = project_onto_ball(&f, &array![4.0, 1.0]).unwrap();

        assert_eq!(inside, array![1.5, 1.0]);
        assert_relative_eq!(outside[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(outside[1], 1.0, epsilon = 1e-12);
        assert!(f.divergence(&outside).unwrap() <= 1.0);
    }

    #[test]
    // Purpose
    // -------
    // The cost seen by argmin is the criterion at the projected point, and
    // length mismatches surface as errors.
    fn adapter_cost_uses_projection() {
        let f = Disk { reference: array![0.0, 0.0], level: 1.0 };
        let adapter = ArgMinAdapter::new(&f);

        let cost = adapter.cost(&array![-3.0, 0.0]).unwrap();

        assert_relative_eq!(cost, -1.0, epsilon = 1e-12);
        assert!(matches!(
            project_onto_ball(&f, &array![0.0]),
            Err(OptError::ThetaLengthMismatch { expected: 2, actual: 1 })
        ));
    }
}
