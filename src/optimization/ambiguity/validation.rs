//! Validation helpers for the worst-case optimizer.
//!
//! - **Option checks**: [`verify_max_iter`], [`verify_sd_tolerance`],
//!   [`verify_simplex_scale`], [`verify_level`] reject non-finite or
//!   out-of-range configuration before any solver is built.
//! - **Outcome checks**: [`validate_theta_hat`] and [`validate_value`] make
//!   sure a finished run produced usable numbers.
use crate::optimization::{
    ambiguity::types::Theta,
    errors::{OptError, OptResult},
};

/// Maximum iterations must be strictly positive.
pub fn verify_max_iter(max_iter: usize) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Simplex standard-deviation tolerance must be finite and strictly positive.
pub fn verify_sd_tolerance(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Initial simplex scale must be finite and strictly positive.
pub fn verify_simplex_scale(scale: f64) -> OptResult<()> {
    if !scale.is_finite() {
        return Err(OptError::InvalidSimplexScale { scale, reason: "Scale must be finite." });
    }
    if scale <= 0.0 {
        return Err(OptError::InvalidSimplexScale { scale, reason: "Scale must be positive." });
    }
    Ok(())
}

/// Ambiguity level must be finite and non-negative.
pub fn verify_level(level: f64) -> OptResult<()> {
    if !level.is_finite() {
        return Err(OptError::InvalidLevel { level, reason: "Level must be finite." });
    }
    if level < 0.0 {
        return Err(OptError::InvalidLevel { level, reason: "Level must be non-negative." });
    }
    Ok(())
}

/// Validate and unwrap the best parameter vector reported by the solver.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] when the solver reported nothing.
/// - [`OptError::InvalidThetaHat`] on the first non-finite entry.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta_hat = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, &value)) = theta_hat.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Best parameters must be finite.",
        });
    }
    Ok(theta_hat)
}

/// Objective values must be finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
