//! ambiguity — worst-case search over shock-distribution perturbations.
//!
//! Purpose
//! -------
//! Minimize a model criterion (an expected maximal value) over all
//! perturbations of the reference shock law whose divergence from it stays
//! within a configured level, and report the result together with a fixed
//! exit-code enumeration.
//!
//! Key behaviors
//! -------------
//! - [`AmbiguityCriterion`] is the model-side seam: value, divergence,
//!   reference point and level.
//! - [`minimize_worst_case`] runs Argmin's Nelder–Mead on the criterion
//!   evaluated at projections onto the divergence ball.
//! - [`ExitCode`] enumerates solver outcomes; unknown codes refuse to produce
//!   a report message.
//!
//! Invariants & assumptions
//! ------------------------
//! - The divergence is zero at the reference point and convex, so the ray
//!   projection in [`adapter`] is well defined.
//! - Non-convergence never raises; it is reported through [`ExitCode`].
//!
//! Conventions
//! -----------
//! - Parameters are `ndarray::Array1<f64>` ([`Theta`]); costs are `f64`.
//! - All errors are [`OptError`](crate::optimization::errors::OptError).
//!
//! Downstream usage
//! ----------------
//! - The backward-induction engine implements [`AmbiguityCriterion`] for the
//!   Monte Carlo EMAX of one state and calls [`minimize_worst_case`].
//! - The diagnostics writer maps exit codes to messages via
//!   [`ExitCode::message`].
//!
//! Testing notes
//! -------------
//! - Toy criteria with closed-form minimizers live in the unit tests of
//!   [`adapter`] and [`api`].
pub mod adapter;
pub mod api;
pub mod builders;
pub mod exit_code;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize_worst_case;
pub use self::exit_code::{ExitCode, get_message};
pub use self::traits::{AmbiguityCriterion, OptimizerOptions, WorstCaseOutcome};
pub use self::types::{Cost, NUM_PERTURBATION_PARAMS, Theta};

pub mod prelude {
    pub use super::{
        AmbiguityCriterion, ExitCode, OptimizerOptions, WorstCaseOutcome, minimize_worst_case,
    };
}
