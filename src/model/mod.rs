//! model — finite-horizon occupational choice model and its solver.
//!
//! Purpose
//! -------
//! Bundle the structural model (state space, rewards, shocks, options), the
//! backward-induction solver and the model-level error surface under one
//! namespace. This is the entry point most callers need.
//!
//! Key behaviors
//! -------------
//! - [`core`]: state enumeration, reward equations, shock draws, validated
//!   configuration, result containers, pre-solve checks and transition
//!   matrices of exogenous processes.
//! - [`solve`]: per-state Monte Carlo EMAX, the ambiguity-robust EMAX,
//!   interpolation, and the period fold; [`solve::solve`] drives them.
//! - [`errors`]: [`ModelError`] / [`ModelResult`], wrapping optimizer errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Per-state arrays are indexed by the state space's dense per-period
//!   index; padded exports fill unused slots with NaN.
//! - Specifications are locked before they are solved.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based. Alternatives are ordered `[A, B, schooling, home]`.
//! - The model layer performs no logging; progress goes through
//!   `record::progress::ProgressRecorder`.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   1. Build [`RewardCoefficients`] and a [`ModelSpec`], then `lock()` it.
//!   2. Choose [`SolveOptions`], optionally with [`AmbiguityOptions`] and
//!      [`InterpolationOptions`].
//!   3. Call [`solve`] with a recorder and read the [`Solution`].
//!   4. With ambiguity enabled, pass `Solution::diagnostics()` to
//!      `record::ambiguity::write_ambiguity_report`.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each submodule; `tests/integration_solve_pipeline.rs`
//!   drives the public surface end to end.

pub mod core;
pub mod errors;
pub mod solve;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    AmbiguityDetails, AmbiguityDiagnostics, AmbiguityMeasure, AmbiguityOptions,
    ContinuationValues, InterpolationOptions, ModelSpec, RewardCoefficients, SolveOptions, State,
    StateDiagnostics, StateSpace, check_process,
};
pub use self::errors::{ModelError, ModelResult};
pub use self::solve::{Solution, solve, solve_with_draws};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use dcdp_solver::model::prelude::*;
//
// to import the everyday model surface in a single line.

pub mod prelude {
    pub use super::{
        AmbiguityDiagnostics, AmbiguityMeasure, AmbiguityOptions, InterpolationOptions,
        ModelError, ModelResult, ModelSpec, RewardCoefficients, Solution, SolveOptions,
        StateDiagnostics, check_process, solve, solve_with_draws,
    };
}
