//! core — state space, rewards, shocks, and configuration of the model.
//!
//! Purpose
//! -------
//! Collect the building blocks the backward induction operates on: the
//! enumerated state space, systematic rewards, Monte Carlo shock draws,
//! validated model and solve options, the per-period value and diagnostics
//! containers, plus two stand-alone facilities (pre-solve checks and the
//! exogenous-process transition matrices).
//!
//! Key behaviors
//! -------------
//! - [`create_state_space`] enumerates admissible states with a dense
//!   per-period index ([`StateSpace`]).
//! - [`calculate_rewards_systematic`] evaluates the deterministic payoff of
//!   each alternative for every state ([`SystematicRewards`]).
//! - [`create_draws`] / [`transform_disturbances`] produce seeded
//!   standard-normal draws and map them into realized shocks.
//! - [`ModelSpec`] / [`SolveOptions`] carry the configuration; constructors
//!   validate and never panic.
//! - [`ContinuationValues`] and [`AmbiguityDiagnostics`] hold the engine's
//!   outputs.
//! - [`check_process`] and [`parse_transition_matrix`] validate user input
//!   before it reaches the engine.
//!
//! Invariants & assumptions
//! ------------------------
//! - Per-period arrays share the state space's dense index: row `k` of any
//!   per-state block belongs to `state_space.states(period)[k]`.
//! - Alternative vectors are ordered `[A, B, schooling, home]`.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; periods run `0..num_periods`.
//! - This module performs no logging; the only I/O is the existence check in
//!   [`check_process`].
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule cover enumeration counts, reward formulas,
//!   draw reproducibility, option validation, diagnostics summaries and the
//!   transition-matrix checks.

pub mod constants;
pub mod diagnostics;
pub mod options;
pub mod preconditions;
pub mod rewards;
pub mod shocks;
pub mod state_space;
pub mod transition;
pub mod values;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::diagnostics::{
    AmbiguityDetails, AmbiguityDiagnostics, PeriodSummary, StateDiagnostics,
};
pub use self::options::{
    AmbiguityMeasure, AmbiguityOptions, InterpolationOptions, ModelSpec, SolveOptions,
};
pub use self::preconditions::check_process;
pub use self::rewards::{RewardCoefficients, SystematicRewards, calculate_rewards_systematic};
pub use self::shocks::{ShockDraws, create_draws, is_deterministic, transform_disturbances};
pub use self::state_space::{State, StateSpace, create_state_space};
pub use self::transition::{
    ParsedTransition, TransitionMatrix, TransitionParam, check_numerics,
    create_covariates_options, parse_transition_matrix, transform_matrix,
};
pub use self::values::ContinuationValues;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::diagnostics::{AmbiguityDetails, AmbiguityDiagnostics, StateDiagnostics};
    pub use super::options::{
        AmbiguityMeasure, AmbiguityOptions, InterpolationOptions, ModelSpec, SolveOptions,
    };
    pub use super::rewards::RewardCoefficients;
    pub use super::state_space::{State, StateSpace};
    pub use super::transition::TransitionMatrix;
    pub use super::values::ContinuationValues;
}
