//! solve — end-to-end solution of the dynamic discrete-choice model.
//!
//! Purpose
//! -------
//! Turn a locked [`ModelSpec`] and [`SolveOptions`] into a [`Solution`]:
//! the state space, systematic rewards, the EMAX of every state and, with
//! ambiguity enabled, per-state diagnostics of the worst-case search.
//!
//! Key behaviors
//! -------------
//! - [`solve`] runs three stages (state space, rewards, backward induction),
//!   reporting each start and finish to a [`ProgressRecorder`].
//! - [`solve_with_draws`] does the same with caller-supplied draws, which is
//!   how tests pin the Monte Carlo integration.
//! - Submodules hold the per-state EMAX ([`emax`]), the robust EMAX
//!   ([`ambiguity`]), interpolation ([`interpolation`]) and the period fold
//!   ([`backward`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Only locked specifications are solved.
//! - Given the same inputs and seed the solution is identical across runs
//!   and thread counts.
//!
//! Downstream usage
//! ----------------
//! - Write diagnostics with `record::ambiguity::write_ambiguity_report`.
//! - Look up a state's EMAX by attributes with [`Solution::emax_of`], or take
//!   the padded `(num_periods, max_states_period)` array from
//!   [`Solution::periods_emax`].

pub mod ambiguity;
pub mod backward;
pub mod emax;
pub mod interpolation;

use crate::{
    model::{
        core::{
            diagnostics::AmbiguityDiagnostics,
            options::{ModelSpec, SolveOptions},
            rewards::{SystematicRewards, calculate_rewards_systematic},
            shocks::{ShockDraws, create_draws},
            state_space::{StateSpace, create_state_space},
            values::ContinuationValues,
        },
        errors::{ModelError, ModelResult},
    },
    record::progress::{ProgressEvent, ProgressRecorder, SolveStage},
};
use ndarray::{Array2, Array3};

pub use self::backward::{BackwardInduction, backward_induction};

/// A solved model.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    state_space: StateSpace,
    rewards: SystematicRewards,
    emax: ContinuationValues,
    diagnostics: Option<AmbiguityDiagnostics>,
}

impl Solution {
    pub fn state_space(&self) -> &StateSpace {
        &self.state_space
    }

    pub fn rewards(&self) -> &SystematicRewards {
        &self.rewards
    }

    pub fn emax(&self) -> &ContinuationValues {
        &self.emax
    }

    /// Worst-case search diagnostics; `None` without ambiguity.
    pub fn diagnostics(&self) -> Option<&AmbiguityDiagnostics> {
        self.diagnostics.as_ref()
    }

    /// `(num_periods, max_states_period)` EMAX with NaN padding.
    pub fn periods_emax(&self) -> Array2<f64> {
        self.emax.padded(self.state_space.max_states_period())
    }

    /// `(num_periods, max_states_period, 4)` rewards with NaN padding.
    pub fn periods_rewards_systematic(&self) -> Array3<f64> {
        self.rewards.padded(self.state_space.max_states_period())
    }

    /// EMAX of the state with the given attributes, if it exists.
    pub fn emax_of(
        &self, period: usize, exp_a: usize, exp_b: usize, edu: usize, edu_lagged: bool,
    ) -> Option<f64> {
        let k = self.state_space.index_of(period, exp_a, exp_b, edu, edu_lagged)?;
        self.emax.get(period, k)
    }
}

/// Solve `spec` with draws generated from `opts.seed_emax`.
///
/// # Errors
/// - [`ModelError::ConfigurationNotLocked`] for an unlocked spec.
/// - Any error of [`solve_with_draws`].
pub fn solve(
    spec: &ModelSpec, opts: &SolveOptions, recorder: &dyn ProgressRecorder,
) -> ModelResult<Solution> {
    if !spec.is_locked() {
        return Err(ModelError::ConfigurationNotLocked);
    }
    let draws = create_draws(spec.num_periods(), opts.num_draws_emax, opts.seed_emax)?;
    solve_with_draws(spec, opts, &draws, recorder)
}

/// Solve `spec` with caller-supplied standard-normal draws.
///
/// # Errors
/// - [`ModelError::ConfigurationNotLocked`] for an unlocked spec.
/// - Errors from the backward induction.
pub fn solve_with_draws(
    spec: &ModelSpec, opts: &SolveOptions, draws: &ShockDraws, recorder: &dyn ProgressRecorder,
) -> ModelResult<Solution> {
    if !spec.is_locked() {
        return Err(ModelError::ConfigurationNotLocked);
    }

    recorder.record(ProgressEvent::Started(SolveStage::StateSpace));
    let state_space =
        create_state_space(spec.num_periods(), spec.edu_start(), spec.edu_max(), spec.min_idx());
    recorder.record(ProgressEvent::Finished(SolveStage::StateSpace));

    recorder.record(ProgressEvent::Started(SolveStage::Rewards));
    let rewards = calculate_rewards_systematic(&state_space, spec.coeffs());
    recorder.record(ProgressEvent::Finished(SolveStage::Rewards));

    recorder.record(ProgressEvent::Started(SolveStage::BackwardInduction));
    let BackwardInduction { emax, diagnostics } =
        backward_induction(&state_space, &rewards, draws, spec, opts, recorder)?;
    recorder.record(ProgressEvent::Finished(SolveStage::BackwardInduction));

    Ok(Solution { state_space, rewards, emax, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::core::rewards::RewardCoefficients, record::progress::NoopRecorder};

    fn spec() -> ModelSpec {
        let coeffs = RewardCoefficients::new([0.0; 6], [0.0; 6], [1.0, 0.0, 0.0], [2.0]).unwrap();
        ModelSpec::new(3, 10, 20, 0.9, coeffs, Array2::zeros((4, 4))).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Unlocked specifications are refused before any work happens.
    fn unlocked_spec_is_refused() {
        assert_eq!(
            solve(&spec(), &SolveOptions::default(), &NoopRecorder),
            Err(ModelError::ConfigurationNotLocked)
        );
    }

    #[test]
    // Purpose
    // -------
    // Accessors agree with each other: padded arrays have the state-space
    // shape and attribute lookup hits the same value as index lookup.
    fn solution_accessors_agree() {
        let opts = SolveOptions::new(5, 1, None, None).unwrap();

        let solution = solve(&spec().lock(), &opts, &NoopRecorder).unwrap();

        let padded = solution.periods_emax();
        assert_eq!(padded.dim(), (3, solution.state_space().max_states_period()));
        assert!(padded[[0, 1]].is_nan());
        assert_eq!(solution.emax_of(0, 0, 0, 0, true), Some(padded[[0, 0]]));
        assert_eq!(solution.emax_of(0, 0, 0, 0, false), None);
        assert_eq!(solution.periods_rewards_systematic().dim().2, 4);
        assert!(solution.diagnostics().is_none());
    }
}
