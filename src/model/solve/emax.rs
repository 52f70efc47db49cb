//! Monte Carlo EMAX of a single state under the reference shock law.
//!
//! Each draw yields four alternative-specific total values
//! `reward ⊕ shock + δ · EMAX_{t+1}(successor)`; the EMAX is the draw average
//! of their maximum. Occupation rewards are scaled by their (already
//! exponentiated) shocks, schooling and home rewards are shifted.
use crate::model::{
    core::{
        constants::{
            HOME, INADMISSIBILITY_PENALTY, NUM_ALTERNATIVES, OCCUPATION_A, OCCUPATION_B,
            SCHOOLING,
        },
        state_space::{State, StateSpace},
    },
    errors::{ModelError, ModelResult},
};
use ndarray::{ArrayView1, ArrayView2};

/// Everything about one state that does not depend on the shock law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaxInputs {
    /// Systematic rewards `[A, B, schooling, home]`.
    pub rewards: [f64; NUM_ALTERNATIVES],
    /// Next-period EMAX of each alternative's successor; zero when there is
    /// none (final period, capped schooling).
    pub future: [f64; NUM_ALTERNATIVES],
    pub delta: f64,
    /// Schooling is at its maximum and carries `INADMISSIBILITY_PENALTY`.
    pub schooling_capped: bool,
}

impl EmaxInputs {
    /// Collect the inputs of `state`.
    ///
    /// `emax_next` is the EMAX of period `state.period + 1`, or `None` in the
    /// final period.
    ///
    /// # Errors
    /// - [`ModelError::MissingSuccessor`] if a non-capped alternative does
    ///   not lead to a state of the next period.
    pub fn new(
        state_space: &StateSpace, state: &State, state_index: usize, rewards: ArrayView1<f64>,
        emax_next: Option<ArrayView1<f64>>, delta: f64,
    ) -> ModelResult<Self> {
        let schooling_capped = state_space.is_schooling_capped(state);
        let mut future = [0.0; NUM_ALTERNATIVES];
        if let Some(emax_next) = emax_next {
            for choice in [OCCUPATION_A, OCCUPATION_B, SCHOOLING, HOME] {
                if choice == SCHOOLING && schooling_capped {
                    continue;
                }
                let next = state_space.successor(state, choice).ok_or(
                    ModelError::MissingSuccessor {
                        period: state.period,
                        state: state_index,
                        choice,
                    },
                )?;
                future[choice] = emax_next[next];
            }
        }
        let mut own = [0.0; NUM_ALTERNATIVES];
        for (slot, &reward) in own.iter_mut().zip(rewards.iter()) {
            *slot = reward;
        }
        Ok(Self { rewards: own, future, delta, schooling_capped })
    }
}

/// Total value of each alternative for one shock vector.
pub fn total_values(inputs: &EmaxInputs, shock: ArrayView1<f64>) -> [f64; NUM_ALTERNATIVES] {
    let EmaxInputs { rewards, future, delta, schooling_capped } = *inputs;
    let mut values = [0.0; NUM_ALTERNATIVES];
    for choice in [OCCUPATION_A, OCCUPATION_B] {
        values[choice] = rewards[choice] * shock[choice] + delta * future[choice];
    }
    for choice in [SCHOOLING, HOME] {
        values[choice] = rewards[choice] + shock[choice] + delta * future[choice];
    }
    if schooling_capped {
        values[SCHOOLING] += INADMISSIBILITY_PENALTY;
    }
    values
}

/// Draw average of the maximal total value.
///
/// `shocks` holds realized shocks, one row per draw, as produced by
/// `transform_disturbances`.
pub fn construct_emax_risk(inputs: &EmaxInputs, shocks: ArrayView2<f64>) -> f64 {
    let num_draws = shocks.nrows();
    if num_draws == 0 {
        return 0.0;
    }
    let total: f64 = shocks
        .rows()
        .into_iter()
        .map(|shock| total_values(inputs, shock).into_iter().fold(f64::NEG_INFINITY, f64::max))
        .sum();
    total / num_draws as f64
}
