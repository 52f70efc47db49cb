//! Systematic rewards — the deterministic part of each alternative's payoff.
//!
//! Purpose
//! -------
//! Evaluate, once per state, the reward of each of the four alternatives
//! before any shock is realized. These values are shared read-only by every
//! Monte Carlo draw and every optimizer evaluation of the backward
//! induction.
//!
//! Key behaviors
//! -------------
//! - Occupations A and B pay a log-linear wage
//!   `exp(β · [1, s, x_a, x_a², x_b, x_b²])` with `s` total schooling,
//!   clipped to `[0, HUGE_FLOAT]`.
//! - Schooling yields `γ₀`, minus tuition `γ₁` once `s >= 12`, minus a
//!   re-entry cost `γ₂` when schooling was not chosen last period.
//!   (The signs live in the coefficients; the formula is additive.)
//! - Home yields the constant `η₀`.
//!
//! Conventions
//! -----------
//! - Reward rows are ordered `[A, B, schooling, home]`, matching
//!   `constants::{OCCUPATION_A, OCCUPATION_B, SCHOOLING, HOME}`.
use crate::model::{
    core::{
        constants::{HUGE_FLOAT, NUM_ALTERNATIVES, NUM_COVARIATES, TUITION_THRESHOLD},
        state_space::{State, StateSpace},
    },
    errors::{ModelError, ModelResult},
};
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2};

/// Coefficients of the four reward equations.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardCoefficients {
    /// Wage equation of occupation A, length 6.
    pub coeffs_a: [f64; NUM_COVARIATES],
    /// Wage equation of occupation B, length 6.
    pub coeffs_b: [f64; NUM_COVARIATES],
    /// `[γ₀, γ₁, γ₂]`: schooling payoff, tuition, re-entry cost.
    pub coeffs_edu: [f64; 3],
    /// `[η₀]`: home payoff.
    pub coeffs_home: [f64; 1],
}

impl RewardCoefficients {
    /// Construct validated coefficients.
    ///
    /// # Errors
    /// - [`ModelError::NonFiniteCoefficient`] naming the first NaN/±inf entry.
    pub fn new(
        coeffs_a: [f64; NUM_COVARIATES], coeffs_b: [f64; NUM_COVARIATES], coeffs_edu: [f64; 3],
        coeffs_home: [f64; 1],
    ) -> ModelResult<Self> {
        let groups: [(&'static str, &[f64]); 4] = [
            ("coeffs_a", &coeffs_a),
            ("coeffs_b", &coeffs_b),
            ("coeffs_edu", &coeffs_edu),
            ("coeffs_home", &coeffs_home),
        ];
        for (group, values) in groups {
            if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite())
            {
                return Err(ModelError::NonFiniteCoefficient { group, index, value });
            }
        }
        Ok(Self { coeffs_a, coeffs_b, coeffs_edu, coeffs_home })
    }
}

/// Rewards of every alternative for every state, one `num_states × 4` block
/// per period.
#[derive(Debug, Clone, PartialEq)]
pub struct SystematicRewards {
    periods: Vec<Array2<f64>>,
}

impl SystematicRewards {
    /// Rewards of all states in `period`.
    pub fn period(&self, period: usize) -> ArrayView2<'_, f64> {
        self.periods[period].view()
    }

    /// Reward vector `[A, B, schooling, home]` of one state.
    pub fn get(&self, period: usize, state: usize) -> ArrayView1<'_, f64> {
        self.periods[period].row(state)
    }

    /// `(num_periods, max_states_period, 4)` array with NaN padding.
    pub fn padded(&self, max_states_period: usize) -> Array3<f64> {
        let mut out =
            Array3::from_elem((self.periods.len(), max_states_period, NUM_ALTERNATIVES), f64::NAN);
        for (period, block) in self.periods.iter().enumerate() {
            for ((k, j), &v) in block.indexed_iter() {
                out[[period, k, j]] = v;
            }
        }
        out
    }
}

/// Covariates `[1, s, x_a, x_a², x_b, x_b²]` of the wage equations.
pub fn wage_covariates(state: &State, edu_start: usize) -> Array1<f64> {
    let exp_a = state.exp_a as f64;
    let exp_b = state.exp_b as f64;
    Array1::from(vec![
        1.0,
        (state.edu + edu_start) as f64,
        exp_a,
        exp_a * exp_a,
        exp_b,
        exp_b * exp_b,
    ])
}

/// Systematic rewards `[A, B, schooling, home]` of a single state.
pub fn state_rewards(state: &State, edu_start: usize, coeffs: &RewardCoefficients) -> [f64; 4] {
    let covariates = wage_covariates(state, edu_start);
    let wage = |beta: &[f64; NUM_COVARIATES]| {
        let index: f64 = covariates.iter().zip(beta.iter()).map(|(x, b)| x * b).sum();
        index.exp().clamp(0.0, HUGE_FLOAT)
    };

    let [gamma0, gamma1, gamma2] = coeffs.coeffs_edu;
    let mut schooling = gamma0;
    if state.edu + edu_start >= TUITION_THRESHOLD {
        schooling += gamma1;
    }
    if !state.edu_lagged {
        schooling += gamma2;
    }

    [wage(&coeffs.coeffs_a), wage(&coeffs.coeffs_b), schooling, coeffs.coeffs_home[0]]
}

/// Compute systematic rewards for the whole state space.
pub fn calculate_rewards_systematic(
    state_space: &StateSpace, coeffs: &RewardCoefficients,
) -> SystematicRewards {
    let edu_start = state_space.edu_start();
    let periods = (0..state_space.num_periods())
        .map(|period| {
            let states = state_space.states(period);
            let mut block = Array2::<f64>::zeros((states.len(), NUM_ALTERNATIVES));
            for (k, state) in states.iter().enumerate() {
                let rewards = state_rewards(state, edu_start, coeffs);
                block.row_mut(k).assign(&ArrayView1::from(&rewards[..]));
            }
            block
        })
        .collect();
    SystematicRewards { periods }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::state_space::create_state_space;
    use approx::assert_relative_eq;

    fn coeffs() -> RewardCoefficients {
        RewardCoefficients::new(
            [9.0, 0.05, 0.03, -0.0005, 0.0, 0.0],
            [8.5, 0.08, 0.0, 0.0, 0.07, -0.001],
            [5000.0, -4000.0, -2000.0],
            [17750.0],
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Rewards of the entry state follow the closed-form equations.
    //
    // Given
    // -----
    // - Entry state with 10 years of schooling, no experience, lagged
    //   schooling.
    //
    // Expect
    // ------
    // - A = exp(9 + 0.5), B = exp(8.5 + 0.8), schooling = γ₀ (below the
    //   tuition threshold, no re-entry cost), home = η₀.
    fn entry_state_rewards() {
        let space = create_state_space(2, 10, 20, 2);
        let rewards = calculate_rewards_systematic(&space, &coeffs());
        let r = rewards.get(0, 0);

        assert_relative_eq!(r[0], (9.5_f64).exp(), max_relative = 1e-12);
        assert_relative_eq!(r[1], (9.3_f64).exp(), max_relative = 1e-12);
        assert_relative_eq!(r[2], 5000.0);
        assert_relative_eq!(r[3], 17750.0);
    }

    #[test]
    // Purpose
    // -------
    // Tuition and re-entry costs switch on at the documented thresholds.
    fn schooling_reward_switches() {
        let c = coeffs();
        let returning = State { period: 3, exp_a: 1, exp_b: 0, edu: 2, edu_lagged: false };
        let continuing = State { edu_lagged: true, ..returning };

        assert_relative_eq!(state_rewards(&returning, 10, &c)[2], 5000.0 - 4000.0 - 2000.0);
        assert_relative_eq!(state_rewards(&continuing, 10, &c)[2], 1000.0);
    }

    #[test]
    // Purpose
    // -------
    // Exploding wages are clipped and non-finite coefficients rejected.
    fn wages_are_clipped_and_inputs_validated() {
        let mut big = coeffs();
        big.coeffs_a[0] = 1000.0;
        let state = State { period: 0, exp_a: 0, exp_b: 0, edu: 0, edu_lagged: true };

        assert_eq!(state_rewards(&state, 10, &big)[0], HUGE_FLOAT);
        assert!(matches!(
            RewardCoefficients::new([f64::NAN; 6], [0.0; 6], [0.0; 3], [0.0]),
            Err(ModelError::NonFiniteCoefficient { group: "coeffs_a", index: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Padding keeps real rows and fills the rest with NaN.
    fn padded_rewards_use_nan() {
        let space = create_state_space(2, 10, 20, 2);
        let rewards = calculate_rewards_systematic(&space, &coeffs());

        let padded = rewards.padded(space.max_states_period());

        assert_eq!(padded.dim(), (2, 4, 4));
        assert!(padded[[0, 1, 0]].is_nan());
        assert_eq!(padded[[1, 3, 3]], 17750.0);
    }
}
