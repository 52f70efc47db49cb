//! State space — enumeration and dense indexing of admissible states.
//!
//! Purpose
//! -------
//! Enumerate, period by period, every admissible combination of work
//! experience, schooling and lagged schooling, and give each one a dense
//! index `0..num_states(period)` that all per-state arrays share.
//!
//! Key behaviors
//! -------------
//! - [`create_state_space`] walks `(exp_a, exp_b, edu, edu_lagged)` in a
//!   fixed lexicographic order and keeps the admissible tuples.
//! - [`StateSpace::index_of`] is the inverse mapping, backed by a dense
//!   `Array5<Option<usize>>`; out-of-range coordinates are simply absent.
//! - [`StateSpace::successor`] resolves where each alternative leads in the
//!   following period.
//!
//! Invariants & assumptions
//! ------------------------
//! - Within a period indices are unique and dense; the mapping is a
//!   bijection between admissible tuples and `0..num_states(period)`.
//! - `exp_a + exp_b + edu <= period` and `edu <= edu_max - edu_start`.
//! - In period 0 every agent has lagged schooling; afterwards lagged
//!   schooling requires some schooling, and an agent who did nothing but
//!   attend school must have lagged schooling.
//!
//! Conventions
//! -----------
//! - `edu` counts schooling acquired *during* the model, on top of
//!   `edu_start`.
//! - `min_idx` bounds the schooling axis of the mapping; it is normally
//!   `min(num_periods, edu_max - edu_start + 1)`.
//!
//! Testing notes
//! -------------
//! - Unit tests check period counts for short horizons, the bijection, and
//!   successor resolution at the schooling cap.
use crate::model::core::constants::{HOME, OCCUPATION_A, OCCUPATION_B, SCHOOLING};
use ndarray::Array5;

/// One admissible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    pub period: usize,
    pub exp_a: usize,
    pub exp_b: usize,
    pub edu: usize,
    /// Schooling was chosen in the previous period.
    pub edu_lagged: bool,
}

impl State {
    /// Coordinates of the state reached by `choice` in the next period, or
    /// `None` if `choice` is not an alternative index.
    ///
    /// Schooling beyond the cap is not filtered here; [`StateSpace::successor`]
    /// reports such moves as absent.
    pub fn successor_coordinates(&self, choice: usize) -> Option<(usize, usize, usize, bool)> {
        match choice {
            OCCUPATION_A => Some((self.exp_a + 1, self.exp_b, self.edu, false)),
            OCCUPATION_B => Some((self.exp_a, self.exp_b + 1, self.edu, false)),
            SCHOOLING => Some((self.exp_a, self.exp_b, self.edu + 1, true)),
            HOME => Some((self.exp_a, self.exp_b, self.edu, false)),
            _ => None,
        }
    }
}

/// Per-period state lists plus the dense reverse mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    states: Vec<Vec<State>>,
    mapping: Array5<Option<usize>>,
    max_states_period: usize,
    edu_start: usize,
    edu_max: usize,
}

impl StateSpace {
    pub fn num_periods(&self) -> usize {
        self.states.len()
    }

    /// States of `period` in index order. Empty for periods out of range.
    pub fn states(&self, period: usize) -> &[State] {
        self.states.get(period).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_states(&self, period: usize) -> usize {
        self.states(period).len()
    }

    /// Number of states in every period.
    pub fn states_number_period(&self) -> Vec<usize> {
        self.states.iter().map(Vec::len).collect()
    }

    /// Largest per-period state count; the padding width of per-state arrays.
    pub fn max_states_period(&self) -> usize {
        self.max_states_period
    }

    pub fn edu_start(&self) -> usize {
        self.edu_start
    }

    pub fn edu_max(&self) -> usize {
        self.edu_max
    }

    /// Schooling is at its maximum and can no longer be chosen productively.
    pub fn is_schooling_capped(&self, state: &State) -> bool {
        state.edu + self.edu_start >= self.edu_max
    }

    /// Dense index of a state, or `None` if it is not admissible.
    pub fn index_of(
        &self, period: usize, exp_a: usize, exp_b: usize, edu: usize, edu_lagged: bool,
    ) -> Option<usize> {
        self.mapping.get((period, exp_a, exp_b, edu, usize::from(edu_lagged))).copied().flatten()
    }

    /// Look up a state by its dense index.
    pub fn get(&self, period: usize, index: usize) -> Option<&State> {
        self.states.get(period).and_then(|states| states.get(index))
    }

    /// Index in `period + 1` of the state reached from `state` via `choice`.
    ///
    /// Returns `None` in the final period, for an unknown `choice`, and when
    /// the move leaves the state space (schooling at its cap).
    pub fn successor(&self, state: &State, choice: usize) -> Option<usize> {
        if choice == SCHOOLING && self.is_schooling_capped(state) {
            return None;
        }
        let (exp_a, exp_b, edu, edu_lagged) = state.successor_coordinates(choice)?;
        self.index_of(state.period + 1, exp_a, exp_b, edu, edu_lagged)
    }
}

/// Enumerate all admissible states.
///
/// Parameters
/// ----------
/// - `num_periods`: model horizon.
/// - `edu_start`: schooling at model entry.
/// - `edu_max`: schooling maximum; caps `edu` at `edu_max - edu_start`.
/// - `min_idx`: size of the schooling axis of the mapping.
///
/// Returns
/// -------
/// The [`StateSpace`]. Enumeration order within a period is lexicographic
/// in `(exp_a, exp_b, edu, edu_lagged)` with `edu_lagged = false` first.
///
/// Notes
/// -----
/// - Callers validate `edu_start <= edu_max`; see `ModelSpec::new`.
pub fn create_state_space(
    num_periods: usize, edu_start: usize, edu_max: usize, min_idx: usize,
) -> StateSpace {
    let edu_cap = edu_max.saturating_sub(edu_start);
    let mut mapping = Array5::from_elem((num_periods, num_periods, num_periods, min_idx, 2), None);
    let mut states = Vec::with_capacity(num_periods);

    for period in 0..num_periods {
        let mut period_states = Vec::new();
        for exp_a in 0..num_periods {
            for exp_b in 0..num_periods {
                for edu in 0..min_idx {
                    for edu_lagged in [false, true] {
                        if !is_admissible(period, exp_a, exp_b, edu, edu_lagged, edu_cap) {
                            continue;
                        }
                        mapping[[period, exp_a, exp_b, edu, usize::from(edu_lagged)]] =
                            Some(period_states.len());
                        period_states.push(State { period, exp_a, exp_b, edu, edu_lagged });
                    }
                }
            }
        }
        states.push(period_states);
    }

    let max_states_period = states.iter().map(Vec::len).max().unwrap_or(0);
    StateSpace { states, mapping, max_states_period, edu_start, edu_max }
}

// ---- Helper methods ----

fn is_admissible(
    period: usize, exp_a: usize, exp_b: usize, edu: usize, edu_lagged: bool, edu_cap: usize,
) -> bool {
    if period == 0 && !edu_lagged {
        return false;
    }
    if period > 0 && edu_lagged && edu == 0 {
        return false;
    }
    if period > 0 && !edu_lagged && edu == period {
        return false;
    }
    exp_a + exp_b + edu <= period && edu <= edu_cap
}
