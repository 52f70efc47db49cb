//! Per-period expected maximal values (EMAX) of every state.
use ndarray::{Array1, Array2, ArrayView1};

/// EMAX of every state, one vector per period in state-index order.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationValues {
    periods: Vec<Array1<f64>>,
}

impl ContinuationValues {
    pub fn new(periods: Vec<Array1<f64>>) -> Self {
        Self { periods }
    }

    /// All-zero values, e.g. for myopic agents.
    pub fn zeros(states_number_period: &[usize]) -> Self {
        Self { periods: states_number_period.iter().map(|&n| Array1::zeros(n)).collect() }
    }

    pub fn num_periods(&self) -> usize {
        self.periods.len()
    }

    pub fn period(&self, period: usize) -> ArrayView1<'_, f64> {
        self.periods[period].view()
    }

    pub fn get(&self, period: usize, state: usize) -> Option<f64> {
        self.periods.get(period).and_then(|p| p.get(state)).copied()
    }

    /// `(num_periods, max_states_period)` array with NaN padding.
    pub fn padded(&self, max_states_period: usize) -> Array2<f64> {
        let mut out = Array2::from_elem((self.periods.len(), max_states_period), f64::NAN);
        for (period, values) in self.periods.iter().enumerate() {
            out.row_mut(period).slice_mut(ndarray::s![..values.len()]).assign(values);
        }
        out
    }
}
