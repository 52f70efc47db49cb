//! Ambiguity diagnostics — per-state records of the worst-case search.
//!
//! Purpose
//! -------
//! Keep, for every `(period, state)`, what the robust EMAX computation found:
//! the worst-case shift of the occupation shocks, its divergence from the
//! reference law, and the optimizer status. The record is a pure value; the
//! textual report lives in `record::ambiguity`.
//!
//! Key behaviors
//! -------------
//! - [`StateDiagnostics::Skipped`] marks states where no search took place
//!   (deterministic shocks, states only predicted by interpolation, the
//!   terminal period, myopic agents).
//! - [`AmbiguityDiagnostics::summary`] counts successes and failures per
//!   period. Skipped states count as neither; shares are taken over *all*
//!   states of the period.
use crate::optimization::ambiguity::ExitCode;

/// Result of one worst-case search.
///
/// - `mean_adjustment`: worst-case means of the two occupation shocks.
/// - `sd_adjustment`: worst-case standard deviations of the two occupation
///   shocks (levels, not differences).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbiguityDetails {
    pub mean_adjustment: [f64; 2],
    pub sd_adjustment: [f64; 2],
    pub divergence: f64,
    pub success: bool,
    pub exit_code: ExitCode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateDiagnostics {
    Skipped,
    Solved(AmbiguityDetails),
}

impl StateDiagnostics {
    pub fn is_skipped(&self) -> bool {
        matches!(self, StateDiagnostics::Skipped)
    }

    pub fn details(&self) -> Option<&AmbiguityDetails> {
        match self {
            StateDiagnostics::Skipped => None,
            StateDiagnostics::Solved(details) => Some(details),
        }
    }
}

/// Success/failure counts of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSummary {
    pub period: usize,
    pub total: usize,
    pub success: usize,
    pub failure: usize,
}

impl PeriodSummary {
    pub fn success_share(&self) -> f64 {
        share(self.success, self.total)
    }

    pub fn failure_share(&self) -> f64 {
        share(self.failure, self.total)
    }
}

/// Diagnostics of a whole solve, indexed like the state space.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbiguityDiagnostics {
    periods: Vec<Vec<StateDiagnostics>>,
}

impl AmbiguityDiagnostics {
    pub fn new(periods: Vec<Vec<StateDiagnostics>>) -> Self {
        Self { periods }
    }

    /// Every state of every period skipped.
    pub fn skipped(states_number_period: &[usize]) -> Self {
        let periods =
            states_number_period.iter().map(|&n| vec![StateDiagnostics::Skipped; n]).collect();
        Self { periods }
    }

    pub fn num_periods(&self) -> usize {
        self.periods.len()
    }

    pub fn period(&self, period: usize) -> &[StateDiagnostics] {
        self.periods.get(period).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, period: usize, state: usize) -> Option<&StateDiagnostics> {
        self.periods.get(period).and_then(|p| p.get(state))
    }

    /// Per-period counts in period order.
    pub fn summary(&self) -> Vec<PeriodSummary> {
        self.periods
            .iter()
            .enumerate()
            .map(|(period, states)| {
                let (success, failure) =
                    states.iter().filter_map(StateDiagnostics::details).fold(
                        (0, 0),
                        |(s, f), d| if d.success { (s + 1, f) } else { (s, f + 1) },
                    );
                PeriodSummary { period, total: states.len(), success, failure }
            })
            .collect()
    }
}

// ---- Helper methods ----

fn share(count: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { count as f64 / total as f64 }
}
