//! Backward induction over periods.
//!
//! Purpose
//! -------
//! Compute the EMAX of every state, last period first. Each period depends
//! only on the finished values of the period after it, so the recursion is a
//! fold over periods; within a period states are independent and solved in
//! parallel.
//!
//! Key behaviors
//! -------------
//! - The final period has EMAX zero; myopic agents (`δ = 0`) short-circuit
//!   to zeros everywhere.
//! - Every earlier state is solved by Monte Carlo under the reference law
//!   or, with ambiguity enabled, under the worst law of the ambiguity set.
//! - With interpolation enabled and `num_points` not exceeding the period's
//!   state count, only a random subset is solved and the rest predicted.
//!   Predicted states carry `Skipped` diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - A period's values are immutable once produced.
//! - Every EMAX is finite; a non-finite value aborts with
//!   [`ModelError::NonFiniteEmax`].
//! - Progress is reported from the driving thread after each period.
use crate::{
    model::{
        core::{
            diagnostics::{AmbiguityDiagnostics, StateDiagnostics},
            options::{InterpolationOptions, ModelSpec, SolveOptions},
            rewards::SystematicRewards,
            shocks::{ShockDraws, transform_disturbances},
            state_space::StateSpace,
            values::ContinuationValues,
        },
        errors::{ModelError, ModelResult},
        solve::{
            ambiguity::{ReferenceShocks, construct_emax_ambiguity},
            emax::{EmaxInputs, construct_emax_risk},
            interpolation::{
                expected_shocks, get_coefficients, get_endogenous_variable,
                get_exogenous_variables, get_predictions, get_simulated_indicator,
            },
        },
    },
    record::progress::{ProgressEvent, ProgressRecorder},
};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;

/// Output of [`backward_induction`].
#[derive(Debug, Clone, PartialEq)]
pub struct BackwardInduction {
    pub emax: ContinuationValues,
    /// Present iff ambiguity is enabled.
    pub diagnostics: Option<AmbiguityDiagnostics>,
}

/// Solve all periods.
///
/// # Errors
/// - [`ModelError::DrawsShapeMismatch`] if `draws` covers fewer periods than
///   the state space.
/// - [`ModelError::MissingSuccessor`], [`ModelError::NonFiniteEmax`],
///   [`ModelError::RegressionFailed`] on broken invariants.
/// - Optimizer configuration errors from the worst-case search.
pub fn backward_induction(
    state_space: &StateSpace, rewards: &SystematicRewards, draws: &ShockDraws, spec: &ModelSpec,
    opts: &SolveOptions, recorder: &dyn ProgressRecorder,
) -> ModelResult<BackwardInduction> {
    let num_periods = state_space.num_periods();
    if num_periods == 0 {
        return Err(ModelError::InvalidNumPeriods { num_periods });
    }
    let counts = state_space.states_number_period();
    let skipped = || opts.ambiguity.map(|_| AmbiguityDiagnostics::skipped(&counts));

    if spec.is_myopic() {
        for period in (0..num_periods).rev() {
            recorder.record(ProgressEvent::PeriodSolved { period, num_states: counts[period] });
        }
        let emax = ContinuationValues::zeros(&counts);
        return Ok(BackwardInduction { emax, diagnostics: skipped() });
    }
    if draws.num_periods() < num_periods {
        return Err(ModelError::DrawsShapeMismatch {
            expected: (num_periods, draws.num_draws(), 4),
            found: (draws.num_periods(), draws.num_draws(), 4),
        });
    }

    let shocks = ReferenceShocks::new(spec.shocks_cholesky());
    let context = PeriodContext { state_space, rewards, spec, opts, shocks: &shocks };

    let last = num_periods - 1;
    recorder.record(ProgressEvent::PeriodSolved { period: last, num_states: counts[last] });
    let terminal = (Array1::zeros(counts[last]), vec![StateDiagnostics::Skipped; counts[last]]);

    let solved = (0..last).rev().try_fold(vec![terminal], |mut acc, period| {
        let emax_next = acc.last().map(|(values, _)| values.view());
        let solved = context.solve_period(period, draws.period(period), emax_next)?;
        recorder.record(ProgressEvent::PeriodSolved { period, num_states: counts[period] });
        acc.push(solved);
        Ok::<_, ModelError>(acc)
    })?;

    let (values, diagnostics): (Vec<_>, Vec<_>) = solved.into_iter().rev().unzip();
    Ok(BackwardInduction {
        emax: ContinuationValues::new(values),
        diagnostics: opts.ambiguity.map(|_| AmbiguityDiagnostics::new(diagnostics)),
    })
}

// ---- Helper methods ----

struct PeriodContext<'a> {
    state_space: &'a StateSpace,
    rewards: &'a SystematicRewards,
    spec: &'a ModelSpec,
    opts: &'a SolveOptions,
    shocks: &'a ReferenceShocks,
}

impl PeriodContext<'_> {
    fn solve_period(
        &self, period: usize, draws: ArrayView2<f64>, emax_next: Option<ArrayView1<f64>>,
    ) -> ModelResult<(Array1<f64>, Vec<StateDiagnostics>)> {
        let states = self.state_space.states(period);
        let inputs = states
            .iter()
            .enumerate()
            .map(|(k, state)| {
                EmaxInputs::new(
                    self.state_space,
                    state,
                    k,
                    self.rewards.get(period, k),
                    emax_next,
                    self.spec.delta(),
                )
            })
            .collect::<ModelResult<Vec<_>>>()?;

        let interpolation = self.opts.interpolation.filter(|i| i.num_points <= states.len());
        let is_simulated = match interpolation {
            Some(InterpolationOptions { num_points, seed }) => {
                get_simulated_indicator(num_points, states.len(), period, seed)
            }
            None => vec![true; states.len()],
        };

        let realized =
            transform_disturbances(draws, Array1::zeros(4).view(), self.shocks.cholesky.view());
        let solved = inputs
            .par_iter()
            .zip(is_simulated.par_iter())
            .map(|(state_inputs, &simulated)| {
                if !simulated {
                    return Ok((f64::NAN, StateDiagnostics::Skipped));
                }
                match &self.opts.ambiguity {
                    Some(ambiguity) => {
                        construct_emax_ambiguity(state_inputs, draws, self.shocks, ambiguity)
                    }
                    None => {
                        let emax = construct_emax_risk(state_inputs, realized.view());
                        Ok((emax, StateDiagnostics::Skipped))
                    }
                }
            })
            .collect::<ModelResult<Vec<_>>>()?;
        let (emax, diagnostics): (Vec<f64>, Vec<StateDiagnostics>) = solved.into_iter().unzip();
        let mut emax = Array1::from(emax);

        if interpolation.is_some() {
            let shocks_expected = expected_shocks(self.shocks.cov.view());
            let (exogenous, maxe) = get_exogenous_variables(&inputs, shocks_expected.view());
            let endogenous = get_endogenous_variable(emax.view(), maxe.view());
            let coeffs = get_coefficients(exogenous.view(), endogenous.view(), &is_simulated, period)?;
            emax = get_predictions(exogenous.view(), coeffs.view(), maxe.view(), emax.view(), &is_simulated);
        }

        if let Some((state, &value)) = emax.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFiniteEmax { period, state, value });
        }
        Ok((emax, diagnostics))
    }
}
