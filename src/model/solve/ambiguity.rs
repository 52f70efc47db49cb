//! Ambiguity-robust EMAX of a single state.
//!
//! Purpose
//! -------
//! Replace the reference shock law by the worst law within an ambiguity set
//! and report how far the worst case moved. Only the two occupation shocks
//! are perturbed; the schooling and home shocks keep their reference law.
//!
//! Key behaviors
//! -------------
//! - [`ReferenceShocks`] caches the reference covariance, its correlation
//!   matrix and standard deviations once per solve.
//! - [`EmaxCriterion`] implements [`AmbiguityCriterion`] over
//!   `θ = [μ_A, μ_B, σ_A, σ_B]`: the value is the Monte Carlo EMAX under
//!   `N([μ_A, μ_B, 0, 0], Σ(θ))` with the reference correlation held fixed,
//!   the divergence is the KL divergence of the occupation block.
//! - [`construct_emax_ambiguity`] dispatches on the measure:
//!   - `Kl`: Nelder–Mead on the KL ball via [`get_worst_case`]; a singular
//!     occupation block is reported as exit code 15 with the plain EMAX.
//!   - `Absolute`: both occupation means shifted by `-level`, standard
//!     deviations unchanged, divergence `level`, exit code 16.
//! - Deterministic shocks are never perturbed; the state is `Skipped`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Draws are standard normal and shared by every evaluation of a period,
//!   so worst-case values are comparable across `θ`.
//! - Non-convergence is returned as an unsuccessful diagnostic, never as an
//!   error.
use crate::{
    model::{
        core::{
            constants::{OCCUPATION_A, OCCUPATION_B},
            diagnostics::{AmbiguityDetails, StateDiagnostics},
            options::{AmbiguityMeasure, AmbiguityOptions},
            shocks::{is_deterministic, transform_disturbances},
        },
        errors::ModelResult,
        solve::emax::{EmaxInputs, construct_emax_risk},
    },
    optimization::{
        ambiguity::{
            AmbiguityCriterion, ExitCode, OptimizerOptions, Theta, WorstCaseOutcome,
            minimize_worst_case,
        },
        errors::OptResult,
        numerical_stability::{
            PIVOT_EPS, cholesky_psd, correlation_to_covariance, covariance_to_correlation,
            kl_divergence,
        },
    },
};
use ndarray::{Array1, Array2, ArrayView2, array, s};

/// Reference shock law, prepared once per solve.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceShocks {
    pub cholesky: Array2<f64>,
    pub cov: Array2<f64>,
    pub corr: Array2<f64>,
    pub sd: Array1<f64>,
}

impl ReferenceShocks {
    pub fn new(cholesky: ArrayView2<f64>) -> Self {
        let cov = cholesky.dot(&cholesky.t());
        let corr = covariance_to_correlation(cov.view());
        let sd = cov.diag().mapv(|v| v.max(0.0).sqrt());
        Self { cholesky: cholesky.to_owned(), cov, corr, sd }
    }

    pub fn is_deterministic(&self) -> bool {
        is_deterministic(self.cholesky.view())
    }

    /// 2×2 covariance of the occupation shocks.
    pub fn occupation_cov(&self) -> Array2<f64> {
        self.cov.slice(s![OCCUPATION_A..=OCCUPATION_B, OCCUPATION_A..=OCCUPATION_B]).to_owned()
    }

    /// The occupation block cannot be inverted.
    pub fn is_occupation_singular(&self) -> bool {
        let c = self.occupation_cov();
        c[[0, 0]] * c[[1, 1]] - c[[0, 1]] * c[[1, 0]] <= PIVOT_EPS
    }

    /// Reference point `[0, 0, σ_A, σ_B]`.
    pub fn reference_theta(&self) -> Theta {
        array![0.0, 0.0, self.sd[OCCUPATION_A], self.sd[OCCUPATION_B]]
    }
}

/// Worst-case EMAX criterion of one state.
pub struct EmaxCriterion<'a> {
    inputs: &'a EmaxInputs,
    draws: ArrayView2<'a, f64>,
    shocks: &'a ReferenceShocks,
    reference: Theta,
    level: f64,
}

impl<'a> EmaxCriterion<'a> {
    pub fn new(
        inputs: &'a EmaxInputs, draws: ArrayView2<'a, f64>, shocks: &'a ReferenceShocks,
        level: f64,
    ) -> Self {
        Self { inputs, draws, shocks, reference: shocks.reference_theta(), level }
    }

    /// Full 4×4 covariance at `θ`: occupation sds from `θ`, the rest from the
    /// reference, correlation unchanged.
    fn covariance(&self, theta: &Theta) -> Array2<f64> {
        let sd = array![theta[2], theta[3], self.shocks.sd[2], self.shocks.sd[3]];
        correlation_to_covariance(self.shocks.corr.view(), sd.view())
    }
}

impl AmbiguityCriterion for EmaxCriterion<'_> {
    fn value(&self, theta: &Theta) -> OptResult<f64> {
        let cholesky = cholesky_psd(self.covariance(theta).view());
        let mean = array![theta[0], theta[1], 0.0, 0.0];
        let shocks = transform_disturbances(self.draws, mean.view(), cholesky.view());
        Ok(construct_emax_risk(self.inputs, shocks.view()))
    }

    fn divergence(&self, theta: &Theta) -> OptResult<f64> {
        if theta[2] <= 0.0 || theta[3] <= 0.0 {
            return Ok(f64::INFINITY);
        }
        let cov_new = self.covariance(theta).slice(s![0..2, 0..2]).to_owned();
        let mean_new = array![theta[0], theta[1]];
        kl_divergence(
            Array1::zeros(2).view(),
            self.shocks.occupation_cov().view(),
            mean_new.view(),
            cov_new.view(),
        )
    }

    fn reference(&self) -> &Theta {
        &self.reference
    }

    fn level(&self) -> f64 {
        self.level
    }

    fn simplex_steps(&self) -> Theta {
        let (sd_a, sd_b) = (self.reference[2], self.reference[3]);
        array![sd_a, sd_b, sd_a, sd_b]
    }
}

/// Worst case of `criterion` over its KL ball.
///
/// # Errors
/// - Optimizer configuration errors and criterion failures.
pub fn get_worst_case(
    criterion: &EmaxCriterion<'_>, opts: &OptimizerOptions,
) -> OptResult<WorstCaseOutcome> {
    minimize_worst_case(criterion, opts)
}

/// Robust EMAX of one state and its diagnostic record.
///
/// `draws` are the period's standard-normal draws.
///
/// # Errors
/// - Optimizer errors that are not mere non-convergence.
pub fn construct_emax_ambiguity(
    inputs: &EmaxInputs, draws: ArrayView2<f64>, shocks: &ReferenceShocks,
    ambiguity: &AmbiguityOptions,
) -> ModelResult<(f64, StateDiagnostics)> {
    let reference_sd = [shocks.sd[OCCUPATION_A], shocks.sd[OCCUPATION_B]];
    let plain = || {
        let realized = transform_disturbances(draws, Array1::zeros(4).view(), shocks.cholesky.view());
        construct_emax_risk(inputs, realized.view())
    };

    if shocks.is_deterministic() {
        return Ok((plain(), StateDiagnostics::Skipped));
    }

    match ambiguity.measure {
        AmbiguityMeasure::Absolute => {
            let level = ambiguity.level;
            let mean = array![-level, -level, 0.0, 0.0];
            let realized = transform_disturbances(draws, mean.view(), shocks.cholesky.view());
            let details = AmbiguityDetails {
                mean_adjustment: [-level, -level],
                sd_adjustment: reference_sd,
                divergence: level,
                success: true,
                exit_code: ExitCode::ClosedFormSuccess,
            };
            Ok((construct_emax_risk(inputs, realized.view()), StateDiagnostics::Solved(details)))
        }
        AmbiguityMeasure::Kl if shocks.is_occupation_singular() => {
            let details = AmbiguityDetails {
                mean_adjustment: [0.0, 0.0],
                sd_adjustment: reference_sd,
                divergence: 0.0,
                success: true,
                exit_code: ExitCode::NoRandomVariation,
            };
            Ok((plain(), StateDiagnostics::Solved(details)))
        }
        AmbiguityMeasure::Kl => {
            let criterion = EmaxCriterion::new(inputs, draws.view(), shocks, ambiguity.level);
            let outcome = get_worst_case(&criterion, &ambiguity.optimizer)?;
            let theta = &outcome.theta_hat;
            let details = AmbiguityDetails {
                mean_adjustment: [theta[0], theta[1]],
                sd_adjustment: [theta[2], theta[3]],
                divergence: outcome.divergence,
                success: outcome.success,
                exit_code: outcome.exit_code,
            };
            Ok((outcome.value, StateDiagnostics::Solved(details)))
        }
    }
}
