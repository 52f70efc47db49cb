//! Execution helper that runs Nelder–Mead on an ambiguity problem and maps
//! Argmin's termination status onto the crate's [`ExitCode`] table.
use crate::optimization::{
    ambiguity::{
        adapter::ArgMinAdapter,
        exit_code::ExitCode,
        traits::{AmbiguityCriterion, OptimizerOptions},
        types::{NelderMeadSolver, Theta},
        validation::validate_theta_hat,
    },
    errors::OptResult,
};
use argmin::core::{Executor, State, TerminationReason, TerminationStatus};

/// Raw result of a simplex run, before projection onto the ball.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRun {
    pub theta_best: Theta,
    pub iterations: usize,
    pub exit_code: ExitCode,
}

/// Run a configured Nelder–Mead solver on `problem`.
///
/// The iteration cap comes from `opts.max_iter`. Convergence of the simplex
/// (or reaching a target cost) maps to [`ExitCode::Success`]; every other
/// termination, the iteration cap included, maps to
/// [`ExitCode::IterationLimit`].
///
/// # Errors
/// - Propagates Argmin runtime errors, including errors raised by the
///   criterion, via `From<argmin::core::Error>`.
/// - `MissingThetaHat` / `InvalidThetaHat` if the final state holds no
///   usable parameters.
pub fn run_nelder_mead<'a, F: AmbiguityCriterion>(
    problem: ArgMinAdapter<'a, F>, solver: NelderMeadSolver, opts: &OptimizerOptions,
) -> OptResult<RawRun> {
    let max_iter = opts.max_iter as u64;
    let result = Executor::new(problem, solver).configure(|state| state.max_iters(max_iter)).run()?;
    let state = result.state();

    let exit_code = exit_code_from_status(state.get_termination_status());
    let iterations = state.get_iter() as usize;
    let theta_best = validate_theta_hat(state.get_best_param().cloned())?;
    Ok(RawRun { theta_best, iterations, exit_code })
}

/// Map an Argmin termination status onto the exit-code table.
pub fn exit_code_from_status(status: &TerminationStatus) -> ExitCode {
    match status {
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
        | TerminationStatus::Terminated(TerminationReason::TargetCostReached) => ExitCode::Success,
        _ => ExitCode::IterationLimit,
    }
}
