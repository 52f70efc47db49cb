//! Solver exit codes and their fixed human-readable messages.
//!
//! The code table is part of the diagnostics report contract: codes `-1..=9`
//! follow the classic SQP return modes and `15`/`16` are project-specific.
//! Anything else is carried as [`ExitCode::Unknown`] and refuses to produce a
//! message, which callers must propagate as an internal error.
use crate::optimization::errors::{OptError, OptResult};

/// Exit status of one worst-case optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    /// `-1`
    GradientEvaluationRequired,
    /// `0`
    Success,
    /// `1`
    FunctionEvaluationRequired,
    /// `2`
    TooManyEqualityConstraints,
    /// `3`
    LsqIterationLimit,
    /// `4`
    IncompatibleConstraints,
    /// `5`
    SingularMatrixE,
    /// `6`
    SingularMatrixC,
    /// `7`
    RankDeficientSubproblem,
    /// `8`
    PositiveDirectionalDerivative,
    /// `9`
    IterationLimit,
    /// `15`: the reference distribution has no variation to perturb.
    NoRandomVariation,
    /// `16`: closed-form worst case, no iterations needed.
    ClosedFormSuccess,
    /// Any code outside the table.
    Unknown(i32),
}

impl ExitCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => ExitCode::GradientEvaluationRequired,
            0 => ExitCode::Success,
            1 => ExitCode::FunctionEvaluationRequired,
            2 => ExitCode::TooManyEqualityConstraints,
            3 => ExitCode::LsqIterationLimit,
            4 => ExitCode::IncompatibleConstraints,
            5 => ExitCode::SingularMatrixE,
            6 => ExitCode::SingularMatrixC,
            7 => ExitCode::RankDeficientSubproblem,
            8 => ExitCode::PositiveDirectionalDerivative,
            9 => ExitCode::IterationLimit,
            15 => ExitCode::NoRandomVariation,
            16 => ExitCode::ClosedFormSuccess,
            other => ExitCode::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            ExitCode::GradientEvaluationRequired => -1,
            ExitCode::Success => 0,
            ExitCode::FunctionEvaluationRequired => 1,
            ExitCode::TooManyEqualityConstraints => 2,
            ExitCode::LsqIterationLimit => 3,
            ExitCode::IncompatibleConstraints => 4,
            ExitCode::SingularMatrixE => 5,
            ExitCode::SingularMatrixC => 6,
            ExitCode::RankDeficientSubproblem => 7,
            ExitCode::PositiveDirectionalDerivative => 8,
            ExitCode::IterationLimit => 9,
            ExitCode::NoRandomVariation => 15,
            ExitCode::ClosedFormSuccess => 16,
            ExitCode::Unknown(code) => *code,
        }
    }

    /// Report message for this exit code.
    ///
    /// # Errors
    /// - [`OptError::UnknownExitCode`] for [`ExitCode::Unknown`]. This is a
    ///   contract violation between the optimizer and the report, never a
    ///   recoverable condition.
    pub fn message(&self) -> OptResult<&'static str> {
        let message = match self {
            ExitCode::GradientEvaluationRequired => "Gradient evaluation required (g & a)",
            ExitCode::Success => "Optimization terminated successfully",
            ExitCode::FunctionEvaluationRequired => "Function evaluation required (f & c)",
            ExitCode::TooManyEqualityConstraints => {
                "More equality constraints than independent variables"
            }
            ExitCode::LsqIterationLimit => "More than 3*n iterations in LSQ subproblem",
            ExitCode::IncompatibleConstraints => "Inequality constraints incompatible",
            ExitCode::SingularMatrixE => "Singular matrix E in LSQ subproblem",
            ExitCode::SingularMatrixC => "Singular matrix C in LSQ subproblem",
            ExitCode::RankDeficientSubproblem => {
                "Rank-deficient equality constraint subproblem HFTI"
            }
            ExitCode::PositiveDirectionalDerivative => {
                "Positive directional derivative for linesearch"
            }
            ExitCode::IterationLimit => "Iteration limit exceeded",
            ExitCode::NoRandomVariation => "No random variation in shocks",
            ExitCode::ClosedFormSuccess => "Optimization terminated successfully",
            ExitCode::Unknown(code) => return Err(OptError::UnknownExitCode { code: *code }),
        };
        Ok(message)
    }

    /// Whether the outcome counts as a success in diagnostics.
    ///
    /// Besides a converged search this covers the two shortcuts: a reference
    /// law without variation (15) and the closed-form worst case (16).
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success | ExitCode::NoRandomVariation | ExitCode::ClosedFormSuccess)
    }
}

/// Message for a raw exit code.
///
/// # Errors
/// - [`OptError::UnknownExitCode`] when `code` is outside the fixed table.
pub fn get_message(code: i32) -> OptResult<&'static str> {
    ExitCode::from_code(code).message()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Every code in the fixed table maps back to itself and has a message.
    fn known_codes_round_trip_and_have_messages() {
        for code in [-1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 15, 16] {
            let exit = ExitCode::from_code(code);
            assert_eq!(exit.code(), code);
            assert!(!matches!(exit, ExitCode::Unknown(_)));
            assert!(exit.message().is_ok());
        }
    }

    #[test]
    // Purpose
    // -------
    // Both success codes share the same message; 5 and 6 are the two
    // singular-matrix cases.
    fn messages_match_report_table() {
        assert_eq!(get_message(0).unwrap(), "Optimization terminated successfully");
        assert_eq!(get_message(16).unwrap(), get_message(0).unwrap());
        assert_eq!(get_message(15).unwrap(), "No random variation in shocks");
        assert_eq!(get_message(9).unwrap(), "Iteration limit exceeded");
        assert!(get_message(5).unwrap().starts_with("Singular matrix"));
        assert!(get_message(6).unwrap().starts_with("Singular matrix"));
    }

    #[test]
    // Purpose
    // -------
    // Codes outside the table are an internal error, never silently mapped.
    fn unknown_code_is_an_error() {
        assert_eq!(ExitCode::from_code(99), ExitCode::Unknown(99));
        assert_eq!(get_message(99), Err(OptError::UnknownExitCode { code: 99 }));
        assert!(get_message(10).is_err());
    }
}
