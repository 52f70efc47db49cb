//! Error surface for the ambiguity optimizer and its numerical helpers.
//!
//! Every fallible routine in `optimization` returns [`OptResult<T>`]. Backend
//! (`argmin`) errors are mapped variant by variant so callers never see raw
//! solver errors. Optimizer *non-convergence* is not an error: it is reported
//! through the exit code carried by a successful outcome.
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- OptimizerOptions ----
    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// Simplex standard-deviation tolerance needs to be positive and finite.
    InvalidSdTolerance { tol: f64, reason: &'static str },

    /// Initial simplex scale needs to be positive and finite.
    InvalidSimplexScale { scale: f64, reason: &'static str },

    /// Ambiguity level needs to be non-negative and finite.
    InvalidLevel { level: f64, reason: &'static str },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost { value: f64 },

    /// Reference point and simplex scales disagree in length.
    ThetaLengthMismatch { expected: usize, actual: usize },

    // ---- Optimizer outcome ----
    /// Best parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// The solver finished without reporting a best parameter vector.
    MissingThetaHat,

    // ---- Covariance handling ----
    /// Matrix shape does not match the mean vector.
    CovarianceDimMismatch { expected: usize, found: (usize, usize) },

    /// The reference covariance cannot be inverted.
    SingularReferenceCovariance { determinant: f64 },

    // ---- Exit codes ----
    /// A solver exit code outside the known enumeration.
    UnknownExitCode { code: i32 },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- OptimizerOptions ----
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidSdTolerance { tol, reason } => {
                write!(f, "Invalid simplex tolerance {tol}: {reason}")
            }
            OptError::InvalidSimplexScale { scale, reason } => {
                write!(f, "Invalid simplex scale {scale}: {reason}")
            }
            OptError::InvalidLevel { level, reason } => {
                write!(f, "Invalid ambiguity level {level}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid best parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing best parameters (theta hat)")
            }

            // ---- Covariance handling ----
            OptError::CovarianceDimMismatch { expected, found } => {
                write!(
                    f,
                    "Covariance dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::SingularReferenceCovariance { determinant } => {
                write!(f, "Reference covariance is singular (determinant {determinant})")
            }

            // ---- Exit codes ----
            OptError::UnknownExitCode { code } => {
                write!(f, "Internal error: unknown optimizer exit code {code}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast::<ArgminError>() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => match err.downcast::<OptError>() {
                Ok(opt_err) => opt_err,
                Err(err) => OptError::BackendError { text: err.to_string() },
            },
        }
    }
}
