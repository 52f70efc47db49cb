//! Model-wide numeric constants.

/// Alternatives available in every period: occupation A, occupation B,
/// schooling, home.
pub const NUM_ALTERNATIVES: usize = 4;

/// Length of the occupation covariate vector
/// `[1, schooling, exp_a, exp_a², exp_b, exp_b²]`.
pub const NUM_COVARIATES: usize = 6;

/// Upper clip for exponentiated wages and shocks.
pub const HUGE_FLOAT: f64 = 1.0e20;

/// Reward assigned to schooling once the schooling maximum is reached.
pub const INADMISSIBILITY_PENALTY: f64 = -40000.0;

/// Years of completed schooling above which tuition is charged.
pub const TUITION_THRESHOLD: usize = 12;

/// Alternative indices into reward, shock, and value vectors.
pub const OCCUPATION_A: usize = 0;
pub const OCCUPATION_B: usize = 1;
pub const SCHOOLING: usize = 2;
pub const HOME: usize = 3;
