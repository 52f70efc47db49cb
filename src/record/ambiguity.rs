//! Ambiguity report — fixed-layout text summary of the worst-case searches.
//!
//! Purpose
//! -------
//! Render [`AmbiguityDiagnostics`] as the plain-text report downstream
//! tooling parses, and append it to a file.
//!
//! Key behaviors
//! -------------
//! - Periods are written last to first, states in index order; skipped
//!   states produce no block.
//! - Each block shows the divergence, the success flag, the exit-code
//!   message, and the worst-case mean vector next to the implied 4×4
//!   covariance (reference correlation, worst-case occupation sds).
//! - A summary table follows with, per period, the state count and the
//!   success and failure shares over all states of the period.
//!
//! Conventions
//! -----------
//! - The layout is byte-for-byte stable: column widths and precisions are
//!   part of the output contract.
//! - [`write_ambiguity_report`] appends; it never truncates an existing file.
use crate::{
    model::{
        core::diagnostics::{AmbiguityDetails, AmbiguityDiagnostics, StateDiagnostics},
        errors::{ModelError, ModelResult},
    },
    optimization::numerical_stability::{correlation_to_covariance, covariance_to_correlation},
};
use ndarray::{Array2, ArrayView2, array};
use std::{fs::OpenOptions, io::Write as _, path::Path};

/// Render the report.
///
/// `shocks_cholesky` is the reference factor; it supplies the correlation
/// and the non-occupation standard deviations of the printed covariance.
///
/// # Errors
/// - `ModelError::Optimization(UnknownExitCode)` if a record carries an exit
///   code without a message.
pub fn format_ambiguity_report(
    diagnostics: &AmbiguityDiagnostics, shocks_cholesky: ArrayView2<f64>,
) -> ModelResult<String> {
    let shocks_cov = shocks_cholesky.dot(&shocks_cholesky.t());
    let is_deterministic = shocks_cholesky.iter().all(|&v| v == 0.0);
    let corr = covariance_to_correlation(shocks_cov.view());

    let mut out = String::new();
    for period in (0..diagnostics.num_periods()).rev() {
        for (k, state) in diagnostics.period(period).iter().enumerate() {
            let StateDiagnostics::Solved(details) = state else { continue };
            let cov = if is_deterministic {
                Array2::zeros((4, 4))
            } else {
                implied_covariance(details, corr.view(), shocks_cov.view())
            };
            write_state_block(&mut out, period, k, details, &cov)?;
        }
    }

    out.push_str(" SUMMARY\n\n");
    out.push_str(&format!("{:>10} {:>10} {:>10} {:>10}\n", "Period", "Total", "Success", "Failure"));
    out.push('\n');
    for summary in diagnostics.summary().iter().rev() {
        out.push_str(&format!(
            "{:>10} {:>10} {:>10.2} {:>10.2}\n",
            summary.period,
            summary.total,
            summary.success_share(),
            summary.failure_share()
        ));
    }
    out.push('\n');
    Ok(out)
}

/// Append the report to `path`, creating the file if needed.
///
/// # Errors
/// - [`ModelError::Io`] if the file cannot be opened or written.
/// - Formatting errors from [`format_ambiguity_report`].
pub fn write_ambiguity_report(
    path: impl AsRef<Path>, diagnostics: &AmbiguityDiagnostics, shocks_cholesky: ArrayView2<f64>,
) -> ModelResult<()> {
    let path = path.as_ref();
    let report = format_ambiguity_report(diagnostics, shocks_cholesky)?;
    let io_error =
        |err: std::io::Error| ModelError::Io { path: path.display().to_string(), reason: err.to_string() };
    let mut file = OpenOptions::new().create(true).append(true).open(path).map_err(io_error)?;
    file.write_all(report.as_bytes()).map_err(io_error)
}

// ---- Helper methods ----

fn implied_covariance(
    details: &AmbiguityDetails, corr: ArrayView2<f64>, shocks_cov: ArrayView2<f64>,
) -> Array2<f64> {
    let sd = array![
        details.sd_adjustment[0],
        details.sd_adjustment[1],
        shocks_cov[[2, 2]].max(0.0).sqrt(),
        shocks_cov[[3, 3]].max(0.0).sqrt()
    ];
    correlation_to_covariance(corr, sd.view())
}

fn write_state_block(
    out: &mut String, period: usize, state: usize, details: &AmbiguityDetails, cov: &Array2<f64>,
) -> ModelResult<()> {
    let message = details.exit_code.message()?;
    let success = if details.success { "True" } else { "False" };
    let mean = [details.mean_adjustment[0], details.mean_adjustment[1], 0.0, 0.0];

    out.push_str(&format!(" PERIOD{period:>7}  STATE{state:>7}\n\n"));
    out.push_str(&format!("   {:<12}{:>10.5}\n\n", "Divergence", details.divergence));
    out.push_str(&format!("   {:<15}{:<5}\n", "Success", success));
    out.push_str(&format!("   {:<15}{:<100}\n\n", "Message", message));
    out.push_str(&format!("   {:<12}   {:<10}\n\n", "Mean", "Covariance"));
    for (i, m) in mean.iter().enumerate() {
        out.push_str(&format!(
            "   {:>10.5}  {:>10.5}{:>10.5}{:>10.5}{:>10.5}\n",
            m,
            cov[[i, 0]],
            cov[[i, 1]],
            cov[[i, 2]],
            cov[[i, 3]]
        ));
    }
    out.push_str("\n\n");
    Ok(())
}
