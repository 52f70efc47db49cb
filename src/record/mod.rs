//! record — everything the solver reports to the outside world.
//!
//! Purpose
//! -------
//! Keep observation concerns out of the numerical engine. The engine emits
//! [`ProgressEvent`]s and returns diagnostics as plain values; this module
//! turns them into log events and text reports.
//!
//! Key behaviors
//! -------------
//! - [`progress`]: the [`ProgressRecorder`] trait, a silent recorder and a
//!   `tracing`-backed one.
//! - [`ambiguity`]: the fixed-layout ambiguity report and its append-mode
//!   file writer.
//!
//! Conventions
//! -----------
//! - The crate never installs a `tracing` subscriber; applications do.

pub mod ambiguity;
pub mod progress;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::ambiguity::{format_ambiguity_report, write_ambiguity_report};
pub use self::progress::{
    NoopRecorder, ProgressEvent, ProgressRecorder, SolveStage, TracingRecorder,
};

pub mod prelude {
    pub use super::{
        NoopRecorder, ProgressEvent, ProgressRecorder, SolveStage, TracingRecorder,
        format_ambiguity_report, write_ambiguity_report,
    };
}
