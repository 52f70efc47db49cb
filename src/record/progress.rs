//! Solve progress — events emitted by the solver and their sinks.
//!
//! The solver itself never logs or writes files. It reports what it is doing
//! through a [`ProgressRecorder`]; callers pick [`NoopRecorder`] for silence
//! or [`TracingRecorder`] to forward events to whatever `tracing` subscriber
//! the application installed.
use tracing::{debug, info};

/// Coarse stages of a solve, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStage {
    StateSpace,
    Rewards,
    BackwardInduction,
}

impl SolveStage {
    pub fn describe(&self) -> &'static str {
        match self {
            SolveStage::StateSpace => "state space creation",
            SolveStage::Rewards => "calculation of systematic rewards",
            SolveStage::BackwardInduction => "backward induction procedure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Started(SolveStage),
    Finished(SolveStage),
    /// A period of the backward induction is final.
    PeriodSolved { period: usize, num_states: usize },
}

/// Sink for [`ProgressEvent`]s.
///
/// Called from the solver's driving thread only, never from inside the
/// per-state parallel section.
pub trait ProgressRecorder {
    fn record(&self, event: ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl ProgressRecorder for NoopRecorder {
    fn record(&self, _event: ProgressEvent) {}
}

/// Forwards events as `tracing` events: stages at `INFO`, periods at
/// `DEBUG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRecorder;

impl ProgressRecorder for TracingRecorder {
    fn record(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started(stage) => info!(stage = stage.describe(), "Starting"),
            ProgressEvent::Finished(stage) => info!(stage = stage.describe(), "Finished"),
            ProgressEvent::PeriodSolved { period, num_states } => {
                debug!(period, num_states, "Period solved")
            }
        }
    }
}
