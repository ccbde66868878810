//! The simulation loop: steps, sampling and best-effort sinks.
//!
//! [`Simulation`] owns the [`SimulationState`] and the [`TimeStepper`]
//! and drives them for the configured number of steps. After every step
//! whose completed-step count matches the [`SamplingPolicy`], the current
//! planes go to each registered [`SnapshotSink`] and the total kinetic
//! energy to each [`DiagnosticSink`].
//!
//! Sink failures never abort the loop or touch the numerical state. They
//! are logged, counted, and the most recent one is kept for inspection.
//!
//! # Ownership model
//!
//! `Simulation` is [`Send`]. Every method that steps or samples takes
//! `&mut self`, so no view of the planes can outlive a swap.

use std::fmt;
use std::time::Instant;

use indexmap::IndexMap;
use tracing::{info, warn};
use viscid_core::{
    DiagnosticSink, Field, Initializer, SinkError, SnapshotSink, StepError, StepId,
};

use crate::config::{ConfigError, RunConfig};
use crate::metrics::{micros, RunSummary, StepMetrics};
use crate::sampling::SamplingPolicy;
use crate::state::SimulationState;
use crate::stepper::TimeStepper;

// Fails to compile if any field is !Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulation>();
    }
};

// ── SinkFailure ─────────────────────────────────────────────────

/// Which kind of collaborator failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// A [`SnapshotSink`].
    Snapshot,
    /// A [`DiagnosticSink`].
    Diagnostic,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snapshot => f.write_str("snapshot"),
            Self::Diagnostic => f.write_str("diagnostic"),
        }
    }
}

/// A non-fatal sink error, attributed to the sink that raised it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkFailure {
    /// Registration name of the sink.
    pub sink: String,
    /// Snapshot or diagnostic.
    pub kind: SinkKind,
    /// Step being sampled (or the final step, for flush failures).
    pub step: StepId,
    /// What went wrong.
    pub error: SinkError,
}

impl fmt::Display for SinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sink '{}' failed at step {}: {}",
            self.kind, self.sink, self.step, self.error
        )
    }
}

#[derive(Debug, Default)]
struct FailureLog {
    snapshot: u64,
    diagnostic: u64,
    last: Option<SinkFailure>,
}

impl FailureLog {
    fn record(&mut self, sink: &str, kind: SinkKind, step: StepId, error: SinkError) {
        warn!(sink, %kind, step = step.0, %error, "sink failed; continuing");
        match kind {
            SinkKind::Snapshot => self.snapshot += 1,
            SinkKind::Diagnostic => self.diagnostic += 1,
        }
        self.last = Some(SinkFailure {
            sink: sink.to_owned(),
            kind,
            step,
            error,
        });
    }
}

// ── Simulation ──────────────────────────────────────────────────

/// Drives a [`TimeStepper`] over a [`SimulationState`] with sampling.
///
/// Sinks are registered by name and invoked in registration order.
/// Registering a second sink under an existing name replaces the first
/// in place.
pub struct Simulation {
    state: SimulationState,
    stepper: TimeStepper,
    policy: SamplingPolicy,
    snapshot_sinks: IndexMap<String, Box<dyn SnapshotSink>>,
    diagnostic_sinks: IndexMap<String, Box<dyn DiagnosticSink>>,
    failures: FailureLog,
    last_metrics: Option<StepMetrics>,
    initial_sampled: bool,
    warned_non_finite: bool,
}

impl Simulation {
    /// Validate `config`, allocate and initialize the grid, and build the
    /// worker pool. The sampling policy comes from the config.
    pub fn new(config: RunConfig, init: &dyn Initializer) -> Result<Self, ConfigError> {
        let stepper = TimeStepper::new(&config)?;
        let policy = config.sampling_policy();
        let state = SimulationState::new(config, init)?;
        Ok(Self {
            state,
            stepper,
            policy,
            snapshot_sinks: IndexMap::new(),
            diagnostic_sinks: IndexMap::new(),
            failures: FailureLog::default(),
            last_metrics: None,
            initial_sampled: false,
            warned_non_finite: false,
        })
    }

    // ── Sinks ───────────────────────────────────────────────────

    /// Register a snapshot sink. Returns the sink it replaced, if any.
    pub fn add_snapshot_sink(
        &mut self,
        name: impl Into<String>,
        sink: impl SnapshotSink + 'static,
    ) -> Option<Box<dyn SnapshotSink>> {
        self.snapshot_sinks.insert(name.into(), Box::new(sink))
    }

    /// Register a diagnostic sink. Returns the sink it replaced, if any.
    pub fn add_diagnostic_sink(
        &mut self,
        name: impl Into<String>,
        sink: impl DiagnosticSink + 'static,
    ) -> Option<Box<dyn DiagnosticSink>> {
        self.diagnostic_sinks.insert(name.into(), Box::new(sink))
    }

    /// Builder form of [`add_snapshot_sink`](Self::add_snapshot_sink).
    pub fn with_snapshot_sink(
        mut self,
        name: impl Into<String>,
        sink: impl SnapshotSink + 'static,
    ) -> Self {
        self.add_snapshot_sink(name, sink);
        self
    }

    /// Builder form of [`add_diagnostic_sink`](Self::add_diagnostic_sink).
    pub fn with_diagnostic_sink(
        mut self,
        name: impl Into<String>,
        sink: impl DiagnosticSink + 'static,
    ) -> Self {
        self.add_diagnostic_sink(name, sink);
        self
    }

    /// Unregister a snapshot sink, preserving the order of the rest.
    pub fn remove_snapshot_sink(&mut self, name: &str) -> Option<Box<dyn SnapshotSink>> {
        self.snapshot_sinks.shift_remove(name)
    }

    /// Unregister a diagnostic sink, preserving the order of the rest.
    pub fn remove_diagnostic_sink(&mut self, name: &str) -> Option<Box<dyn DiagnosticSink>> {
        self.diagnostic_sinks.shift_remove(name)
    }

    /// Names of the snapshot sinks, in invocation order.
    pub fn snapshot_sink_names(&self) -> impl Iterator<Item = &str> {
        self.snapshot_sinks.keys().map(String::as_str)
    }

    /// Names of the diagnostic sinks, in invocation order.
    pub fn diagnostic_sink_names(&self) -> impl Iterator<Item = &str> {
        self.diagnostic_sinks.keys().map(String::as_str)
    }

    /// Replace the sampling policy.
    pub fn set_sampling_policy(&mut self, policy: SamplingPolicy) {
        self.policy = policy;
    }

    // ── Stepping ────────────────────────────────────────────────

    /// Run one step, then sample if the new step count matches.
    ///
    /// Before the very first step the initial state is sampled when the
    /// policy matches step 0.
    pub fn step_once(&mut self) -> Result<StepMetrics, StepError> {
        self.sample_initial();
        let metrics = self.stepper.step(&mut self.state)?;
        self.last_metrics = Some(metrics);
        let step = self.state.step();
        if self.policy.matches(step) {
            self.sample(step);
        }
        Ok(metrics)
    }

    /// Run until the step counter reaches the configured step count.
    pub fn run(&mut self) -> Result<RunSummary, StepError> {
        let remaining = self.state.config().steps.saturating_sub(self.state.step().0);
        self.run_for(remaining)
    }

    /// Run `n` more steps, then flush every sink.
    ///
    /// Stops at the first [`StepError`]; sinks are flushed either way.
    pub fn run_for(&mut self, n: u64) -> Result<RunSummary, StepError> {
        let start = Instant::now();
        let first = self.state.step();
        info!(
            from = first.0,
            steps = n,
            width = self.state.config().width,
            height = self.state.config().height,
            workers = self.stepper.workers(),
            boundary = %self.stepper.boundary(),
            "run started"
        );

        self.sample_initial();
        let mut outcome = Ok(());
        for _ in 0..n {
            if let Err(e) = self.step_once() {
                outcome = Err(e);
                break;
            }
        }
        self.flush_sinks();

        let summary = RunSummary {
            steps_completed: self.state.step().0 - first.0,
            final_step: self.state.step(),
            swaps: self.state.grid().swap_count(),
            snapshot_failures: self.failures.snapshot,
            diagnostic_failures: self.failures.diagnostic,
            elapsed_us: micros(start.elapsed()),
        };
        outcome?;
        info!(
            final_step = summary.final_step.0,
            swaps = summary.swaps,
            sink_failures = summary.sink_failures(),
            elapsed_us = summary.elapsed_us,
            "run finished"
        );
        Ok(summary)
    }

    /// Return the stepper to `Idle` after a caught worker panic.
    pub fn recover(&mut self) {
        self.stepper.recover();
    }

    // ── Accessors ───────────────────────────────────────────────

    /// The current state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// The stepper.
    pub fn stepper(&self) -> &TimeStepper {
        &self.stepper
    }

    /// Completed steps.
    pub fn step(&self) -> StepId {
        self.state.step()
    }

    /// The sampling policy in effect.
    pub fn sampling_policy(&self) -> &SamplingPolicy {
        &self.policy
    }

    /// Timings of the most recent step.
    pub fn last_metrics(&self) -> Option<StepMetrics> {
        self.last_metrics
    }

    /// The most recent sink failure.
    pub fn last_sink_failure(&self) -> Option<&SinkFailure> {
        self.failures.last.as_ref()
    }

    /// Snapshot sink failures so far.
    pub fn snapshot_failures(&self) -> u64 {
        self.failures.snapshot
    }

    /// Diagnostic sink failures so far.
    pub fn diagnostic_failures(&self) -> u64 {
        self.failures.diagnostic
    }

    /// Consume the loop and keep the state.
    pub fn into_state(self) -> SimulationState {
        self.state
    }

    // ── Internals ───────────────────────────────────────────────

    fn sample_initial(&mut self) {
        if self.initial_sampled {
            return;
        }
        self.initial_sampled = true;
        let step = self.state.step();
        if step == StepId(0) && self.policy.matches(step) {
            self.sample(step);
        }
    }

    fn sample(&mut self, step: StepId) {
        let u = self.state.view(Field::U);
        let v = self.state.view(Field::V);

        for (name, sink) in &mut self.snapshot_sinks {
            if let Err(e) = sink.write(step, u, v) {
                self.failures.record(name, SinkKind::Snapshot, step, e);
            }
        }

        let stats = self.state.field_stats();
        if !stats.is_finite() && !self.warned_non_finite {
            self.warned_non_finite = true;
            warn!(
                step = step.0,
                non_finite = stats.non_finite,
                "field contains non-finite values"
            );
        }
        for (name, sink) in &mut self.diagnostic_sinks {
            if let Err(e) = sink.report(step, stats.kinetic_energy) {
                self.failures.record(name, SinkKind::Diagnostic, step, e);
            }
        }
    }

    fn flush_sinks(&mut self) {
        let step = self.state.step();
        for (name, sink) in &mut self.snapshot_sinks {
            if let Err(e) = sink.flush() {
                self.failures.record(name, SinkKind::Snapshot, step, e);
            }
        }
        for (name, sink) in &mut self.diagnostic_sinks {
            if let Err(e) = sink.flush() {
                self.failures.record(name, SinkKind::Diagnostic, step, e);
            }
        }
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("step", &self.state.step())
            .field("stepper", &self.stepper)
            .field("policy", &self.policy)
            .field("snapshot_sinks", &self.snapshot_sinks.keys().collect::<Vec<_>>())
            .field(
                "diagnostic_sinks",
                &self.diagnostic_sinks.keys().collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::Uniform;
    use viscid_test_utils::{FailingSink, RecordingDiagnosticSink, RecordingSnapshotSink};

    fn config(steps: u64, sample_every: u64) -> RunConfig {
        RunConfig {
            width: 6,
            height: 6,
            steps,
            sample_every,
            workers: Some(2),
            ..RunConfig::default()
        }
    }

    #[test]
    fn samples_initial_state_and_cadence() {
        let sink = RecordingSnapshotSink::new();
        let log = sink.log();
        let mut sim = Simulation::new(config(10, 5), &Uniform::new(1.0, 0.0))
            .unwrap()
            .with_snapshot_sink("rec", sink);
        let summary = sim.run().unwrap();
        assert_eq!(log.steps(), vec![StepId(0), StepId(5), StepId(10)]);
        assert_eq!(log.flush_count(), 1);
        assert_eq!(summary.steps_completed, 10);
        assert_eq!(summary.final_step, StepId(10));
        assert_eq!(summary.swaps, 10);
    }

    #[test]
    fn milestones_without_cadence() {
        let sink = RecordingSnapshotSink::new();
        let log = sink.log();
        let cfg = RunConfig {
            milestones: vec![7, 2, 2],
            ..config(8, 0)
        };
        let mut sim = Simulation::new(cfg, &Uniform::zero()).unwrap();
        sim.add_snapshot_sink("rec", sink);
        sim.run().unwrap();
        assert_eq!(log.steps(), vec![StepId(2), StepId(7)]);
    }

    #[test]
    fn diagnostic_sink_receives_energy() {
        let sink = RecordingDiagnosticSink::new();
        let log = sink.log();
        let mut sim = Simulation::new(config(4, 2), &Uniform::new(2.0, 0.0))
            .unwrap()
            .with_diagnostic_sink("energy", sink);
        sim.run().unwrap();
        let reports = log.reports();
        assert_eq!(
            reports.iter().map(|r| r.0).collect::<Vec<_>>(),
            vec![StepId(0), StepId(2), StepId(4)]
        );
        // Uniform field under periodic wrap conserves energy exactly.
        for (_, energy) in reports {
            assert_eq!(energy, 36.0 * 0.5 * 4.0);
        }
    }

    #[test]
    fn failing_sink_does_not_abort() {
        let rec = RecordingSnapshotSink::new();
        let log = rec.log();
        let mut sim = Simulation::new(config(6, 3), &Uniform::new(1.0, 1.0))
            .unwrap()
            .with_snapshot_sink("broken", FailingSink::new("disk full"))
            .with_diagnostic_sink("broken-diag", FailingSink::new("nope"))
            .with_snapshot_sink("rec", rec);

        let summary = sim.run().unwrap();
        assert_eq!(summary.final_step, StepId(6));
        // Steps 0, 3, 6 for each failing sink.
        assert_eq!(summary.snapshot_failures, 3);
        assert_eq!(summary.diagnostic_failures, 3);
        assert_eq!(log.steps(), vec![StepId(0), StepId(3), StepId(6)]);

        let last = sim.last_sink_failure().unwrap();
        assert_eq!(last.kind, SinkKind::Diagnostic);
        assert_eq!(last.sink, "broken-diag");
        assert_eq!(last.step, StepId(6));
    }

    #[test]
    fn sinks_run_in_registration_order_and_replace_in_place() {
        let mut sim = Simulation::new(config(1, 1), &Uniform::zero()).unwrap();
        sim.add_snapshot_sink("b", RecordingSnapshotSink::new());
        sim.add_snapshot_sink("a", RecordingSnapshotSink::new());
        assert!(sim
            .add_snapshot_sink("b", RecordingSnapshotSink::new())
            .is_some());
        assert_eq!(sim.snapshot_sink_names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(sim.remove_snapshot_sink("b").is_some());
        assert_eq!(sim.snapshot_sink_names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn run_for_continues_from_current_step() {
        let mut sim = Simulation::new(config(10, 0), &Uniform::zero()).unwrap();
        let first = sim.run_for(3).unwrap();
        assert_eq!(first.steps_completed, 3);
        let rest = sim.run().unwrap();
        assert_eq!(rest.steps_completed, 7);
        assert_eq!(rest.final_step, StepId(10));
        // Already at the configured count.
        assert_eq!(sim.run().unwrap().steps_completed, 0);
    }

    #[test]
    fn initial_state_sampled_once() {
        let sink = RecordingSnapshotSink::new();
        let log = sink.log();
        let mut sim = Simulation::new(config(3, 100), &Uniform::zero())
            .unwrap()
            .with_snapshot_sink("rec", sink);
        sim.step_once().unwrap();
        sim.run().unwrap();
        assert_eq!(log.steps(), vec![StepId(0)]);
    }
}
