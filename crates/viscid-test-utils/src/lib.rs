//! Test utilities and mock collaborators for viscid development.
//!
//! Provides recording implementations of [`SnapshotSink`] and
//! [`DiagnosticSink`] whose logs stay readable after the sink has been
//! boxed into a simulation, plus the initializer and failure fixtures in
//! [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex, MutexGuard};

use viscid_core::{DiagnosticSink, PlaneView, SinkError, SnapshotSink, StepId};

pub use fixtures::{checker_noise, spike, FailingSink};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking test thread poisons the lock; the data is still usable.
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// One captured snapshot: owned copies of both planes.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedSnapshot {
    pub step: StepId,
    pub width: usize,
    pub height: usize,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

#[derive(Debug, Default)]
struct SnapshotRecord {
    snapshots: Vec<RecordedSnapshot>,
    flushes: usize,
}

/// Shared handle onto what a [`RecordingSnapshotSink`] captured.
#[derive(Clone, Debug, Default)]
pub struct SnapshotLog(Arc<Mutex<SnapshotRecord>>);

impl SnapshotLog {
    /// Steps written, in call order.
    pub fn steps(&self) -> Vec<StepId> {
        lock(&self.0).snapshots.iter().map(|s| s.step).collect()
    }

    /// Every captured snapshot.
    pub fn snapshots(&self) -> Vec<RecordedSnapshot> {
        lock(&self.0).snapshots.clone()
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<RecordedSnapshot> {
        lock(&self.0).snapshots.last().cloned()
    }

    /// How many times `flush` was called.
    pub fn flush_count(&self) -> usize {
        lock(&self.0).flushes
    }
}

/// Copies every written plane into a [`SnapshotLog`].
#[derive(Debug, Default)]
pub struct RecordingSnapshotSink {
    log: SnapshotLog,
}

impl RecordingSnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that outlives moving the sink into a simulation.
    pub fn log(&self) -> SnapshotLog {
        self.log.clone()
    }
}

impl SnapshotSink for RecordingSnapshotSink {
    fn write(&mut self, step: StepId, u: PlaneView<'_>, v: PlaneView<'_>) -> Result<(), SinkError> {
        lock(&self.log.0).snapshots.push(RecordedSnapshot {
            step,
            width: u.width(),
            height: u.height(),
            u: u.as_slice().to_vec(),
            v: v.as_slice().to_vec(),
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        lock(&self.log.0).flushes += 1;
        Ok(())
    }
}

/// Shared handle onto what a [`RecordingDiagnosticSink`] captured.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog(Arc<Mutex<Vec<(StepId, f64)>>>);

impl DiagnosticLog {
    /// `(step, metric)` pairs in call order.
    pub fn reports(&self) -> Vec<(StepId, f64)> {
        lock(&self.0).clone()
    }
}

/// Records every reported metric into a [`DiagnosticLog`].
#[derive(Debug, Default)]
pub struct RecordingDiagnosticSink {
    log: DiagnosticLog,
}

impl RecordingDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that outlives moving the sink into a simulation.
    pub fn log(&self) -> DiagnosticLog {
        self.log.clone()
    }
}

impl DiagnosticSink for RecordingDiagnosticSink {
    fn report(&mut self, step: StepId, metric: f64) -> Result<(), SinkError> {
        lock(&self.log.0).push((step, metric));
        Ok(())
    }
}
