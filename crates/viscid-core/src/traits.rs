//! Collaborator traits: where initial values come from and where sampled
//! state goes.

use crate::error::SinkError;
use crate::id::StepId;
use crate::view::PlaneView;

/// Supplies the starting `(u, v)` value of every grid cell.
///
/// Invoked once per cell (borders included) before step 0. Must be
/// deterministic: the same coordinates and configuration always give the
/// same values.
///
/// Any `Fn(usize, usize) -> (f64, f64)` closure is an initializer, so ad
/// hoc fields need no wrapper type:
///
/// ```
/// use viscid_core::Initializer;
///
/// let spike = |i: usize, j: usize| -> (f64, f64) {
///     if (i, j) == (2, 2) { (2.0, 0.0) } else { (1.0, 0.0) }
/// };
/// assert_eq!(spike.value(2, 2), (2.0, 0.0));
/// assert_eq!(spike.value(0, 4), (1.0, 0.0));
/// ```
pub trait Initializer {
    /// Initial `(u, v)` at row `i`, column `j`.
    fn value(&self, i: usize, j: usize) -> (f64, f64);
}

impl<F> Initializer for F
where
    F: Fn(usize, usize) -> (f64, f64),
{
    fn value(&self, i: usize, j: usize) -> (f64, f64) {
        self(i, j)
    }
}

/// Persists sampled field state.
///
/// Receives read-only views of both fields' current planes. A failing
/// sink never aborts the simulation; the loop logs the error and moves on.
pub trait SnapshotSink: Send {
    /// Persist the state reached after `step` completed steps.
    fn write(&mut self, step: StepId, u: PlaneView<'_>, v: PlaneView<'_>) -> Result<(), SinkError>;

    /// Flush buffered output. Called once when the loop finishes.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for Box<S> {
    fn write(&mut self, step: StepId, u: PlaneView<'_>, v: PlaneView<'_>) -> Result<(), SinkError> {
        (**self).write(step, u, v)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

/// Consumes a scalar metric (total kinetic energy) at the sampling cadence.
pub trait DiagnosticSink: Send {
    /// Record `metric` for the state reached after `step` completed steps.
    fn report(&mut self, step: StepId, metric: f64) -> Result<(), SinkError>;

    /// Flush buffered output. Called once when the loop finishes.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for Box<D> {
    fn report(&mut self, step: StepId, metric: f64) -> Result<(), SinkError> {
        (**self).report(step, metric)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}
