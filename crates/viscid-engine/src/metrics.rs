//! Per-step timings and the end-of-run summary.

use viscid_core::StepId;

/// Timing breakdown for one completed step, in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall time of the whole step.
    pub total_us: u64,
    /// Parallel interior update of both fields.
    pub update_us: u64,
    /// Boundary application on both next planes.
    pub boundary_us: u64,
    /// Buffer role exchange.
    pub swap_us: u64,
    /// Workers in the update pool.
    pub workers: usize,
}

/// What a call to [`Simulation::run`](crate::Simulation::run) or
/// [`run_for`](crate::Simulation::run_for) accomplished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps executed by this call.
    pub steps_completed: u64,
    /// Step counter when the call returned.
    pub final_step: StepId,
    /// Total buffer swaps since allocation.
    pub swaps: u64,
    /// Snapshot sink failures over the whole run so far.
    pub snapshot_failures: u64,
    /// Diagnostic sink failures over the whole run so far.
    pub diagnostic_failures: u64,
    /// Wall time of this call.
    pub elapsed_us: u64,
}

impl RunSummary {
    /// Total sink failures of either kind.
    pub fn sink_failures(&self) -> u64 {
        self.snapshot_failures + self.diagnostic_failures
    }
}

pub(crate) fn micros(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
