//! One full time step as a small state machine.
//!
//! ```text
//! Idle ─► Updating ─► BoundaryApplying ─► Swapped ─► Idle
//! ```
//!
//! Until the swap, every write lands in the next planes, so a step that
//! stops part-way leaves the current planes at the last completed step.

use std::fmt;
use std::time::Instant;

use tracing::debug;
use viscid_core::{Field, StepError};
use viscid_grid::BoundaryPolicy;

use crate::config::{ConfigError, RunConfig};
use crate::kernel::StencilKernel;
use crate::metrics::{micros, StepMetrics};
use crate::parallel::ParallelUpdatePhase;
use crate::state::SimulationState;

/// Where the stepper is within a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StepPhase {
    /// Between steps.
    #[default]
    Idle,
    /// Workers are writing the next planes' interiors.
    Updating,
    /// The boundary policy is filling the next planes' borders.
    BoundaryApplying,
    /// Buffer roles have been exchanged.
    Swapped,
}

impl StepPhase {
    /// Lower-case name for logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Updating => "updating",
            Self::BoundaryApplying => "boundary-applying",
            Self::Swapped => "swapped",
        }
    }
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Advances a [`SimulationState`] one step at a time.
#[derive(Debug)]
pub struct TimeStepper {
    kernel: StencilKernel,
    boundary: BoundaryPolicy,
    update: ParallelUpdatePhase,
    phase: StepPhase,
    shape: (usize, usize),
}

impl TimeStepper {
    /// Build the kernel, boundary policy and worker pool for `config`.
    pub fn new(config: &RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let update = ParallelUpdatePhase::new(config.resolved_workers(), config.partition)?;
        Ok(Self {
            kernel: StencilKernel::from_config(config),
            boundary: config.boundary,
            update,
            phase: StepPhase::Idle,
            shape: (config.width, config.height),
        })
    }

    /// Current phase. `Idle` unless a previous step was interrupted.
    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Boundary policy applied after each update.
    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// Worker threads in the update pool.
    pub fn workers(&self) -> usize {
        self.update.workers()
    }

    /// Run one complete step and advance the step counter by 1.
    ///
    /// On error the state is untouched.
    pub fn step(&mut self, state: &mut SimulationState) -> Result<StepMetrics, StepError> {
        if self.phase != StepPhase::Idle {
            return Err(StepError::Interrupted {
                phase: self.phase.name(),
            });
        }
        let found = state.grid().shape();
        if found != self.shape {
            return Err(StepError::ShapeMismatch {
                expected: self.shape,
                found,
            });
        }

        let start = Instant::now();

        self.phase = StepPhase::Updating;
        self.update.run(&self.kernel, state.grid_mut());
        let update_done = Instant::now();

        self.phase = StepPhase::BoundaryApplying;
        for field in Field::ALL {
            self.boundary.apply(state.grid_mut().next_mut(field));
        }
        let boundary_done = Instant::now();

        self.phase = StepPhase::Swapped;
        state.commit();
        let swap_done = Instant::now();

        self.phase = StepPhase::Idle;

        let metrics = StepMetrics {
            total_us: micros(swap_done - start),
            update_us: micros(update_done - start),
            boundary_us: micros(boundary_done - update_done),
            swap_us: micros(swap_done - boundary_done),
            workers: self.update.workers(),
        };
        debug!(
            step = %state.step(),
            update_us = metrics.update_us,
            boundary_us = metrics.boundary_us,
            swap_us = metrics.swap_us,
            "step complete"
        );
        Ok(metrics)
    }

    /// Return an interrupted stepper to `Idle`.
    ///
    /// Safe after a caught worker panic: the current planes still hold the
    /// last completed step and the next planes are fully rewritten by the
    /// following step.
    pub fn recover(&mut self) {
        if self.phase != StepPhase::Idle {
            debug!(phase = %self.phase, "stepper recovered");
            self.phase = StepPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::Uniform;
    use viscid_core::StepId;

    fn config(width: usize, height: usize) -> RunConfig {
        RunConfig {
            width,
            height,
            workers: Some(2),
            ..RunConfig::default()
        }
    }

    #[test]
    fn step_advances_counter_and_returns_to_idle() {
        let cfg = config(6, 5);
        let mut stepper = TimeStepper::new(&cfg).unwrap();
        let mut state = SimulationState::new(cfg, &Uniform::new(1.0, 0.5)).unwrap();
        let metrics = stepper.step(&mut state).unwrap();
        assert_eq!(metrics.workers, 2);
        assert_eq!(state.step(), StepId(1));
        assert_eq!(state.grid().swap_count(), 1);
        assert_eq!(stepper.phase(), StepPhase::Idle);
    }

    #[test]
    fn interrupted_stepper_refuses_until_recovered() {
        let cfg = config(5, 5);
        let mut stepper = TimeStepper::new(&cfg).unwrap();
        let mut state = SimulationState::new(cfg, &Uniform::new(1.0, 0.0)).unwrap();
        stepper.phase = StepPhase::Updating;

        assert_eq!(
            stepper.step(&mut state),
            Err(StepError::Interrupted { phase: "updating" })
        );
        assert_eq!(state.step(), StepId(0));

        stepper.recover();
        assert_eq!(stepper.phase(), StepPhase::Idle);
        assert!(stepper.step(&mut state).is_ok());
    }

    #[test]
    fn shape_mismatch_leaves_state_untouched() {
        let mut stepper = TimeStepper::new(&config(8, 8)).unwrap();
        let mut state = SimulationState::new(config(8, 4), &Uniform::new(3.0, 0.0)).unwrap();
        assert_eq!(
            stepper.step(&mut state),
            Err(StepError::ShapeMismatch {
                expected: (8, 8),
                found: (8, 4),
            })
        );
        assert_eq!(state.step(), StepId(0));
        assert_eq!(stepper.phase(), StepPhase::Idle);
    }

    #[test]
    fn phase_names() {
        assert_eq!(StepPhase::BoundaryApplying.to_string(), "boundary-applying");
        assert_eq!(StepPhase::default(), StepPhase::Idle);
    }
}
