//! The explicitly owned state of one run.

use tracing::debug;
use viscid_core::{Field, Initializer, PlaneView, StepId};
use viscid_grid::GridBuffer;

use crate::config::{ConfigError, RunConfig};
use crate::diagnostics::FieldStats;

/// Grid planes, the completed-step counter and the run constants.
///
/// Mutated only by [`TimeStepper`](crate::TimeStepper) on the driving
/// thread. Readers see the current planes, which always hold the state
/// after [`step()`](Self::step) completed steps.
#[derive(Debug)]
pub struct SimulationState {
    grid: GridBuffer,
    step: StepId,
    config: RunConfig,
}

impl SimulationState {
    /// Validate `config`, allocate the grid and fill it from `init`.
    ///
    /// Nothing is allocated when validation fails.
    pub fn new(config: RunConfig, init: &dyn Initializer) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut grid = GridBuffer::allocate(config.width, config.height)?;
        grid.initialize(init);
        debug!(
            width = config.width,
            height = config.height,
            "simulation state initialized"
        );
        Ok(Self {
            grid,
            step: StepId::default(),
            config,
        })
    }

    /// The double-buffered planes.
    pub fn grid(&self) -> &GridBuffer {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut GridBuffer {
        &mut self.grid
    }

    /// Completed steps.
    pub fn step(&self) -> StepId {
        self.step
    }

    /// Run constants.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Read-only view of a field's current plane.
    pub fn view(&self, field: Field) -> PlaneView<'_> {
        self.grid.view(field)
    }

    /// Statistics over the current planes.
    pub fn field_stats(&self) -> FieldStats {
        FieldStats::compute(self.view(Field::U), self.view(Field::V))
    }

    /// Swap buffer roles and count the step as completed.
    pub(crate) fn commit(&mut self) {
        self.grid.swap();
        self.step = self.step.next();
    }
}
