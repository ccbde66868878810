//! Parallel stencil time-stepping engine for viscid.
//!
//! Advances the `u` and `v` velocity components under pure diffusion with
//! an explicit 5-point Laplacian. Only the interior update is parallel;
//! boundary application, the buffer swap, sampling and the step loop all
//! run on the calling thread.
//!
//! ```text
//! Simulation (loop, sampling, sinks)
//! └── TimeStepper (Idle → Updating → BoundaryApplying → Swapped → Idle)
//!     ├── ParallelUpdatePhase (rayon pool, Partition) → StencilKernel
//!     └── BoundaryPolicy (viscid-grid)
//! SimulationState (GridBuffer + StepId + RunConfig)
//! ```
//!
//! # Example
//!
//! ```
//! use viscid_engine::{RunConfig, Simulation};
//! use viscid_engine::init::Uniform;
//!
//! let config = RunConfig {
//!     width: 16,
//!     height: 16,
//!     steps: 10,
//!     ..RunConfig::default()
//! };
//! let mut sim = Simulation::new(config, &Uniform::new(1.0, 0.0)).unwrap();
//! let summary = sim.run().unwrap();
//! assert_eq!(summary.final_step.0, 10);
//! assert_eq!(summary.swaps, 10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod init;
pub mod kernel;
pub mod metrics;
pub mod parallel;
pub mod sampling;
pub mod simulation;
pub mod state;
pub mod stepper;

pub use config::{ConfigError, Partition, RunConfig};
pub use diagnostics::FieldStats;
pub use kernel::StencilKernel;
pub use metrics::{RunSummary, StepMetrics};
pub use parallel::ParallelUpdatePhase;
pub use sampling::SamplingPolicy;
pub use simulation::{Simulation, SinkFailure, SinkKind};
pub use state::SimulationState;
pub use stepper::{StepPhase, TimeStepper};
