//! Viscid: a parallel finite-difference diffusion solver for 2D velocity
//! fields.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all viscid sub-crates. For most users, adding `viscid` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use viscid::prelude::*;
//!
//! let config = RunConfig {
//!     width: 32,
//!     height: 32,
//!     steps: 50,
//!     sample_every: 25,
//!     boundary: BoundaryPolicy::Periodic,
//!     ..RunConfig::default()
//! };
//! let init = GaussianBump::centered(config.width, config.height);
//! let mut sim = Simulation::new(config, &init).unwrap();
//! let summary = sim.run().unwrap();
//! assert_eq!(summary.final_step, StepId(50));
//!
//! let stats = sim.state().field_stats();
//! assert!(stats.is_finite());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `viscid-core` | `Field`, `StepId`, `PlaneView`, errors, collaborator traits |
//! | [`grid`] | `viscid-grid` | `Plane`, double-buffered `GridBuffer`, `BoundaryPolicy` |
//! | [`engine`] | `viscid-engine` | Config, kernel, parallel update, stepper, loop, initializers |
//! | [`io`] | `viscid-io` | Text-file sinks and the background writer |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`viscid-core`).
///
/// Contains the error enums and the collaborator traits
/// ([`types::Initializer`], [`types::SnapshotSink`],
/// [`types::DiagnosticSink`]).
pub use viscid_core as types;

/// Plane storage, double buffering and edge conditions (`viscid-grid`).
pub use viscid_grid as grid;

/// The time-stepping engine (`viscid-engine`).
///
/// [`engine::Simulation`] runs the loop; [`engine::TimeStepper`] advances
/// one step at a time for callers that drive their own loop.
pub use viscid_engine as engine;

/// File-backed sinks (`viscid-io`).
pub use viscid_io as io;

/// Common imports for typical viscid usage.
///
/// ```rust
/// use viscid::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use viscid_core::{
        DiagnosticSink, Field, Initializer, PlaneView, SnapshotSink, StepId,
    };

    // Errors
    pub use viscid_core::{GridError, SinkError, StepError};

    // Grid
    pub use viscid_grid::BoundaryPolicy;

    // Engine
    pub use viscid_engine::init::{CenteredSquare, GaussianBump, Uniform};
    pub use viscid_engine::{
        ConfigError, FieldStats, Partition, RunConfig, RunSummary, Simulation, SimulationState,
        StepMetrics, TimeStepper,
    };

    // Sinks
    pub use viscid_io::{
        BackgroundSnapshotSink, CentralProfileSink, EnergyHistorySink, MatrixSink, PointListSink,
        VectorFieldSink,
    };
}
