//! Error types for the viscid solver.
//!
//! Organized by subsystem: grid allocation (fatal, surfaced before any
//! step runs), time stepping, and collaborator sinks (non-fatal, reported
//! by the simulation loop and then ignored).

use std::error::Error;
use std::fmt;

/// Errors from grid construction.
///
/// Both variants are unrecoverable: they abort initialization before any
/// step runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The grid has no interior: width or height is below 3.
    InvalidDimensions {
        /// Requested number of columns.
        width: usize,
        /// Requested number of rows.
        height: usize,
    },
    /// Backing storage for a plane could not be obtained, either because
    /// the cell count overflows `usize` or the allocator refused it.
    AllocationFailure {
        /// Number of `f64` cells that were requested for one plane.
        cells: usize,
    },
}

impl GridError {
    /// Smallest width or height that leaves at least one interior cell.
    pub const MIN_EXTENT: usize = 3;
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(
                f,
                "invalid grid dimensions {width}x{height}: width and height must both be >= {}",
                Self::MIN_EXTENT
            ),
            Self::AllocationFailure { cells } => {
                write!(f, "could not allocate a plane of {cells} cells")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from the time stepper during `step()`.
///
/// The stencil kernel itself cannot fail; these cover misuse of the
/// stepper. In every case the current planes are left exactly as they
/// were after the last completed step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// A previous step stopped part-way (a worker panicked and the panic
    /// was caught upstream). Call `recover()` on the stepper to continue.
    Interrupted {
        /// Name of the phase the stepper was stuck in.
        phase: &'static str,
    },
    /// The state's grid does not have the shape the stepper was built for.
    ShapeMismatch {
        /// `(width, height)` the stepper was configured with.
        expected: (usize, usize),
        /// `(width, height)` of the grid that was passed in.
        found: (usize, usize),
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupted { phase } => {
                write!(f, "previous step was interrupted during the {phase} phase")
            }
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "grid shape mismatch: stepper expects {}x{}, state has {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
        }
    }
}

impl Error for StepError {}

/// Errors from snapshot and diagnostic sinks.
///
/// Never fatal: the simulation loop logs them, counts them, and keeps
/// stepping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkError {
    /// Output could not be opened or written.
    Io {
        /// Human-readable description, usually including the path.
        reason: String,
    },
    /// The sink was shut down and accepts no more data.
    Closed,
    /// The sink declined this sample (e.g. its queue is full).
    Rejected {
        /// Why the sample was dropped.
        reason: String,
    },
}

impl SinkError {
    /// Build an [`SinkError::Io`] from an I/O error and the path involved.
    pub fn io(path: impl fmt::Display, err: std::io::Error) -> Self {
        Self::Io {
            reason: format!("{path}: {err}"),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { reason } => write!(f, "sink i/o failed: {reason}"),
            Self::Closed => write!(f, "sink is closed"),
            Self::Rejected { reason } => write!(f, "sample rejected: {reason}"),
        }
    }
}

impl Error for SinkError {}
