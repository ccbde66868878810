//! Run configuration, validation, and error types.
//!
//! [`RunConfig`] is the immutable input for a run. [`validate()`](RunConfig::validate)
//! checks every structural and physical constraint up front, so an invalid
//! combination fails before any plane is allocated.

use std::error::Error;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use viscid_core::GridError;
use viscid_grid::plane::check_dimensions;
use viscid_grid::BoundaryPolicy;

use crate::sampling::SamplingPolicy;

// ── Partition ──────────────────────────────────────────────────────

/// How the interior rows are split across workers.
///
/// Affects load balance and throughput only. Every strategy produces
/// bit-identical planes because each cell depends solely on reads of the
/// current plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum Partition {
    /// One contiguous block of rows per worker.
    #[default]
    Static,
    /// One task per interior row.
    Rows,
    /// Work-stealing over rows; a worker never takes fewer than
    /// `min_rows` rows at once.
    Dynamic {
        /// Minimum rows per stolen chunk. Must be at least 1.
        min_rows: usize,
    },
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Rows => write!(f, "rows"),
            Self::Dynamic { min_rows } => write!(f, "dynamic({min_rows})"),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`RunConfig`] or building the
/// objects it describes. All of them abort initialization before step 0.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Grid too small to have an interior, or its storage could not be
    /// obtained.
    Grid(GridError),
    /// A constant is non-physical or out of range.
    InvalidValue {
        /// Name of the offending option.
        key: &'static str,
        /// The rejected value, formatted.
        value: String,
        /// Which constraint it violates.
        reason: String,
    },
    /// The worker pool could not be created.
    WorkerPool {
        /// Description from the thread-pool builder.
        reason: String,
    },
    /// A configuration file could not be read or written.
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error, formatted.
        reason: String,
    },
    /// A configuration file is not valid JSON for a [`RunConfig`].
    Parse {
        /// Description from the deserializer.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value for '{key}': {value} ({reason})")
            }
            Self::WorkerPool { reason } => write!(f, "worker pool: {reason}"),
            Self::Io { path, reason } => write!(f, "{path}: {reason}"),
            Self::Parse { reason } => write!(f, "parse error: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ── RunConfig ──────────────────────────────────────────────────────

/// Complete, immutable configuration for one run.
///
/// Missing keys in a JSON file take the [`Default`] values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of columns (NY in the column-index sense). Minimum 3.
    pub width: usize,
    /// Number of rows. Minimum 3.
    pub height: usize,
    /// Total number of steps (NT) that [`Simulation::run`](crate::Simulation::run) executes.
    pub steps: u64,
    /// Time step Δt. Finite and > 0.
    pub dt: f64,
    /// Diffusion coefficient ν. Finite and >= 0.
    pub nu: f64,
    /// Spacing Δx along the row index `i`. Finite and > 0.
    pub dx: f64,
    /// Spacing Δy along the column index `j`. Finite and > 0.
    pub dy: f64,
    /// Edge condition applied after every interior update.
    pub boundary: BoundaryPolicy,
    /// Sample every K completed steps; 0 disables periodic sampling.
    pub sample_every: u64,
    /// Additional explicit step counts to sample at.
    pub milestones: Vec<u64>,
    /// Worker threads for the interior update. `None` = rayon's default
    /// (one per logical CPU).
    pub workers: Option<usize>,
    /// How interior rows are split across workers.
    pub partition: Partition,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            steps: 1000,
            dt: 0.001,
            nu: 0.01,
            dx: 1.0,
            dy: 1.0,
            boundary: BoundaryPolicy::Periodic,
            sample_every: 0,
            milestones: Vec::new(),
            workers: None,
            partition: Partition::Static,
        }
    }
}

impl RunConfig {
    /// Validate all constraints. Never allocates grid storage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Grid must have an interior and a representable cell count.
        check_dimensions(self.width, self.height)?;
        // 2. Time step.
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::invalid("dt", self.dt, "must be finite and > 0"));
        }
        // 3. Viscosity. Zero is allowed and makes every step an identity on
        //    the interior.
        if !self.nu.is_finite() || self.nu < 0.0 {
            return Err(ConfigError::invalid("nu", self.nu, "must be finite and >= 0"));
        }
        // 4. Spacings. Their squares are divisors in the kernel.
        for (key, value) in [("dx", self.dx), ("dy", self.dy)] {
            if !value.is_finite() || value <= 0.0 || !(value * value).is_normal() {
                return Err(ConfigError::invalid(
                    key,
                    value,
                    "must be finite and > 0 with a normal square",
                ));
            }
        }
        // 5. Worker count, if pinned.
        if self.workers == Some(0) {
            return Err(ConfigError::invalid("workers", 0, "must be at least 1"));
        }
        // 6. Dynamic chunk size.
        if let Partition::Dynamic { min_rows: 0 } = self.partition {
            return Err(ConfigError::invalid(
                "partition.min_rows",
                0,
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Resolve the worker count, applying rayon's default when unset.
    pub fn resolved_workers(&self) -> usize {
        self.workers
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }

    /// ν·Δt·(1/Δx² + 1/Δy²).
    ///
    /// The explicit scheme is stable only while this stays below a
    /// problem-dependent threshold (0.5 for the plain 5-point stencil).
    /// Reported, never enforced.
    pub fn stability_number(&self) -> f64 {
        self.nu * self.dt * (1.0 / (self.dx * self.dx) + 1.0 / (self.dy * self.dy))
    }

    /// The sampling policy described by `sample_every` and `milestones`.
    pub fn sampling_policy(&self) -> SamplingPolicy {
        SamplingPolicy::every(self.sample_every).with_milestones(self.milestones.iter().copied())
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_json_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document without validating it.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
