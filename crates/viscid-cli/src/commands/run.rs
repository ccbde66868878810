//! `viscid run`: build a configuration, attach sinks, run, report.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::{info, warn};
use viscid::engine::init::{CenteredSquare, GaussianBump, Uniform};
use viscid::engine::{Partition, RunConfig, Simulation};
use viscid::grid::BoundaryPolicy;
use viscid::io::{
    BackgroundSnapshotSink, CentralProfileSink, EnergyHistorySink, MatrixSink, PointListSink,
    VectorFieldSink,
};
use viscid::types::{Initializer, SnapshotSink};

use super::{load_config, warn_if_unstable};

/// Initial condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InitKind {
    /// Free stream (1, 0) plus a Gaussian bump in the centre
    Gaussian,
    /// Zero background with a constant square in the centre
    Square,
    /// (1, 0) everywhere
    Uniform,
}

/// Snapshot file layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `X Y Value` point lists per field
    Points,
    /// One grid row per line, per field
    Matrix,
    /// `X Y U V Magnitude` for both fields
    Vector,
    /// Middle-row profile
    Profile,
}

/// Row-partition strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PartitionKind {
    /// One contiguous block per worker
    Static,
    /// One task per row
    Rows,
    /// Work-stealing with a minimum chunk (`--min-rows`)
    Dynamic,
}

/// Run arguments. Every flag overrides the value from `--config`.
#[derive(Args)]
pub struct RunArgs {
    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Grid columns
    #[arg(long)]
    pub width: Option<usize>,

    /// Grid rows
    #[arg(long)]
    pub height: Option<usize>,

    /// Number of steps
    #[arg(short = 'n', long)]
    pub steps: Option<u64>,

    /// Time step
    #[arg(long)]
    pub dt: Option<f64>,

    /// Diffusion coefficient
    #[arg(long)]
    pub nu: Option<f64>,

    /// Spacing along rows
    #[arg(long)]
    pub dx: Option<f64>,

    /// Spacing along columns
    #[arg(long)]
    pub dy: Option<f64>,

    /// Edge condition (periodic, fixed-zero)
    #[arg(long)]
    pub boundary: Option<BoundaryPolicy>,

    /// Sample every N steps (0 = never)
    #[arg(long)]
    pub sample_every: Option<u64>,

    /// Extra steps to sample at
    #[arg(long, value_delimiter = ',')]
    pub milestones: Vec<u64>,

    /// Worker threads (default: one per CPU)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Row partition strategy
    #[arg(long, value_enum)]
    pub partition: Option<PartitionKind>,

    /// Minimum rows per chunk for the dynamic partition
    #[arg(long, default_value = "16")]
    pub min_rows: usize,

    /// Initial condition
    #[arg(long, value_enum, default_value = "gaussian")]
    pub init: InitKind,

    /// Value of u and v inside the square initial condition
    #[arg(long, default_value = "15.0")]
    pub square_value: f64,

    /// Output directory; no files are written without it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Snapshot format
    #[arg(long, value_enum, default_value = "points")]
    pub format: OutputFormat,

    /// Keep every N-th row and column in vector output
    #[arg(long, default_value = "1")]
    pub stride: usize,

    /// Write snapshots on a background thread with this queue length
    #[arg(long)]
    pub background: Option<usize>,
}

impl RunArgs {
    /// Merge the config file (or defaults) with the flags, then validate.
    pub fn build_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RunConfig::default(),
        };
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.steps {
            config.steps = v;
        }
        if let Some(v) = self.dt {
            config.dt = v;
        }
        if let Some(v) = self.nu {
            config.nu = v;
        }
        if let Some(v) = self.dx {
            config.dx = v;
        }
        if let Some(v) = self.dy {
            config.dy = v;
        }
        if let Some(v) = self.boundary {
            config.boundary = v;
        }
        if let Some(v) = self.sample_every {
            config.sample_every = v;
        }
        if !self.milestones.is_empty() {
            config.milestones = self.milestones.clone();
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        if let Some(kind) = self.partition {
            config.partition = match kind {
                PartitionKind::Static => Partition::Static,
                PartitionKind::Rows => Partition::Rows,
                PartitionKind::Dynamic => Partition::Dynamic {
                    min_rows: self.min_rows,
                },
            };
        }
        config.validate().context("invalid run configuration")?;
        Ok(config)
    }

    fn initializer(&self, config: &RunConfig) -> Box<dyn Initializer> {
        match self.init {
            InitKind::Gaussian => Box::new(GaussianBump::centered(config.width, config.height)),
            InitKind::Square => Box::new(CenteredSquare::centered(
                config.width,
                config.height,
                (self.square_value, self.square_value),
            )),
            InitKind::Uniform => Box::new(Uniform::new(1.0, 0.0)),
        }
    }

    fn attach_sinks(&self, sim: &mut Simulation) -> Result<()> {
        let Some(dir) = &self.output else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;

        let sink: Box<dyn SnapshotSink> = match self.format {
            OutputFormat::Points => Box::new(PointListSink::new(dir)),
            OutputFormat::Matrix => Box::new(MatrixSink::new(dir)),
            OutputFormat::Vector => Box::new(VectorFieldSink::new(dir).with_stride(self.stride)),
            OutputFormat::Profile => Box::new(CentralProfileSink::new(dir)),
        };
        let name = format!("{:?}", self.format).to_lowercase();
        match self.background {
            Some(capacity) => {
                let background = BackgroundSnapshotSink::new(sink, capacity)
                    .context("failed to start background writer")?;
                sim.add_snapshot_sink(name, background);
            }
            None => {
                sim.add_snapshot_sink(name, sink);
            }
        }
        sim.add_diagnostic_sink("energy", EnergyHistorySink::new(dir));
        Ok(())
    }
}

/// Run the simulation described by `args`.
pub fn execute(args: RunArgs) -> Result<()> {
    let config = args.build_config()?;
    let stability = warn_if_unstable(&config);
    info!(
        width = config.width,
        height = config.height,
        steps = config.steps,
        dt = config.dt,
        nu = config.nu,
        boundary = %config.boundary,
        partition = %config.partition,
        stability,
        "configuration"
    );

    let init = args.initializer(&config);
    let start = Instant::now();
    let mut sim =
        Simulation::new(config, init.as_ref()).context("failed to initialize simulation")?;
    args.attach_sinks(&mut sim)?;

    let summary = sim.run().context("simulation stopped")?;
    let wall = start.elapsed();

    if summary.sink_failures() > 0 {
        warn!(
            snapshot_failures = summary.snapshot_failures,
            diagnostic_failures = summary.diagnostic_failures,
            "some output could not be written"
        );
    }
    let stats = sim.state().field_stats();
    info!(
        steps = summary.steps_completed,
        kinetic_energy = stats.kinetic_energy,
        max_speed = stats.max_speed,
        non_finite = stats.non_finite,
        "final state"
    );
    info!("wall time: {:.6} s", wall.as_secs_f64());
    Ok(())
}
