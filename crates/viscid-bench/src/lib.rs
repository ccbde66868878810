//! Benchmark profiles for the viscid solver.
//!
//! - [`reference_profile`]: 256x256 grid (64K cells), the Gaussian bump.
//! - [`stress_profile`]: 1024x1024 grid (~1M cells).
//! - [`partitions`]: every row-partition strategy worth comparing.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use viscid_engine::{Partition, RunConfig};
use viscid_grid::BoundaryPolicy;

/// 256x256 periodic run on a [0, 2]² domain: ν = 0.05, Δx = Δy = 2/255.
///
/// Δt = 0.0001 keeps the stability number ν·Δt·(2/Δx²) near 0.16, so
/// repeated benchmark iterations never overflow into non-finite values.
pub fn reference_profile(workers: usize, partition: Partition) -> RunConfig {
    let spacing = 2.0 / 255.0;
    RunConfig {
        width: 256,
        height: 256,
        steps: 10,
        dt: 0.0001,
        nu: 0.05,
        dx: spacing,
        dy: spacing,
        boundary: BoundaryPolicy::Periodic,
        sample_every: 0,
        milestones: Vec::new(),
        workers: Some(workers),
        partition,
    }
}

/// Same physics as [`reference_profile`] at 16x the cell count.
pub fn stress_profile(workers: usize, partition: Partition) -> RunConfig {
    RunConfig {
        width: 1024,
        height: 1024,
        ..reference_profile(workers, partition)
    }
}

/// Strategies compared in the step benchmarks.
pub fn partitions() -> [Partition; 3] {
    [
        Partition::Static,
        Partition::Rows,
        Partition::Dynamic { min_rows: 8 },
    ]
}
