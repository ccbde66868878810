//! Data-parallel interior update over a dedicated rayon pool.
//!
//! The next plane's interior rows are split into disjoint `&mut` chunks,
//! so no cell has two writers and no locking is needed. The current plane
//! is shared read-only by every worker. `ThreadPool::install` returns only
//! after every chunk of both fields has been written; that return is the
//! barrier the boundary pass waits on.

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::debug;
use viscid_grid::{GridBuffer, Plane};

use crate::config::{ConfigError, Partition};
use crate::kernel::StencilKernel;

/// Owns the worker pool and the row-partition strategy.
pub struct ParallelUpdatePhase {
    pool: ThreadPool,
    partition: Partition,
    workers: usize,
}

impl ParallelUpdatePhase {
    /// Build a pool of exactly `workers` threads.
    pub fn new(workers: usize, partition: Partition) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "workers",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("viscid-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::WorkerPool {
                reason: e.to_string(),
            })?;
        debug!(workers, %partition, "update pool ready");
        Ok(Self {
            pool,
            partition,
            workers,
        })
    }

    /// Number of threads in the pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The partition strategy in use.
    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Write the interior of both next planes from the current planes.
    ///
    /// Returns after every interior cell of both fields is written. Border
    /// cells of the next planes are not touched. A panic in a worker is
    /// propagated to the caller once the pool has joined.
    pub fn run(&self, kernel: &StencilKernel, grid: &mut GridBuffer) {
        let staged: Vec<_> = grid.staged_mut().collect();
        self.pool.install(|| {
            staged
                .into_par_iter()
                .for_each(|(_, current, next)| self.update_plane(kernel, current, next));
        });
    }

    fn update_plane(&self, kernel: &StencilKernel, current: &Plane, next: &mut Plane) {
        let width = current.width();
        let interior_rows = current.height() - 2;
        let rows = next.interior_rows_mut();

        match self.partition {
            Partition::Static => {
                let block = interior_rows.div_ceil(self.workers).max(1);
                rows.par_chunks_mut(block * width)
                    .enumerate()
                    .for_each(|(b, chunk)| {
                        let first = 1 + b * block;
                        for (k, out) in chunk.chunks_mut(width).enumerate() {
                            kernel.update_row(current, first + k, out);
                        }
                    });
            }
            Partition::Rows => {
                rows.par_chunks_mut(width)
                    .enumerate()
                    .for_each(|(r, out)| kernel.update_row(current, r + 1, out));
            }
            Partition::Dynamic { min_rows } => {
                rows.par_chunks_mut(width)
                    .enumerate()
                    .with_min_len(min_rows.max(1))
                    .for_each(|(r, out)| kernel.update_row(current, r + 1, out));
            }
        }
    }
}

impl std::fmt::Debug for ParallelUpdatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelUpdatePhase")
            .field("workers", &self.workers)
            .field("partition", &self.partition)
            .finish_non_exhaustive()
    }
}
