//! Combined `(u, v)` files for vector and profile plots.

use std::io::{self, Write};
use std::path::PathBuf;

use viscid_core::{PlaneView, SinkError, SnapshotSink, StepId};

use crate::write_file;

fn magnitude(u: f64, v: f64) -> f64 {
    (u * u + v * v).sqrt()
}

/// Writes `vector_field_step{N}.dat`: header `X Y U V Magnitude`, then one
/// line per cell whose row and column are multiples of the stride.
#[derive(Clone, Debug)]
pub struct VectorFieldSink {
    dir: PathBuf,
    stride: usize,
}

impl VectorFieldSink {
    /// Every cell, written into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stride: 1,
        }
    }

    /// Keep only every `stride`-th row and column. 0 is treated as 1.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride.max(1);
        self
    }

    /// Path of the file for `step`.
    pub fn path(&self, step: StepId) -> PathBuf {
        self.dir.join(format!("vector_field_step{step}.dat"))
    }
}

/// Header plus `i j u v |(u, v)|` for every `stride`-th cell.
pub fn write_vectors(
    out: &mut impl Write,
    u: PlaneView<'_>,
    v: PlaneView<'_>,
    stride: usize,
) -> io::Result<()> {
    writeln!(out, "X Y U V Magnitude")?;
    for i in (0..u.height()).step_by(stride) {
        for j in (0..u.width()).step_by(stride) {
            let (a, b) = (u.get(i, j), v.get(i, j));
            writeln!(out, "{i} {j} {a:.6} {b:.6} {:.6}", magnitude(a, b))?;
        }
    }
    Ok(())
}

impl SnapshotSink for VectorFieldSink {
    fn write(&mut self, step: StepId, u: PlaneView<'_>, v: PlaneView<'_>) -> Result<(), SinkError> {
        let stride = self.stride;
        write_file(&self.path(step), |out| write_vectors(out, u, v, stride))
    }
}

/// Writes `central_profile_step{N}.dat`: the middle grid row as
/// `Position U V Magnitude`.
#[derive(Clone, Debug)]
pub struct CentralProfileSink {
    dir: PathBuf,
}

impl CentralProfileSink {
    /// Write into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file for `step`.
    pub fn path(&self, step: StepId) -> PathBuf {
        self.dir.join(format!("central_profile_step{step}.dat"))
    }
}

/// Header plus `j u v |(u, v)|` along row `height / 2`.
pub fn write_profile(out: &mut impl Write, u: PlaneView<'_>, v: PlaneView<'_>) -> io::Result<()> {
    writeln!(out, "Position U V Magnitude")?;
    let mid = u.height() / 2;
    for (j, (&a, &b)) in u.row(mid).iter().zip(v.row(mid)).enumerate() {
        writeln!(out, "{j} {a:.6} {b:.6} {:.6}", magnitude(a, b))?;
    }
    Ok(())
}

impl SnapshotSink for CentralProfileSink {
    fn write(&mut self, step: StepId, u: PlaneView<'_>, v: PlaneView<'_>) -> Result<(), SinkError> {
        write_file(&self.path(step), |out| write_profile(out, u, v))
    }
}
