//! Per-field dumps: one file per field per sampled step.

use std::io::{self, Write};
use std::path::PathBuf;

use viscid_core::{Field, PlaneView, SinkError, SnapshotSink, StepId};

use crate::write_file;

/// Writes `X Y Value` point lists, one cell per line in row-major order.
///
/// Values use six decimals: `3 7 1.000010`.
#[derive(Clone, Debug)]
pub struct PointListSink {
    dir: PathBuf,
    prefix: String,
}

impl PointListSink {
    /// Write into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to every file name.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Path of the file for `field` at `step`.
    pub fn path(&self, field: Field, step: StepId) -> PathBuf {
        self.dir
            .join(format!("{}{}_field_step{}.dat", self.prefix, field, step))
    }
}

/// Header line plus one `i j value` line per cell.
pub fn write_points(out: &mut impl Write, plane: PlaneView<'_>) -> io::Result<()> {
    writeln!(out, "X Y Value")?;
    for (i, j, x) in plane.cells() {
        writeln!(out, "{i} {j} {x:.6}")?;
    }
    Ok(())
}

impl SnapshotSink for PointListSink {
    fn write(&mut self, step: StepId, u: PlaneView<'_>, v: PlaneView<'_>) -> Result<(), SinkError> {
        for (field, plane) in [(Field::U, u), (Field::V, v)] {
            write_file(&self.path(field, step), |out| write_points(out, plane))?;
        }
        Ok(())
    }
}

/// Writes the grid as a matrix: one line per row, each value followed by
/// a single space.
#[derive(Clone, Debug)]
pub struct MatrixSink {
    dir: PathBuf,
    prefix: String,
}

impl MatrixSink {
    /// Write into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to every file name.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Path of the file for `field` at `step`.
    pub fn path(&self, field: Field, step: StepId) -> PathBuf {
        self.dir
            .join(format!("{}{}_step{}.dat", self.prefix, field, step))
    }
}

/// One line per grid row, values with six decimals and a trailing space.
pub fn write_matrix(out: &mut impl Write, plane: PlaneView<'_>) -> io::Result<()> {
    for i in 0..plane.height() {
        for x in plane.row(i) {
            write!(out, "{x:.6} ")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

impl SnapshotSink for MatrixSink {
    fn write(&mut self, step: StepId, u: PlaneView<'_>, v: PlaneView<'_>) -> Result<(), SinkError> {
        for (field, plane) in [(Field::U, u), (Field::V, v)] {
            write_file(&self.path(field, step), |out| write_matrix(out, plane))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_list_layout() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 1.000_01];
        let mut out = Vec::new();
        write_points(&mut out, PlaneView::new(3, 3, &data)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "X Y Value");
        assert_eq!(lines[2], "0 1 1.000000");
        assert_eq!(lines[4], "1 0 3.000000");
        assert_eq!(lines[9], "2 2 1.000010");
    }

    #[test]
    fn matrix_layout() {
        let data = [1.0, 2.0, 3.0, -0.5, 0.25, 0.0];
        let mut out = Vec::new();
        write_matrix(&mut out, PlaneView::new(3, 2, &data)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1.000000 2.000000 3.000000 \n-0.500000 0.250000 0.000000 \n"
        );
    }

    #[test]
    fn file_names() {
        let points = PointListSink::new("/tmp/out").with_prefix("run1_");
        assert_eq!(
            points.path(Field::V, StepId(300)),
            PathBuf::from("/tmp/out/run1_v_field_step300.dat")
        );
        let matrix = MatrixSink::new("out");
        assert_eq!(
            matrix.path(Field::U, StepId(0)),
            PathBuf::from("out/u_step0.dat")
        );
    }
}
