//! Read-only views over a single plane of field data.

/// Borrowed, read-only view of one `height x width` plane in row-major
/// order.
///
/// Handed to sinks and diagnostics so they can inspect the current state
/// without being able to mutate it or observe the scratch plane.
#[derive(Clone, Copy, Debug)]
pub struct PlaneView<'a> {
    width: usize,
    height: usize,
    data: &'a [f64],
}

impl<'a> PlaneView<'a> {
    /// Wrap a row-major slice.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: &'a [f64]) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "plane data length does not match {width}x{height}"
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(j < self.width, "column {j} out of bounds for width {}", self.width);
        self.data[i * self.width + j]
    }

    /// Row `i` as a slice of `width` values.
    pub fn row(&self, i: usize) -> &'a [f64] {
        let start = i * self.width;
        &self.data[start..start + self.width]
    }

    /// The whole plane as a flat row-major slice.
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Iterate `(row, col, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + 'a {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, &v)| (idx / width, idx % width, v))
    }
}
