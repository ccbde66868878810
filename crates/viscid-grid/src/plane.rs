//! A single owned `height x width` plane of `f64` values.

use viscid_core::{GridError, PlaneView};

/// Owned row-major storage for one field plane.
///
/// Row `i` (0-based, `0..height`) occupies `data[i * width..(i + 1) * width]`.
/// Dimensions are fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

/// Check that a grid has an interior and return its cell count.
pub fn check_dimensions(width: usize, height: usize) -> Result<usize, GridError> {
    if width < GridError::MIN_EXTENT || height < GridError::MIN_EXTENT {
        return Err(GridError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(GridError::AllocationFailure { cells: usize::MAX })
}

impl Plane {
    /// Allocate a zero-filled plane.
    ///
    /// Fails with [`GridError::InvalidDimensions`] when either extent is
    /// below 3, and with [`GridError::AllocationFailure`] when the storage
    /// cannot be reserved. Nothing is allocated on the dimension check
    /// failure path.
    pub fn zeroed(width: usize, height: usize) -> Result<Self, GridError> {
        let cells = check_dimensions(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(cells)
            .map_err(|_| GridError::AllocationFailure { cells })?;
        data.resize(cells, 0.0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Value at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    /// Overwrite the value at row `i`, column `j`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let idx = self.index(i, j);
        self.data[idx] = value;
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.width;
        &self.data[start..start + self.width]
    }

    /// Row `i` as a mutable slice.
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let start = i * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Rows `1..height-1` as one contiguous mutable slice.
    ///
    /// Each `width`-long chunk is one interior row, border columns included.
    /// This is the region the stencil update partitions across workers.
    pub fn interior_rows_mut(&mut self) -> &mut [f64] {
        let w = self.width;
        let h = self.height;
        &mut self.data[w..(h - 1) * w]
    }

    /// The whole plane as a flat slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The whole plane as a flat mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Read-only view for sinks and diagnostics.
    pub fn view(&self) -> PlaneView<'_> {
        PlaneView::new(self.width, self.height, &self.data)
    }

    /// Whether `(i, j)` lies on the outer ring.
    pub fn is_border(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 == self.height || j + 1 == self.width
    }

    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.height && j < self.width, "({i}, {j}) out of bounds");
        i * self.width + j
    }
}
