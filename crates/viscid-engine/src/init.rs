//! Standard initial conditions.
//!
//! Each type implements [`Initializer`]; any `Fn(usize, usize) -> (f64, f64)`
//! closure does too, for one-off fields.

use viscid_core::Initializer;

/// The same `(u, v)` everywhere (free stream).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniform {
    /// Value of `u`.
    pub u: f64,
    /// Value of `v`.
    pub v: f64,
}

impl Uniform {
    /// Constant `(u, v)`.
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// All zero.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Initializer for Uniform {
    fn value(&self, _i: usize, _j: usize) -> (f64, f64) {
        (self.u, self.v)
    }
}

/// A Gaussian velocity perturbation on top of a free stream.
///
/// For cells within `radius_sq` (squared index distance) of the centre the
/// value is `base + amp·exp(-d² / width_sq)`; elsewhere it is `base`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianBump {
    /// Free-stream `u`.
    pub base_u: f64,
    /// Free-stream `v`.
    pub base_v: f64,
    /// Peak added to `u`.
    pub amp_u: f64,
    /// Peak added to `v`.
    pub amp_v: f64,
    /// Row index of the centre.
    pub centre_i: f64,
    /// Column index of the centre.
    pub centre_j: f64,
    /// Cut-off on the squared distance.
    pub radius_sq: f64,
    /// Squared width of the Gaussian.
    pub width_sq: f64,
}

impl GaussianBump {
    /// The classic bump: free stream `(1, 0)`, peaks `(2, 1.5)`, cut-off
    /// d² < 400, width² 100, centred on the grid.
    pub fn centered(width: usize, height: usize) -> Self {
        Self {
            base_u: 1.0,
            base_v: 0.0,
            amp_u: 2.0,
            amp_v: 1.5,
            centre_i: (height / 2) as f64,
            centre_j: (width / 2) as f64,
            radius_sq: 400.0,
            width_sq: 100.0,
        }
    }
}

impl Initializer for GaussianBump {
    fn value(&self, i: usize, j: usize) -> (f64, f64) {
        let di = i as f64 - self.centre_i;
        let dj = j as f64 - self.centre_j;
        let d2 = di * di + dj * dj;
        if d2 < self.radius_sq {
            let g = (-d2 / self.width_sq).exp();
            (self.base_u + self.amp_u * g, self.base_v + self.amp_v * g)
        } else {
            (self.base_u, self.base_v)
        }
    }
}

/// A constant square in the middle of a constant background.
///
/// The square spans rows `[h/2 - h/8, h/2 + h/8)` and columns
/// `[w/2 - w/8, w/2 + w/8)`. It is empty on grids smaller than 8 cells in
/// either direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenteredSquare {
    /// `(u, v)` outside the square.
    pub background: (f64, f64),
    /// `(u, v)` inside the square.
    pub inside: (f64, f64),
    rows: (usize, usize),
    cols: (usize, usize),
}

impl CenteredSquare {
    /// Square of `inside` on a zero background.
    pub fn centered(width: usize, height: usize, inside: (f64, f64)) -> Self {
        Self {
            background: (0.0, 0.0),
            inside,
            rows: (height / 2 - height / 8, height / 2 + height / 8),
            cols: (width / 2 - width / 8, width / 2 + width / 8),
        }
    }

    /// Replace the background value.
    pub fn with_background(mut self, background: (f64, f64)) -> Self {
        self.background = background;
        self
    }

    /// Whether `(i, j)` lies inside the square.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        (self.rows.0..self.rows.1).contains(&i) && (self.cols.0..self.cols.1).contains(&j)
    }
}

impl Initializer for CenteredSquare {
    fn value(&self, i: usize, j: usize) -> (f64, f64) {
        if self.contains(i, j) {
            self.inside
        } else {
            self.background
        }
    }
}
