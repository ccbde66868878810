//! The explicit 5-point diffusion stencil.
//!
//! For interior cell `(i, j)`:
//!
//! ```text
//! next = c + ν·Δt·((c[i+1][j] - 2c + c[i-1][j]) / Δx² + (c[i][j+1] - 2c + c[i][j-1]) / Δy²)
//! ```
//!
//! The kernel is a pure function of the current plane. It has no state
//! beyond the run constants, so any partition of the interior across
//! threads yields the same bits.

use viscid_grid::Plane;

use crate::config::RunConfig;

/// Run constants of the forward-Euler diffusion update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StencilKernel {
    nu_dt: f64,
    dx2: f64,
    dy2: f64,
}

impl StencilKernel {
    /// Build from ν, Δt, Δx and Δy. Values are assumed validated.
    pub fn new(nu: f64, dt: f64, dx: f64, dy: f64) -> Self {
        Self {
            nu_dt: nu * dt,
            dx2: dx * dx,
            dy2: dy * dy,
        }
    }

    /// Build from a validated [`RunConfig`].
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.nu, config.dt, config.dx, config.dy)
    }

    /// New value of one cell from its 4-neighbour footprint.
    ///
    /// `up`/`down` are rows `i-1`/`i+1` (the Δx axis), `left`/`right` are
    /// columns `j-1`/`j+1` (the Δy axis).
    #[inline]
    pub fn cell(&self, up: f64, centre: f64, down: f64, left: f64, right: f64) -> f64 {
        let d_xx = (down - 2.0 * centre + up) / self.dx2;
        let d_yy = (right - 2.0 * centre + left) / self.dy2;
        centre + self.nu_dt * (d_xx + d_yy)
    }

    /// Update interior row `i` of `current` into `out`.
    ///
    /// `out` is the matching row of the next plane. Only columns
    /// `1..width-1` are written; the border columns are left for the
    /// boundary pass.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not an interior row or `out` is not `width` long.
    pub fn update_row(&self, current: &Plane, i: usize, out: &mut [f64]) {
        let w = current.width();
        assert!(
            i >= 1 && i + 1 < current.height(),
            "row {i} is not interior"
        );
        assert_eq!(out.len(), w, "output row has wrong width");
        let up = current.row(i - 1);
        let mid = current.row(i);
        let down = current.row(i + 1);
        for j in 1..w - 1 {
            out[j] = self.cell(up[j], mid[j], down[j], mid[j - 1], mid[j + 1]);
        }
    }

    /// Serial reference sweep over every interior row of `current`.
    ///
    /// Produces the same bits as the parallel phase.
    pub fn apply_serial(&self, current: &Plane, next: &mut Plane) {
        debug_assert_eq!(current.shape(), next.shape());
        for i in 1..current.height() - 1 {
            self.update_row(current, i, next.row_mut(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane_from(width: usize, height: usize, f: impl Fn(usize, usize) -> f64) -> Plane {
        let mut p = Plane::zeroed(width, height).unwrap();
        for i in 0..height {
            for j in 0..width {
                p.set(i, j, f(i, j));
            }
        }
        p
    }

    #[test]
    fn constant_field_is_fixed_point() {
        let k = StencilKernel::new(0.3, 0.1, 0.5, 2.0);
        assert_eq!(k.cell(4.25, 4.25, 4.25, 4.25, 4.25), 4.25);
    }

    #[test]
    fn spike_scenario_values() {
        let k = StencilKernel::new(0.01, 0.001, 1.0, 1.0);
        let cur = plane_from(5, 5, |i, j| if (i, j) == (2, 2) { 2.0 } else { 1.0 });
        let mut next = Plane::zeroed(5, 5).unwrap();
        k.apply_serial(&cur, &mut next);

        // The spike loses 4·ν·Δt·(2 - 1) and each neighbour gains a quarter of it.
        assert!((next.get(2, 2) - 1.99996).abs() < 1e-12);
        for (i, j) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert!((next.get(i, j) - 1.00001).abs() < 1e-12, "({i},{j})");
        }
        for (i, j) in [(1, 1), (1, 3), (3, 1), (3, 3)] {
            assert_eq!(next.get(i, j), 1.0);
        }
    }

    #[test]
    fn border_is_not_written() {
        let k = StencilKernel::new(1.0, 0.1, 1.0, 1.0);
        let cur = plane_from(4, 4, |i, j| (i * 4 + j) as f64);
        let mut next = Plane::zeroed(4, 4).unwrap();
        next.fill(-7.0);
        k.apply_serial(&cur, &mut next);
        for i in 0..4 {
            for j in 0..4 {
                if next.is_border(i, j) {
                    assert_eq!(next.get(i, j), -7.0);
                }
            }
        }
    }

    #[test]
    fn spacing_divides_each_axis() {
        // Curvature only along i: Δy must not matter.
        let k = StencilKernel::new(1.0, 1.0, 2.0, 1000.0);
        // up + down - 2c = 4, / Δx² = 1
        assert_eq!(k.cell(2.0, 0.0, 2.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn zero_viscosity_is_identity() {
        let k = StencilKernel::new(0.0, 0.5, 1.0, 1.0);
        let cur = plane_from(6, 5, |i, j| ((i * 31 + j * 7) % 11) as f64);
        let mut next = cur.clone();
        k.apply_serial(&cur, &mut next);
        assert_eq!(next, cur);
    }

    #[test]
    fn non_finite_values_propagate() {
        let k = StencilKernel::new(0.01, 0.001, 1.0, 1.0);
        assert!(k.cell(1.0, f64::NAN, 1.0, 1.0, 1.0).is_nan());
        assert!(k.cell(f64::INFINITY, 1.0, 1.0, 1.0, 1.0).is_infinite());
    }

    #[test]
    #[should_panic(expected = "not interior")]
    fn border_row_panics() {
        let k = StencilKernel::new(0.01, 0.001, 1.0, 1.0);
        let cur = Plane::zeroed(3, 3).unwrap();
        let mut out = [0.0; 3];
        k.update_row(&cur, 0, &mut out);
    }
}
