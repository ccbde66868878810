//! Whole-field scalar diagnostics.

use viscid_core::PlaneView;

/// Summary statistics over every cell of both fields.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldStats {
    /// Σ 0.5·(u² + v²) over all cells, borders included.
    pub kinetic_energy: f64,
    /// max √(u² + v²) over finite cells.
    pub max_speed: f64,
    /// Cells where `u` or `v` is NaN or infinite.
    pub non_finite: usize,
}

impl FieldStats {
    /// Compute from read-only views of the current planes.
    ///
    /// Summation is sequential in row-major order, so the result is
    /// reproducible bit for bit. Non-finite cells still contribute to the
    /// energy sum, which then becomes non-finite too.
    ///
    /// # Panics
    ///
    /// Panics if `u` and `v` differ in shape.
    pub fn compute(u: PlaneView<'_>, v: PlaneView<'_>) -> Self {
        assert_eq!(
            (u.width(), u.height()),
            (v.width(), v.height()),
            "u and v planes differ in shape"
        );
        let mut stats = Self::default();
        for (&a, &b) in u.as_slice().iter().zip(v.as_slice()) {
            let sq = a * a + b * b;
            stats.kinetic_energy += 0.5 * sq;
            if a.is_finite() && b.is_finite() {
                stats.max_speed = stats.max_speed.max(sq.sqrt());
            } else {
                stats.non_finite += 1;
            }
        }
        stats
    }

    /// `true` if every cell is finite.
    pub fn is_finite(&self) -> bool {
        self.non_finite == 0
    }
}
