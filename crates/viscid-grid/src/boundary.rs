//! Edge conditions applied to a plane's border ring after its interior
//! has been updated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::plane::Plane;

/// How the border cells (row 0, row `height-1`, column 0, column
/// `width-1`) of a plane are populated after each interior update.
///
/// # Examples
///
/// ```
/// use viscid_grid::{BoundaryPolicy, Plane};
///
/// let mut p = Plane::zeroed(4, 4).unwrap();
/// p.set(1, 1, 3.0);
/// p.set(2, 2, 5.0);
/// BoundaryPolicy::Periodic.apply(&mut p);
/// // Row 0 mirrors row height-2, column width-1 mirrors column 1.
/// assert_eq!(p.get(0, 2), p.get(2, 2));
/// assert_eq!(p.get(1, 3), p.get(1, 1));
///
/// BoundaryPolicy::FixedZero.apply(&mut p);
/// assert_eq!(p.get(0, 2), 0.0);
/// assert_eq!(p.get(2, 2), 5.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Wrap-around continuity (torus). Each border cell copies the cell one
    /// step inside the opposite border.
    ///
    /// Columns are written first, then rows. Corner cells are covered by
    /// both passes, so the row pass determines their final value:
    /// `p[0][0] = p[h-2][0] = p[h-2][w-2]`.
    #[default]
    Periodic,
    /// Closed domain with no-slip walls: every border cell is 0.
    FixedZero,
}

impl BoundaryPolicy {
    /// Populate the border ring of `plane`.
    ///
    /// Total over any plane with both extents >= 3. Interior cells are
    /// never written.
    pub fn apply(self, plane: &mut Plane) {
        match self {
            Self::Periodic => apply_periodic(plane),
            Self::FixedZero => apply_fixed_zero(plane),
        }
    }

    /// Lowercase name as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Periodic => "periodic",
            Self::FixedZero => "fixed-zero",
        }
    }
}

fn apply_periodic(plane: &mut Plane) {
    let w = plane.width();
    let h = plane.height();

    // Columns: rows 0..h, including the rows the second pass overwrites.
    for i in 0..h {
        let row = plane.row_mut(i);
        row[0] = row[w - 2];
        row[w - 1] = row[1];
    }

    // Rows: full width, corners included.
    let data = plane.as_mut_slice();
    data.copy_within((h - 2) * w..(h - 1) * w, 0);
    data.copy_within(w..2 * w, (h - 1) * w);
}

fn apply_fixed_zero(plane: &mut Plane) {
    let w = plane.width();
    let h = plane.height();

    plane.row_mut(0).fill(0.0);
    plane.row_mut(h - 1).fill(0.0);
    for i in 1..h - 1 {
        let row = plane.row_mut(i);
        row[0] = 0.0;
        row[w - 1] = 0.0;
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "periodic" | "wrap" => Ok(Self::Periodic),
            "fixed-zero" | "fixed_zero" | "fixedzero" | "dirichlet" => Ok(Self::FixedZero),
            other => Err(format!(
                "unknown boundary policy '{other}' (expected 'periodic' or 'fixed-zero')"
            )),
        }
    }
}
