//! Double-buffered ping-pong storage for both velocity fields.
//!
//! [`GridBuffer`] holds two same-shaped planes per field. One is the
//! authoritative "current" state; the other is scratch space written by
//! the in-flight update. [`GridBuffer::swap`] exchanges the roles for both
//! fields at once.
//!
//! The lifecycle per step is:
//! 1. `staged_mut()`: borrow each field's current plane (read) and next
//!    plane (write) for the stencil update
//! 2. `next_mut()`: boundary application on the next planes
//! 3. `swap()`: next becomes current, old current becomes scratch

use tracing::debug;
use viscid_core::{Field, GridError, Initializer, PlaneView};

use crate::plane::{check_dimensions, Plane};

/// The current/next planes of one field.
///
/// A tagged pair instead of two free-standing handles: the only way to
/// change which plane is authoritative is [`PlanePair::swap`].
#[derive(Clone, Debug)]
struct PlanePair {
    current: Plane,
    next: Plane,
}

impl PlanePair {
    fn zeroed(width: usize, height: usize) -> Result<Self, GridError> {
        Ok(Self {
            current: Plane::zeroed(width, height)?,
            next: Plane::zeroed(width, height)?,
        })
    }

    fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

/// Double-buffered planes for the `u` and `v` fields.
///
/// # Buffer layout
///
/// ```text
/// pairs[Field::U]: current ⇄ next
/// pairs[Field::V]: current ⇄ next
/// ```
///
/// All four planes share the dimensions given to [`allocate`](Self::allocate)
/// for the lifetime of the buffer.
#[derive(Clone, Debug)]
pub struct GridBuffer {
    width: usize,
    height: usize,
    pairs: [PlanePair; Field::COUNT],
    swaps: u64,
}

impl GridBuffer {
    /// Allocate two zero-filled planes per field.
    ///
    /// Fails with [`GridError::InvalidDimensions`] before touching the
    /// allocator if `width < 3` or `height < 3`.
    pub fn allocate(width: usize, height: usize) -> Result<Self, GridError> {
        let cells = check_dimensions(width, height)?;
        let pairs = [
            PlanePair::zeroed(width, height)?,
            PlanePair::zeroed(width, height)?,
        ];
        debug!(
            width,
            height,
            bytes = cells * std::mem::size_of::<f64>() * 2 * Field::COUNT,
            "grid buffer allocated"
        );
        Ok(Self {
            width,
            height,
            pairs,
            swaps: 0,
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

    /// The authoritative plane of `field`.
    pub fn current(&self, field: Field) -> &Plane {
        &self.pairs[field.index()].current
    }

    /// Mutable access to the authoritative plane of `field`.
    ///
    /// Intended for initialization only; stepping never writes here.
    pub fn current_mut(&mut self, field: Field) -> &mut Plane {
        &mut self.pairs[field.index()].current
    }

    /// The scratch plane of `field`, for writers of the in-flight step.
    pub fn next_mut(&mut self, field: Field) -> &mut Plane {
        &mut self.pairs[field.index()].next
    }

    /// Read view of the current plane of `field`.
    pub fn view(&self, field: Field) -> PlaneView<'_> {
        self.current(field).view()
    }

    /// Split-borrow every field as `(field, current, next)`.
    ///
    /// The current plane is shared read-only; the next plane is exclusively
    /// borrowed, so the update can never read scratch or write state.
    pub fn staged_mut(&mut self) -> impl Iterator<Item = (Field, &Plane, &mut Plane)> + '_ {
        Field::ALL
            .into_iter()
            .zip(self.pairs.iter_mut())
            .map(|(field, pair)| (field, &pair.current, &mut pair.next))
    }

    /// Exchange current and next for both fields in O(1).
    pub fn swap(&mut self) {
        for pair in &mut self.pairs {
            pair.swap();
        }
        self.swaps += 1;
    }

    /// Number of swaps performed since allocation.
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }

    /// Fill every cell of both current planes from `init`.
    ///
    /// The scratch planes are left untouched: every cell of them is
    /// rewritten by the next step before it can be observed.
    pub fn initialize(&mut self, init: &dyn Initializer) {
        let width = self.width;
        let [u_pair, v_pair] = &mut self.pairs;
        let u = u_pair.current.as_mut_slice();
        let v = v_pair.current.as_mut_slice();
        for (idx, (u_cell, v_cell)) in u.iter_mut().zip(v.iter_mut()).enumerate() {
            let (u0, v0) = init.value(idx / width, idx % width);
            *u_cell = u0;
            *v_cell = v0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(i: usize, j: usize) -> (f64, f64) {
        (i as f64 * 10.0 + j as f64, -(i as f64))
    }

    fn constant(u: f64, v: f64) -> impl Fn(usize, usize) -> (f64, f64) {
        move |_, _| (u, v)
    }

    #[test]
    fn allocate_rejects_degenerate_grids() {
        assert_eq!(
            GridBuffer::allocate(2, 8).unwrap_err(),
            GridError::InvalidDimensions {
                width: 2,
                height: 8
            }
        );
        assert_eq!(
            GridBuffer::allocate(8, 2).unwrap_err(),
            GridError::InvalidDimensions {
                width: 8,
                height: 2
            }
        );
    }

    #[test]
    fn all_planes_share_shape() {
        let mut grid = GridBuffer::allocate(6, 4).unwrap();
        for field in Field::ALL {
            assert_eq!(grid.current(field).shape(), (6, 4));
            assert_eq!(grid.next_mut(field).shape(), (6, 4));
        }
    }

    #[test]
    fn initialize_fills_current_planes_row_major() {
        let mut grid = GridBuffer::allocate(4, 3).unwrap();
        grid.initialize(&ramp);
        assert_eq!(grid.current(Field::U).get(2, 3), 23.0);
        assert_eq!(grid.current(Field::V).get(2, 3), -2.0);
        assert_eq!(grid.current(Field::U).get(0, 0), 0.0);
    }

    #[test]
    fn swap_exchanges_roles_without_copying() {
        let mut grid = GridBuffer::allocate(3, 3).unwrap();
        grid.initialize(&constant(1.0, 2.0));
        grid.next_mut(Field::U).fill(5.0);
        grid.next_mut(Field::V).fill(6.0);

        let next_ptr = grid.next_mut(Field::U).as_slice().as_ptr();
        grid.swap();

        assert_eq!(grid.current(Field::U).as_slice().as_ptr(), next_ptr);
        assert!(grid.current(Field::U).as_slice().iter().all(|&x| x == 5.0));
        assert!(grid.current(Field::V).as_slice().iter().all(|&x| x == 6.0));
        assert!(grid.next_mut(Field::U).as_slice().iter().all(|&x| x == 1.0));
        assert_eq!(grid.swap_count(), 1);
    }

    #[test]
    fn double_swap_restores_roles() {
        let mut grid = GridBuffer::allocate(3, 3).unwrap();
        grid.initialize(&constant(7.0, 8.0));
        grid.swap();
        grid.swap();
        assert_eq!(grid.current(Field::U).get(1, 1), 7.0);
        assert_eq!(grid.current(Field::V).get(1, 1), 8.0);
        assert_eq!(grid.swap_count(), 2);
    }

    #[test]
    fn staged_mut_yields_each_field_once() {
        let mut grid = GridBuffer::allocate(3, 3).unwrap();
        grid.initialize(&constant(1.0, 2.0));
        let mut seen = Vec::new();
        for (field, current, next) in grid.staged_mut() {
            next.fill(current.get(1, 1) * 10.0);
            seen.push(field);
        }
        assert_eq!(seen, vec![Field::U, Field::V]);
        assert_eq!(grid.next_mut(Field::U).get(0, 0), 10.0);
        assert_eq!(grid.next_mut(Field::V).get(2, 2), 20.0);
    }
}
