//! Grid cell type and distance heuristics.
//!
//! The world is a 2-D integer grid addressed by `(x, z)`.  Distances used for
//! candidate ranking are the diagonal-aware octile metric on a ×10 scale
//! (straight step = 10, the extra cost of a diagonal over a straight step = 4).

use std::fmt;

/// Octile weight of one orthogonal step.
pub const STRAIGHT_COST: u32 = 10;

/// Octile weight added when `|dx| != |dz|`, per cell of difference.
pub const EXCESS_COST: u32 = 4;

/// A grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell shifted by `(dx, dz)`.
    #[inline]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self { x: self.x + dx, z: self.z + dz }
    }

    /// Octile distance: `min(|dx|,|dz|)*10 + abs(|dx|-|dz|)*4`.
    #[inline]
    pub fn octile_distance(self, other: Cell) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dz = self.z.abs_diff(other.z);
        dx.min(dz) * STRAIGHT_COST + dx.abs_diff(dz) * EXCESS_COST
    }

    /// Chebyshev (king-move) distance.
    #[inline]
    pub fn chebyshev_distance(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// `true` if `other` is one of the eight cells surrounding `self`.
    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self != other && self.chebyshev_distance(other) == 1
    }

    /// The eight surrounding cells, orthogonal neighbours first.
    pub fn neighbors_8(self) -> impl Iterator<Item = Cell> {
        const OFFSETS: [(i32, i32); 8] = [
            (1, 0), (-1, 0), (0, 1), (0, -1),
            (1, 1), (1, -1), (-1, 1), (-1, -1),
        ];
        OFFSETS.into_iter().map(move |(dx, dz)| self.offset(dx, dz))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}
