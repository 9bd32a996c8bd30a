use crate::error::ClusterError;

/// Orientation of a bond relative to its first site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Between `(row, col)` and `(row, col + 1)`.
    Horizontal,
    /// Between `(row, col)` and `(row + 1, col)`.
    Vertical,
}

/// A candidate bond between two adjacent sites, `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub a: u32,
    pub b: u32,
    pub orientation: Orientation,
}

/// Geometry of an L x L square lattice with open boundaries.
///
/// Sites are numbered row-major: `(row, col)` maps to `row * side + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice {
    side: usize,
}

impl Lattice {
    /// Create a lattice of `side * side` sites.
    ///
    /// Fails if `side` is zero, the site count does not fit a `u32` index, or
    /// the bond count does not fit a `usize`.
    pub fn new(side: usize) -> Result<Self, ClusterError> {
        if side == 0 {
            return Err(ClusterError::EmptyLattice);
        }
        let sites = side.checked_mul(side).filter(|&n| n <= u32::MAX as usize);
        let bonds = (side - 1).checked_mul(side).and_then(|n| n.checked_mul(2));
        match (sites, bonds) {
            (Some(_), Some(_)) => Ok(Self { side }),
            _ => Err(ClusterError::TooManySites { side }),
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn site_count(&self) -> usize {
        self.side * self.side
    }

    /// Number of candidate bonds, `2 * L * (L - 1)`.
    pub fn bond_count(&self) -> usize {
        2 * self.side * (self.side - 1)
    }

    /// Number of bonds whose first site lies in `row`.
    pub fn bonds_in_row(&self, row: usize) -> usize {
        let vertical = if row + 1 < self.side { self.side } else { 0 };
        (self.side - 1) + vertical
    }

    /// Site index of `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> u32 {
        debug_assert!(row < self.side && col < self.side);
        (row * self.side + col) as u32
    }

    /// `(row, col)` of a site index.
    #[inline]
    pub fn coords(&self, site: u32) -> (usize, usize) {
        let s = site as usize;
        (s / self.side, s % self.side)
    }

    /// All candidate bonds in canonical order: row-major over sites, and for
    /// each site the horizontal bond before the vertical one.
    pub fn bonds(&self) -> impl Iterator<Item = Bond> + '_ {
        (0..self.side).flat_map(move |row| self.row_bonds(row))
    }

    /// Canonical-order bonds whose first site lies in `row`.
    pub fn row_bonds(&self, row: usize) -> impl Iterator<Item = Bond> + '_ {
        let side = self.side;
        (0..side).flat_map(move |col| {
            let here = self.index(row, col);
            let right = (col + 1 < side).then(|| Bond {
                a: here,
                b: here + 1,
                orientation: Orientation::Horizontal,
            });
            let down = (row + 1 < side).then(|| Bond {
                a: here,
                b: here + side as u32,
                orientation: Orientation::Vertical,
            });
            right.into_iter().chain(down)
        })
    }
}
