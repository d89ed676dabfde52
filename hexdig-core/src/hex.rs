//! Hex geometry: odd-column offset grid <-> axial coordinates

use serde::{Deserialize, Serialize};

/// Default board height
pub const ROWS: usize = 4;

/// Default board width
pub const COLS: usize = 7;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Rotate 60 degrees clockwise around the origin: (q, r) -> (-r, q + r)
    pub const fn rotate_cw(self) -> Hex {
        Hex::new(-self.r, self.q + self.r)
    }

    /// Rotate 60 degrees counter-clockwise (five clockwise steps)
    pub fn rotate_ccw(self) -> Hex {
        self.rotate_cw_n(5)
    }

    /// Apply `steps` clockwise rotations
    pub fn rotate_cw_n(self, steps: u8) -> Hex {
        (0..steps % 6).fold(self, |hex, _| hex.rotate_cw())
    }

    /// Distance from center (0,0), exact for every `i32` pair
    pub fn distance_to_center(&self) -> u64 {
        let (q, r) = (i64::from(self.q), i64::from(self.r));
        (q.unsigned_abs() + r.unsigned_abs() + (q + r).unsigned_abs()) / 2
    }

    /// Convert back to the offset grid
    pub const fn to_grid(self) -> GridPos {
        GridPos {
            row: self.r + (self.q - (self.q & 1)) / 2,
            col: self.q,
        }
    }
}

impl std::ops::Add for Hex {
    type Output = Hex;

    fn add(self, rhs: Hex) -> Hex {
        Hex::new(self.q + rhs.q, self.r + rhs.r)
    }
}

/// Direction vectors in axial coordinates (dq, dr)
pub const DIRECTIONS: [Hex; 6] = [
    Hex::new(1, 0),
    Hex::new(1, -1),
    Hex::new(0, -1),
    Hex::new(-1, 0),
    Hex::new(-1, 1),
    Hex::new(0, 1),
];

/// Odd-column offset coordinate (the visual board layout).
///
/// Signed so that out-of-bounds results of axial arithmetic can be
/// represented and rejected by [`BoardSize::contains`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

impl GridPos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub const fn to_axial(self) -> Hex {
        Hex {
            q: self.col,
            r: self.row - (self.col - (self.col & 1)) / 2,
        }
    }

    /// Absolute cell reached by an axial offset from this anchor, or `None`
    /// when the result does not fit the coordinate range
    pub fn offset(self, delta: Hex) -> Option<GridPos> {
        let (row, col) = (i64::from(self.row), i64::from(self.col));
        let q = col + i64::from(delta.q);
        let r = row - (col - (col & 1)) / 2 + i64::from(delta.r);
        let row = r + (q - (q & 1)) / 2;
        Some(GridPos::new(i32::try_from(row).ok()?, i32::try_from(q).ok()?))
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    pub rows: usize,
    pub cols: usize,
}

impl Default for BoardSize {
    fn default() -> Self {
        Self { rows: ROWS, cols: COLS }
    }
}

impl BoardSize {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row >= 0 && pos.col >= 0 && (pos.row as usize) < self.rows && (pos.col as usize) < self.cols
    }

    /// Row-major index of an in-bounds position
    pub fn index(&self, pos: GridPos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.row as usize * self.cols + pos.col as usize)
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let (rows, cols) = (self.rows as i32, self.cols as i32);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| GridPos::new(row, col)))
    }

    /// In-bounds subset of the six axial neighbors
    pub fn neighbors(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        let center = pos.to_axial();
        DIRECTIONS
            .iter()
            .map(move |&dir| (center + dir).to_grid())
            .filter(move |n| self.contains(*n))
    }
}
