/// Single coordinate axis used for the board side and row/column positions.
pub type Coord = u8;

/// Count type used for mine counts and cell counts.
pub type CellCount = u16;

/// Row-major cell index, `row * side + col`.
pub type CellIndex = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Side of the square board every player-facing game uses.
pub const GRID_SIZE: Coord = 10;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Splits a row-major index into `(row, col)` on a board with the given side.
pub const fn index_to_coords(index: CellIndex, side: Coord) -> Coord2 {
    let side = side as CellIndex;
    ((index / side) as Coord, (index % side) as Coord)
}

pub const fn coords_to_index((row, col): Coord2, side: Coord) -> CellIndex {
    row as CellIndex * side as CellIndex + col as CellIndex
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains on a `side`×`side` board.
fn apply_delta(coords: Coord2, delta: (isize, isize), side: Coord) -> Option<Coord2> {
    let (row, col) = coords;
    let (dr, dc) = delta;

    let next_row = row.checked_add_signed(dr.try_into().ok()?)?;
    if next_row >= side {
        return None;
    }

    let next_col = col.checked_add_signed(dc.try_into().ok()?)?;
    if next_col >= side {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the up-to-8 neighbors of a cell, clipped (never wrapped) at the board edges.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    side: Coord,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: CellIndex, side: Coord) -> Self {
        Self {
            center: index_to_coords(center, side),
            side,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.side);
            self.index += 1;

            if let Some(coords) = next_item {
                return Some(coords_to_index(coords, self.side));
            }
        }
    }
}
