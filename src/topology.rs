// Cube-surface topology
//
// Six 5x5 faces form a closed surface. Faces 0-2 and 3-5 are two triples; a
// step off the +row or +col edge stays inside the triple, a step off the -row
// or -col edge lands in the opposite triple. Crossing a seam re-derives the
// heading in the new face's frame.

use crate::types::{Position, FIELD_SIZE, GRID};

/// Row delta per heading
const D_ROW: [i8; 4] = [1, 0, -1, 0];
/// Column delta per heading
const D_COL: [i8; 4] = [0, 1, 0, -1];

const LAST: u8 = GRID - 1;

/// Linear field index of `(face, row, col)`
pub fn field_index(face: u8, row: u8, col: u8) -> usize {
    (usize::from(face) * usize::from(GRID) + usize::from(row)) * usize::from(GRID)
        + usize::from(col)
}

/// Inverse of [`field_index`]
pub fn field_coords(index: usize) -> (u8, u8, u8) {
    debug_assert!(index < FIELD_SIZE);
    let grid = usize::from(GRID);
    (
        (index / (grid * grid)) as u8,
        (index / grid % grid) as u8,
        (index % grid) as u8,
    )
}

impl Position {
    pub fn new(face: u8, row: u8, col: u8, heading: u8) -> Self {
        Position {
            face,
            row,
            col,
            heading,
        }
    }

    /// Field index of the occupied cell
    pub fn index(&self) -> usize {
        field_index(self.face, self.row, self.col)
    }

    /// True when the two positions occupy the same cell, ignoring heading
    pub fn same_cell(&self, other: &Position) -> bool {
        self.face == other.face && self.row == other.row && self.col == other.col
    }

    /// Turns the heading by `v` quarter turns
    pub fn rotate(self, v: u8) -> Position {
        Position {
            heading: (self.heading + v % 4) % 4,
            ..self
        }
    }

    /// Advances one cell along the heading, crossing a face seam if needed
    pub fn step(self) -> Position {
        let Position {
            face,
            row,
            col,
            heading,
        } = self;
        let h = usize::from(heading);
        let next_row = row as i8 + D_ROW[h];
        let next_col = col as i8 + D_COL[h];
        let triple = face / 3 * 3;
        let local = face % 3;
        let other_triple = (1 - face / 3) * 3;

        if next_row > LAST as i8 {
            Position::new(triple + (local + 1) % 3, col, LAST, 3)
        } else if next_row < 0 {
            Position::new(other_triple + (4 - local) % 3, 0, LAST - col, 0)
        } else if next_col > LAST as i8 {
            Position::new(triple + (local + 2) % 3, LAST, row, 2)
        } else if next_col < 0 {
            Position::new(other_triple + (3 - local) % 3, LAST - row, 0, 1)
        } else {
            Position::new(face, next_row as u8, next_col as u8, heading)
        }
    }

    /// Rotates by `v` and then steps once: the effect of a normal move
    pub fn advance(self, v: u8) -> Position {
        self.rotate(v).step()
    }

    /// The four cells reachable with one normal move, indexed by rotation
    pub fn neighbors(self) -> [Position; 4] {
        [0, 1, 2, 3].map(|v| self.advance(v))
    }

    /// True for coordinates inside the board
    pub fn is_valid(&self) -> bool {
        self.face < 6 && self.row < GRID && self.col < GRID && self.heading < 4
    }
}
