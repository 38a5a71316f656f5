// Field state: 150 cells plus the per-team area counters
//
// Every mutation goes through `soft_paint` or `force_paint`, which keep `area`
// equal to a full rescan of the cells.

use crate::topology::field_index;
use crate::types::{Cell, FIELD_SIZE, TEAMS};

/// Owned, flat cell storage for one game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    cells: [Cell; FIELD_SIZE],
    area: [i32; TEAMS],
}

impl Default for Field {
    fn default() -> Self {
        Field {
            cells: [Cell::EMPTY; FIELD_SIZE],
            area: [0; TEAMS],
        }
    }
}

impl Field {
    /// Builds a field from cells, deriving the area counters by counting
    pub fn from_cells(cells: [Cell; FIELD_SIZE]) -> Self {
        let mut field = Field {
            cells,
            area: [0; TEAMS],
        };
        field.area = field.recount_area();
        field
    }

    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn cell_at(&self, face: u8, row: u8, col: u8) -> Cell {
        self.cells[field_index(face, row, col)]
    }

    pub fn cells(&self) -> &[Cell; FIELD_SIZE] {
        &self.cells
    }

    /// Incrementally maintained owned-cell count per team
    pub fn area(&self) -> [i32; TEAMS] {
        self.area
    }

    /// Owned-cell count per team, computed from scratch
    pub fn recount_area(&self) -> [i32; TEAMS] {
        let mut area = [0; TEAMS];
        for cell in self.cells.iter() {
            if let Some(owner) = cell.owner {
                area[usize::from(owner)] += 1;
            }
        }
        area
    }

    /// Contested paint from a normal move
    ///
    /// A rival's full cell drops to half; a rival's half cell is erased rather
    /// than captured.
    pub fn soft_paint(&mut self, team: u8, index: usize) {
        let cell = &mut self.cells[index];
        match cell.owner {
            None => {
                self.area[usize::from(team)] += 1;
                *cell = Cell::full(team);
            }
            Some(owner) if owner == team => {
                cell.intensity = 2;
            }
            Some(owner) if cell.intensity == 1 => {
                self.area[usize::from(owner)] -= 1;
                *cell = Cell::EMPTY;
            }
            Some(_) => {
                cell.intensity -= 1;
            }
        }
    }

    /// Unconditional capture from a special move
    pub fn force_paint(&mut self, team: u8, index: usize) {
        let cell = &mut self.cells[index];
        if cell.owner != Some(team) {
            self.area[usize::from(team)] += 1;
            if let Some(previous) = cell.owner {
                self.area[usize::from(previous)] -= 1;
            }
        }
        *cell = Cell::full(team);
    }
}
