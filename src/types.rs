// Game server types and fixed game constants
//
// The snapshot layout mirrors the JSON returned by the game server's move
// endpoint. The board geometry and roster sizes are constants of this one game.

use serde::{Deserialize, Serialize};

/// Side length of one face
pub const GRID: u8 = 5;
/// Number of faces on the cube surface
pub const FACES: u8 = 6;
/// Total number of cells (6 faces x 5 x 5)
pub const FIELD_SIZE: usize = 150;
/// Number of agent slots
pub const AGENTS: usize = 6;
/// Number of teams
pub const TEAMS: usize = 3;
/// Length of a match in turns
pub const TOTAL_TURNS: i32 = 294;
/// First turn on which territory is added to the score
pub const SCORING_START_TURN: i32 = TOTAL_TURNS / 2;

/// One cell of the field
///
/// `owner == None` exactly when `intensity == 0`. Intensity 1 is a half-painted
/// cell, intensity 2 a fully painted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub owner: Option<u8>,
    pub intensity: u8,
}

impl Cell {
    /// An unowned cell
    pub const EMPTY: Cell = Cell {
        owner: None,
        intensity: 0,
    };

    /// A fully painted cell for `team`
    pub const fn full(team: u8) -> Cell {
        Cell {
            owner: Some(team),
            intensity: 2,
        }
    }

    /// A half painted cell for `team`
    pub const fn half(team: u8) -> Cell {
        Cell {
            owner: Some(team),
            intensity: 1,
        }
    }

    pub fn is_owned_by(&self, team: u8) -> bool {
        self.owner == Some(team)
    }

    /// Converts a server `[owner, intensity]` pair, rejecting inconsistent pairs
    pub fn from_wire(pair: [i32; 2]) -> Option<Cell> {
        match pair {
            [-1, 0] => Some(Cell::EMPTY),
            [owner @ 0..=2, intensity @ 1..=2] => Some(Cell {
                owner: Some(owner as u8),
                intensity: intensity as u8,
            }),
            _ => None,
        }
    }

    /// Converts back to the server `[owner, intensity]` pair
    pub fn to_wire(self) -> [i32; 2] {
        [
            self.owner.map_or(-1, i32::from),
            i32::from(self.intensity),
        ]
    }
}

/// Location and heading of an agent
///
/// Heading 0 moves towards +row, 1 towards +col, 2 towards -row, 3 towards -col,
/// all in the local frame of `face`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub face: u8,
    pub row: u8,
    pub col: u8,
    pub heading: u8,
}

/// An agent slot: where it stands and how many special moves it has left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub position: Position,
    pub special: i32,
}

/// Result status of the move endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    Ok,
    AlreadyMoved,
    GameFinished,

    #[serde(other)]
    Unknown,
}

/// Authoritative game state as returned by the move endpoint
///
/// Always expressed in the receiving participant's frame, so that participant's
/// agents are slots 0 and 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: MoveStatus,
    #[serde(default)]
    pub now: i64,
    #[serde(default)]
    pub turn: i32,
    /// Move codes applied on the previous turn, in slot order
    #[serde(rename = "move", default)]
    pub moves: [i32; 6],
    #[serde(default)]
    pub score: [i32; 3],
    #[serde(default)]
    pub field: [[[[i32; 2]; 5]; 5]; 6],
    #[serde(default)]
    pub agent: [[i32; 4]; 6],
    #[serde(default)]
    pub special: [i32; 6],
}

impl Snapshot {
    /// True when the game is still accepting moves
    pub fn is_live(&self) -> bool {
        self.status == MoveStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_wire_conversion() {
        assert_eq!(Cell::from_wire([-1, 0]), Some(Cell::EMPTY));
        assert_eq!(Cell::from_wire([2, 1]), Some(Cell::half(2)));
        assert_eq!(Cell::from_wire([0, 2]), Some(Cell::full(0)));
        assert_eq!(Cell::full(1).to_wire(), [1, 2]);
        assert_eq!(Cell::EMPTY.to_wire(), [-1, 0]);
    }

    #[test]
    fn test_cell_wire_rejects_broken_invariant() {
        assert_eq!(Cell::from_wire([-1, 2]), None);
        assert_eq!(Cell::from_wire([1, 0]), None);
        assert_eq!(Cell::from_wire([3, 2]), None);
        assert_eq!(Cell::from_wire([0, 3]), None);
    }

    #[test]
    fn test_snapshot_parses_server_json() {
        let json = r#"{
            "status": "ok",
            "now": 1700000000000,
            "turn": 12,
            "move": [0, -1, 3, 9, -1, 5],
            "score": [0, 0, 0],
            "agent": [[0,0,0,0],[1,0,0,0],[2,0,0,0],[3,0,0,0],[4,0,0,0],[5,0,0,0]],
            "special": [2, 2, 2, 2, 2, 2]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.is_live());
        assert_eq!(snapshot.turn, 12);
        assert_eq!(snapshot.moves, [0, -1, 3, 9, -1, 5]);
        assert_eq!(snapshot.field[5][4][4], [0, 0]);
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"status": "not_started"}"#).unwrap();
        assert_eq!(snapshot.status, MoveStatus::Unknown);
        assert!(!snapshot.is_live());
    }
}
