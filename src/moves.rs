// Move codes and the move endpoint's submission strings
//
// Integer codes (what `progress` consumes and what snapshots report):
//   -1        no move
//   0..=3     rotate, then step once
//   4..=7     dash: rotate by code-4, then step five times
//   8..=157   warp: 8 + face*25 + row*5 + col, face named in the mover's frame
//
// Submission strings: "d" for a normal move, "ds" for a dash, "f-r-c" for a warp.

use crate::error::SimError;
use crate::types::{FACES, GRID};

const DASH_BASE: i32 = 4;
const WARP_BASE: i32 = 8;
const FACE_CELLS: i32 = (GRID as i32) * (GRID as i32);
/// Largest valid move code
pub const MAX_CODE: i32 = WARP_BASE + FACES as i32 * FACE_CELLS - 1;

/// Decoded move for one agent on one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCode {
    Stay,
    Step { rotation: u8 },
    Dash { rotation: u8 },
    Warp { face: u8, row: u8, col: u8 },
}

impl MoveCode {
    /// Decodes an integer move code; `None` when out of range
    pub fn from_code(code: i32) -> Option<MoveCode> {
        match code {
            -1 => Some(MoveCode::Stay),
            0..=3 => Some(MoveCode::Step {
                rotation: code as u8,
            }),
            4..=7 => Some(MoveCode::Dash {
                rotation: (code - DASH_BASE) as u8,
            }),
            WARP_BASE..=MAX_CODE => {
                let m = code - WARP_BASE;
                Some(MoveCode::Warp {
                    face: (m / FACE_CELLS) as u8,
                    row: (m / GRID as i32 % GRID as i32) as u8,
                    col: (m % GRID as i32) as u8,
                })
            }
            _ => None,
        }
    }

    /// Encodes back to the integer form
    pub fn code(self) -> i32 {
        match self {
            MoveCode::Stay => -1,
            MoveCode::Step { rotation } => i32::from(rotation),
            MoveCode::Dash { rotation } => DASH_BASE + i32::from(rotation),
            MoveCode::Warp { face, row, col } => {
                WARP_BASE
                    + i32::from(face) * FACE_CELLS
                    + i32::from(row) * GRID as i32
                    + i32::from(col)
            }
        }
    }

    /// Dash and warp consume a special charge
    pub fn is_special(self) -> bool {
        matches!(self, MoveCode::Dash { .. } | MoveCode::Warp { .. })
    }

    /// Parses a submission string such as `"2"`, `"1s"` or `"4-0-3"`
    pub fn parse_submission(s: &str) -> Result<MoveCode, SimError> {
        let invalid = || SimError::InvalidSubmission(s.to_string());
        let s_trim = s.trim();

        if let Some(direction) = s_trim.strip_suffix('s') {
            let rotation = parse_bounded(direction, 4).ok_or_else(invalid)?;
            return Ok(MoveCode::Dash { rotation });
        }

        if s_trim.contains('-') {
            let parts: Vec<&str> = s_trim.split('-').collect();
            if parts.len() != 3 {
                return Err(invalid());
            }
            let face = parse_bounded(parts[0], FACES).ok_or_else(invalid)?;
            let row = parse_bounded(parts[1], GRID).ok_or_else(invalid)?;
            let col = parse_bounded(parts[2], GRID).ok_or_else(invalid)?;
            return Ok(MoveCode::Warp { face, row, col });
        }

        let rotation = parse_bounded(s_trim, 4).ok_or_else(invalid)?;
        Ok(MoveCode::Step { rotation })
    }

    /// Formats the move as a submission string; `None` for `Stay`
    pub fn to_submission(self) -> Option<String> {
        match self {
            MoveCode::Stay => None,
            MoveCode::Step { rotation } => Some(rotation.to_string()),
            MoveCode::Dash { rotation } => Some(format!("{}s", rotation)),
            MoveCode::Warp { face, row, col } => Some(format!("{}-{}-{}", face, row, col)),
        }
    }
}

/// Parses a single small unsigned number strictly below `bound`
fn parse_bounded(s: &str, bound: u8) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u8>().ok().filter(|v| *v < bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_code_ranges() {
        assert_eq!(MoveCode::from_code(-1), Some(MoveCode::Stay));
        assert_eq!(MoveCode::from_code(3), Some(MoveCode::Step { rotation: 3 }));
        assert_eq!(MoveCode::from_code(4), Some(MoveCode::Dash { rotation: 0 }));
        assert_eq!(MoveCode::from_code(7), Some(MoveCode::Dash { rotation: 3 }));
        assert_eq!(
            MoveCode::from_code(8),
            Some(MoveCode::Warp { face: 0, row: 0, col: 0 })
        );
        assert_eq!(
            MoveCode::from_code(157),
            Some(MoveCode::Warp { face: 5, row: 4, col: 4 })
        );
        assert_eq!(MoveCode::from_code(158), None);
        assert_eq!(MoveCode::from_code(-2), None);
    }

    #[test]
    fn test_warp_code_layout() {
        let warp = MoveCode::Warp { face: 2, row: 3, col: 1 };
        assert_eq!(warp.code(), 8 + 50 + 15 + 1);
        assert_eq!(MoveCode::from_code(warp.code()), Some(warp));
    }

    #[test]
    fn test_parse_submissions() {
        assert_eq!(
            MoveCode::parse_submission("2").unwrap(),
            MoveCode::Step { rotation: 2 }
        );
        assert_eq!(
            MoveCode::parse_submission("1s").unwrap(),
            MoveCode::Dash { rotation: 1 }
        );
        assert_eq!(
            MoveCode::parse_submission("5-4-0").unwrap(),
            MoveCode::Warp { face: 5, row: 4, col: 0 }
        );
    }

    #[test]
    fn test_parse_rejects_malformed_submissions() {
        for bad in ["", "4", "s", "4s", "-1", "6-0-0", "0-5-0", "0-0", "0-0-0-0", "x", "+1"] {
            assert!(
                MoveCode::parse_submission(bad).is_err(),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_submission_strings() {
        assert_eq!(MoveCode::Stay.to_submission(), None);
        assert_eq!(MoveCode::Step { rotation: 0 }.to_submission().unwrap(), "0");
        assert_eq!(MoveCode::Dash { rotation: 3 }.to_submission().unwrap(), "3s");
        assert_eq!(
            MoveCode::Warp { face: 1, row: 2, col: 3 }.to_submission().unwrap(),
            "1-2-3"
        );
        assert!(MoveCode::Dash { rotation: 0 }.is_special());
        assert!(!MoveCode::Step { rotation: 0 }.is_special());
    }
}
