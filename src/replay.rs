// Replay module for checking the simulator against recorded server snapshots
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-simulate each recorded turn from the previous snapshot
// 3. Compare the simulated state with what the server reported
// 4. Generate detailed analysis reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::debug_logger::LogEntry;
use crate::engine::GameState;
use crate::topology::field_coords;
use crate::types::{Cell, Position, Snapshot, AGENTS, TEAMS};

/// One difference between the simulated and the reported state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Cell {
        face: u8,
        row: u8,
        col: u8,
        expected: Cell,
        simulated: Cell,
    },
    Agent {
        slot: usize,
        expected: Position,
        simulated: Position,
    },
    Special {
        slot: usize,
        expected: i32,
        simulated: i32,
    },
    Score {
        expected: [i32; TEAMS],
        simulated: [i32; TEAMS],
    },
    Turn {
        expected: i32,
        simulated: i32,
    },
}

/// Result of re-simulating one recorded turn
#[derive(Debug, Clone)]
pub struct TransitionResult {
    pub from_turn: i32,
    pub to_turn: i32,
    pub moves: [i32; AGENTS],
    pub mismatches: Vec<Mismatch>,
}

impl TransitionResult {
    pub fn matches(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_transitions: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Simulates `next.moves` from `prev` and diffs the result against `next`
    pub fn verify_transition(&self, prev: &Snapshot, next: &Snapshot) -> Result<TransitionResult, String> {
        let mut simulated = GameState::from_snapshot(prev)
            .map_err(|e| format!("Turn {}: {}", prev.turn, e))?;
        simulated
            .progress(&next.moves)
            .map_err(|e| format!("Turn {}: {}", prev.turn, e))?;
        let expected =
            GameState::from_snapshot(next).map_err(|e| format!("Turn {}: {}", next.turn, e))?;

        let result = TransitionResult {
            from_turn: prev.turn,
            to_turn: next.turn,
            moves: next.moves,
            mismatches: Self::diff(&expected, &simulated),
        };

        if self.verbose {
            if result.matches() {
                info!(
                    "Turn {} -> {}: ✓ MATCH (moves {:?})",
                    result.from_turn, result.to_turn, result.moves
                );
            } else {
                warn!(
                    "Turn {} -> {}: ✗ {} difference(s) (moves {:?})",
                    result.from_turn,
                    result.to_turn,
                    result.mismatches.len(),
                    result.moves
                );
            }
        }

        Ok(result)
    }

    /// Verifies every consecutive pair of entries one turn apart
    pub fn replay_all(&self, entries: &[LogEntry]) -> Result<Vec<TransitionResult>, String> {
        let mut results = Vec::new();

        for pair in entries.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.turn != prev.turn + 1 {
                warn!("Skipping turn {} -> {}: not consecutive", prev.turn, next.turn);
                continue;
            }

            match self.verify_transition(&prev.snapshot, &next.snapshot) {
                Ok(result) => {
                    let matched = result.matches();
                    results.push(result);
                    if !matched && self.config.replay.stop_on_first_mismatch {
                        warn!("Stopping at first mismatch (turn {})", prev.turn);
                        break;
                    }
                }
                Err(e) => warn!("Failed to replay turn {}: {}", prev.turn, e),
            }
        }

        Ok(results)
    }

    /// Verifies the transitions starting at the given turns
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<TransitionResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let prev = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;
            let next = entries
                .iter()
                .find(|e| e.turn == *turn_num + 1)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num + 1))?;

            results.push(self.verify_transition(&prev.snapshot, &next.snapshot)?);
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[TransitionResult]) -> ReplayStats {
        let total_transitions = results.len();
        let matches = results.iter().filter(|r| r.matches()).count();
        let mismatches = total_transitions - matches;
        let match_rate = if total_transitions > 0 {
            (matches as f64 / total_transitions as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_transitions,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[TransitionResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Transitions:    {}", stats.total_transitions);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        let failed: Vec<_> = results.iter().filter(|r| !r.matches()).collect();
        if !failed.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in failed {
                println!(
                    "Turn {} -> {} (moves {:?}):",
                    result.from_turn, result.to_turn, result.moves
                );
                for mismatch in result.mismatches.iter() {
                    println!("  {}", Self::describe(mismatch));
                }
            }
            println!();
        }
    }

    fn diff(expected: &GameState, simulated: &GameState) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();

        let expected_cells = expected.field().cells();
        let simulated_cells = simulated.field().cells();
        for (index, (e, s)) in expected_cells.iter().zip(simulated_cells.iter()).enumerate() {
            if e != s {
                let (face, row, col) = field_coords(index);
                mismatches.push(Mismatch::Cell {
                    face,
                    row,
                    col,
                    expected: *e,
                    simulated: *s,
                });
            }
        }

        for slot in 0..AGENTS {
            let (e, s) = (expected.position(slot), simulated.position(slot));
            if e != s {
                mismatches.push(Mismatch::Agent {
                    slot,
                    expected: e,
                    simulated: s,
                });
            }
            let (e, s) = (expected.special(slot), simulated.special(slot));
            if e != s {
                mismatches.push(Mismatch::Special {
                    slot,
                    expected: e,
                    simulated: s,
                });
            }
        }

        if expected.score() != simulated.score() {
            mismatches.push(Mismatch::Score {
                expected: expected.score(),
                simulated: simulated.score(),
            });
        }
        if expected.turn() != simulated.turn() {
            mismatches.push(Mismatch::Turn {
                expected: expected.turn(),
                simulated: simulated.turn(),
            });
        }

        mismatches
    }

    fn describe(mismatch: &Mismatch) -> String {
        match mismatch {
            Mismatch::Cell {
                face,
                row,
                col,
                expected,
                simulated,
            } => format!(
                "cell ({}, {}, {}): server {:?}, simulated {:?}",
                face,
                row,
                col,
                expected.to_wire(),
                simulated.to_wire()
            ),
            Mismatch::Agent {
                slot,
                expected,
                simulated,
            } => format!(
                "agent {}: server {:?}, simulated {:?}",
                slot, expected, simulated
            ),
            Mismatch::Special {
                slot,
                expected,
                simulated,
            } => format!(
                "special {}: server {}, simulated {}",
                slot, expected, simulated
            ),
            Mismatch::Score {
                expected,
                simulated,
            } => format!("score: server {:?}, simulated {:?}", expected, simulated),
            Mismatch::Turn {
                expected,
                simulated,
            } => format!("turn: server {}, simulated {}", expected, simulated),
        }
    }
}
