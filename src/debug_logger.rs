// Debug logging module for per-turn game state logging
//
// Each decided turn appends one JSON line with the authoritative snapshot and
// the submission strings we sent back. The replay tool reads these files to
// check the simulator against the server.

use log::error;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Arc;

use crate::types::Snapshot;

/// A single debug log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: i32,
    /// Submission strings for our two agents
    pub submitted: Vec<String>,
    pub snapshot: Snapshot,
    pub timestamp: String,
}

/// Shared debug logger state
/// Uses Arc<Mutex<..>> so clones can write from any thread
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<BufWriter<File>>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(BufWriter::new(file)))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Appends one entry; failures are logged and otherwise ignored
    pub fn log_turn(&self, snapshot: &Snapshot, submitted: &[String]) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            turn: snapshot.turn,
            submitted: submitted.to_vec(),
            snapshot: snapshot.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let json_line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
                return;
            }
        };

        let mut file_guard = self.file.lock();
        if let Some(file) = file_guard.as_mut() {
            if let Err(e) = writeln!(file, "{}", json_line) {
                error!("Failed to write debug log entry: {}", e);
            } else if let Err(e) = file.flush() {
                error!("Failed to flush debug log: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameState;
    use crate::field::Field;
    use crate::types::{Agent, Position};

    fn sample_snapshot() -> Snapshot {
        let agents = [Agent {
            position: Position::new(1, 2, 3, 0),
            special: 2,
        }; 6];
        GameState::from_parts(Field::default(), agents, 9, [0; 3]).to_snapshot()
    }

    #[test]
    fn test_disabled_logger_is_noop() {
        let logger = DebugLogger::disabled();
        assert!(!logger.is_enabled());
        logger.log_turn(&sample_snapshot(), &["0".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_logged_lines_parse_back() {
        let path = std::env::temp_dir().join(format!("cube_paint_log_{}.jsonl", std::process::id()));
        let path_str = path.to_str().unwrap();

        let logger = DebugLogger::new(true, path_str);
        assert!(logger.is_enabled());
        let snapshot = sample_snapshot();
        logger.log_turn(&snapshot, &["2".to_string(), "3s".to_string()]);
        logger.log_turn(&snapshot, &["1-2-3".to_string(), "0".to_string()]);

        let contents = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<LogEntry> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].turn, 9);
        assert_eq!(entries[0].submitted, vec!["2", "3s"]);
        assert_eq!(entries[1].snapshot, snapshot);
        assert!(contents.contains("\"move\""));

        let _ = std::fs::remove_file(&path);
    }
}
