// Configuration module for reading Sim.toml
//
// Only the driver around the simulator is tunable: which participant we are,
// which slots we steer, how branches are evaluated and where debug logs go.
// The board geometry and turn count are fixed game constants, not settings.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::slots::{slots_of_team, team_of};

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub explorer: ExplorerConfig,
    pub debug: DebugConfig,
    pub replay: ReplayConfig,
}

/// What-if branch exploration settings
#[derive(Debug, Deserialize, Clone)]
pub struct ExplorerConfig {
    /// Participant id used to lay out submitted batches (0 when the server
    /// already reports the world in our frame)
    pub member_id: usize,
    /// The two slots we control
    pub controlled_slots: [usize; 2],
    /// Below this many worker threads branches are evaluated sequentially
    pub min_cpus_for_parallel: usize,
    /// Fixed seed for tie-breaking; entropy seeded when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

/// Snapshot replay settings
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayConfig {
    pub stop_on_first_mismatch: bool,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Sim.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Sim.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Sim.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Sim.toml
    pub fn default_hardcoded() -> Self {
        Config {
            explorer: ExplorerConfig {
                member_id: 0,
                controlled_slots: [0, 5],
                min_cpus_for_parallel: 2,
                rng_seed: None,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "cube_paint_debug.jsonl".to_string(),
            },
            replay: ReplayConfig {
                stop_on_first_mismatch: false,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Sim.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    fn validate(&self) -> Result<(), String> {
        let explorer = &self.explorer;
        if explorer.member_id >= 6 {
            return Err(format!("explorer.member_id {} out of range 0..6", explorer.member_id));
        }
        let [a, b] = explorer.controlled_slots;
        if a >= 6 || b >= 6 || a == b {
            return Err(format!(
                "explorer.controlled_slots {:?} must be two distinct slots in 0..6",
                explorer.controlled_slots
            ));
        }
        if slots_of_team(team_of(a)) != [a.min(b), a.max(b)] {
            return Err(format!(
                "explorer.controlled_slots {:?} must belong to the same team",
                explorer.controlled_slots
            ));
        }
        Ok(())
    }
}
