// What-if exploration of the next turn
//
// Every turn the driver tries all 16 combinations of normal moves for the two
// agents it controls, each on its own copy of the game state, and keeps the
// combinations that leave its team with the most territory. Other agents are
// assumed to stand still.

use log::{debug, info};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::Config;
use crate::engine::GameState;
use crate::error::SimError;
use crate::moves::MoveCode;
use crate::slots::{canonical_slot, team_of};
use crate::types::{Snapshot, AGENTS, TEAMS};

/// Number of rotation pairs for two agents
const COMBINATIONS: u8 = 16;

/// Execution strategy based on available worker threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecutionStrategy {
    /// One branch after another on the calling thread
    Sequential,
    /// One branch per rayon task
    Parallel,
}

/// Result of simulating one rotation pair for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchOutcome {
    /// Rotation for each controlled slot, in `controlled_slots` order
    pub rotations: [u8; 2],
    /// Cells owned by our team after the turn
    pub owned: i32,
    pub area: [i32; TEAMS],
    pub score: [i32; TEAMS],
}

/// Branch explorer with a tie-breaking RNG
pub struct Explorer {
    config: Config,
    rng: Mutex<StdRng>,
}

impl Explorer {
    /// Creates an explorer; the RNG is seeded from config or from the OS
    pub fn new(config: Config) -> Self {
        let rng = match config.explorer.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Explorer {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Team of the controlled agents
    pub fn team(&self) -> u8 {
        team_of(self.config.explorer.controlled_slots[0])
    }

    /// Simulates all 16 rotation pairs one turn ahead
    ///
    /// Outcomes are ordered by `rotations` (first slot major) regardless of
    /// the strategy used.
    pub fn explore(&self, state: &GameState) -> Result<Vec<BranchOutcome>, SimError> {
        let strategy = Self::determine_strategy(rayon::current_num_threads(), &self.config);
        debug!("Exploring {} branches ({:?})", COMBINATIONS, strategy);

        match strategy {
            ExecutionStrategy::Sequential => (0..COMBINATIONS)
                .map(|pair| self.evaluate_branch(state, [pair / 4, pair % 4]))
                .collect(),
            ExecutionStrategy::Parallel => (0..COMBINATIONS)
                .into_par_iter()
                .map(|pair| self.evaluate_branch(state, [pair / 4, pair % 4]))
                .collect(),
        }
    }

    /// Runs one turn on a private copy of `state` with the given rotations
    pub fn evaluate_branch(&self, state: &GameState, rotations: [u8; 2]) -> Result<BranchOutcome, SimError> {
        let explorer = &self.config.explorer;
        let mut moves = [-1; AGENTS];
        for (slot, rotation) in explorer.controlled_slots.iter().zip(rotations.iter()) {
            let code = MoveCode::Step { rotation: *rotation }.code();
            moves[canonical_slot(explorer.member_id, *slot)] = code;
        }

        let mut branch = state.clone();
        branch.progress_as(explorer.member_id, &moves)?;

        let area = branch.area();
        let owned = area[usize::from(self.team())];
        debug!("Branch {:?}: owned {}, area {:?}", rotations, owned, area);
        Ok(BranchOutcome {
            rotations,
            owned,
            area,
            score: branch.score(),
        })
    }

    /// Every outcome tied for the most owned cells
    pub fn best_branches(outcomes: &[BranchOutcome]) -> Vec<BranchOutcome> {
        let best = match outcomes.iter().map(|o| o.owned).max() {
            Some(best) => best,
            None => return Vec::new(),
        };
        outcomes.iter().filter(|o| o.owned == best).copied().collect()
    }

    /// Picks one of the best outcomes uniformly at random
    pub fn choose_branch(&self, outcomes: &[BranchOutcome]) -> Option<BranchOutcome> {
        let best = Self::best_branches(outcomes);
        let mut rng = self.rng.lock();
        best.choose(&mut *rng).copied()
    }

    /// Decides the submission strings for the controlled slots
    pub fn decide(&self, snapshot: &Snapshot) -> Result<[String; 2], SimError> {
        let state = GameState::from_snapshot(snapshot)?;
        let outcomes = self.explore(&state)?;
        let chosen = self.choose_branch(&outcomes).unwrap_or(BranchOutcome {
            rotations: [0, 0],
            owned: 0,
            area: state.area(),
            score: state.score(),
        });

        info!(
            "Turn {}: chose rotations {:?} (owned {} of area {:?}, {} tied)",
            snapshot.turn,
            chosen.rotations,
            chosen.owned,
            chosen.area,
            Self::best_branches(&outcomes).len()
        );

        Ok(chosen
            .rotations
            .map(|rotation| MoveCode::Step { rotation }.to_submission().unwrap_or_default()))
    }

    fn determine_strategy(num_cpus: usize, config: &Config) -> ExecutionStrategy {
        if num_cpus >= config.explorer.min_cpus_for_parallel {
            ExecutionStrategy::Parallel
        } else {
            ExecutionStrategy::Sequential
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config(seed: u64) -> Config {
        let mut config = Config::default_hardcoded();
        config.explorer.rng_seed = Some(seed);
        config
    }

    #[test]
    fn test_determine_strategy() {
        let config = Config::default_hardcoded();
        assert_eq!(
            Explorer::determine_strategy(1, &config),
            ExecutionStrategy::Sequential
        );
        assert_eq!(
            Explorer::determine_strategy(8, &config),
            ExecutionStrategy::Parallel
        );
    }

    #[test]
    fn test_best_branches_keeps_ties() {
        let outcome = |r0, owned| BranchOutcome {
            rotations: [r0, 0],
            owned,
            area: [owned, 0, 0],
            score: [0; TEAMS],
        };
        let outcomes = [outcome(0, 3), outcome(1, 5), outcome(2, 5), outcome(3, 4)];
        let best = Explorer::best_branches(&outcomes);
        assert_eq!(best.len(), 2);
        assert!(best.iter().all(|o| o.owned == 5));
        assert!(Explorer::best_branches(&[]).is_empty());
    }

    #[test]
    fn test_choose_branch_picks_a_best_outcome() {
        let explorer = Explorer::new(seeded_config(7));
        let outcomes: Vec<BranchOutcome> = (0..4)
            .map(|r| BranchOutcome {
                rotations: [r, r],
                owned: if r % 2 == 0 { 2 } else { 1 },
                area: [0; TEAMS],
                score: [0; TEAMS],
            })
            .collect();
        for _ in 0..20 {
            let chosen = explorer.choose_branch(&outcomes).unwrap();
            assert_eq!(chosen.owned, 2);
        }
        assert!(explorer.choose_branch(&[]).is_none());
    }
}
