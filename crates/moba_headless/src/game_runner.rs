//! Single match execution for headless runs.
//!
//! Drafts and plays one match from a scenario with a seeded random source.
//! The same config always produces the same report.

use std::time::Instant;

use moba_core::config::SimConfig;
use moba_core::match_sim::{MatchId, MatchReport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::error::Result;
use crate::scenario::Scenario;

/// Everything needed to play one match.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Random seed for draft and match.
    pub seed: u64,
    /// Id given to the match record.
    pub match_id: MatchId,
    /// Scenario to use.
    pub scenario: Scenario,
    /// Simulation tuning.
    pub sim: SimConfig,
}

impl GameConfig {
    /// Config for the generated scenario of `seed`.
    #[must_use]
    pub fn generated(seed: u64) -> Self {
        Self {
            seed,
            match_id: MatchId(1),
            scenario: Scenario::generated(seed),
            sim: SimConfig::default(),
        }
    }
}

/// Outcome of [`run_game`].
#[derive(Debug, Clone)]
pub struct GameResult {
    /// Full match report.
    pub report: MatchReport,
    /// Engine state hash after the last event.
    pub final_state_hash: u64,
}

/// Draft and play one match.
pub fn run_game(config: &GameConfig) -> Result<GameResult> {
    let started = Instant::now();
    info!(
        match_id = config.match_id.0,
        seed = config.seed,
        scenario = %config.scenario.name,
        "Starting match"
    );

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut simulation = config.scenario.to_match(config.match_id, config.sim.clone())?;
    simulation.draft(&config.scenario.champions, &mut rng)?;
    debug!(seed = config.seed, "Draft complete");

    let report = simulation.run(&mut rng)?;
    let final_state_hash = simulation.engine().state_hash();

    debug!(
        seed = config.seed,
        events = report.events.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Match complete"
    );

    Ok(GameResult {
        report,
        final_state_hash,
    })
}
