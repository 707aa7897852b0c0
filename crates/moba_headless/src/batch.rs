//! Batch match runner for balance testing.
//!
//! Runs many seeded matches in parallel using rayon and folds them into a
//! [`BatchSummary`]. Game `i` always uses seed `seed_start + i`, so a batch
//! is reproducible regardless of thread count.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use moba_core::config::SimConfig;
use moba_core::match_sim::MatchId;
use moba_core::team::Side;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::game_runner::{run_game, GameConfig};
use crate::metrics::{BatchSummary, GameMetrics};
use crate::scenario::Scenario;

/// Configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of matches to run
    pub game_count: u32,
    /// Maximum parallel matches (0 = use rayon default)
    pub parallel_games: u32,
    /// Starting seed for deterministic runs
    pub seed_start: u64,
    /// Simulation tuning shared by every match
    pub sim: SimConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            game_count: 100,
            parallel_games: 0,
            seed_start: 0,
            sim: SimConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Create config for `game_count` matches
    pub fn new(game_count: u32) -> Self {
        Self {
            game_count,
            ..Default::default()
        }
    }

    /// Set seed start
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Set thread count
    pub fn with_parallel(mut self, threads: u32) -> Self {
        self.parallel_games = threads;
        self
    }

    /// Set simulation tuning
    pub fn with_sim_config(mut self, sim: SimConfig) -> Self {
        self.sim = sim;
        self
    }

    fn seed_for(&self, game_index: u32) -> u64 {
        self.seed_start.wrapping_add(u64::from(game_index))
    }
}

/// Results from a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used
    pub config: BatchConfig,
    /// Individual match metrics
    pub games: Vec<GameMetrics>,
    /// Aggregate summary
    pub summary: BatchSummary,
    /// Total runtime
    pub duration_seconds: f64,
    /// Errors encountered
    pub errors: Vec<BatchError>,
}

impl BatchResults {
    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

/// Error during batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    /// Match index
    pub game_index: u32,
    /// Seed used
    pub seed: u64,
    /// Error message
    pub message: String,
}

/// Progress tracking for batch runs
#[derive(Debug)]
pub struct BatchProgress {
    /// Total matches
    pub total: u32,
    completed: AtomicU32,
    blue_wins: AtomicU32,
    start_time: Instant,
}

impl BatchProgress {
    /// Create new progress tracker
    pub fn new(total: u32) -> Self {
        Self {
            total,
            completed: AtomicU32::new(0),
            blue_wins: AtomicU32::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a finished match
    pub fn record_completion(&self, winner: Option<Side>) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        if winner == Some(Side::Blue) {
            self.blue_wins.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current completion count
    pub fn current(&self) -> u32 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Get completion percentage
    pub fn percentage(&self) -> f64 {
        f64::from(self.current()) / f64::from(self.total.max(1)) * 100.0
    }

    /// Blue wins over finished matches so far
    pub fn blue_win_rate(&self) -> f64 {
        let completed = self.current();
        if completed == 0 {
            return 0.0;
        }
        f64::from(self.blue_wins.load(Ordering::Relaxed)) / f64::from(completed)
    }

    /// Get estimated time remaining
    pub fn eta(&self) -> Duration {
        let completed = self.current();
        if completed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.start_time.elapsed();
        let per_game = elapsed.as_secs_f64() / f64::from(completed);
        let remaining = self.total.saturating_sub(completed);
        Duration::from_secs_f64(per_game * f64::from(remaining))
    }

    /// Log a progress line
    pub fn display(&self) {
        let eta = self.eta();
        info!(
            "Batch progress: {}/{} ({:.1}%), blue wins {:.1}%, ETA {}m {}s",
            self.current(),
            self.total,
            self.percentage(),
            self.blue_win_rate() * 100.0,
            eta.as_secs() / 60,
            eta.as_secs() % 60
        );
    }
}

fn game_config(config: &BatchConfig, scenario: Option<&Scenario>, game_index: u32) -> GameConfig {
    let seed = config.seed_for(game_index);
    GameConfig {
        seed,
        match_id: MatchId(u64::from(game_index) + 1),
        scenario: scenario.cloned().unwrap_or_else(|| Scenario::generated(seed)),
        sim: config.sim.clone(),
    }
}

fn run_single_game(
    config: &BatchConfig,
    scenario: Option<&Scenario>,
    game_index: u32,
) -> Result<GameMetrics> {
    let game = game_config(config, scenario, game_index);
    let result = run_game(&game)?;
    let mut metrics = GameMetrics::from_report(game_index, game.seed, &result.report);
    metrics.final_state_hash = result.final_state_hash;
    Ok(metrics)
}

/// Run a batch of matches.
///
/// With no scenario every match plays [`Scenario::generated`] for its own
/// seed. Failed matches are collected into [`BatchResults::errors`].
pub fn run_batch(config: BatchConfig, scenario: Option<&Scenario>) -> BatchResults {
    let start = Instant::now();
    let progress = BatchProgress::new(config.game_count);

    info!(
        "Starting batch run: {} matches from seed {}",
        config.game_count, config.seed_start
    );

    let play = || -> Vec<std::result::Result<GameMetrics, BatchError>> {
        (0..config.game_count)
            .into_par_iter()
            .map(|i| match run_single_game(&config, scenario, i) {
                Ok(metrics) => {
                    progress.record_completion(Some(metrics.winner_side));

                    let completed = progress.current();
                    if completed % 10 == 0 {
                        debug!("Progress: {}/{}", completed, config.game_count);
                    }
                    if completed % 100 == 0 {
                        progress.display();
                    }

                    Ok(metrics)
                }
                Err(e) => {
                    progress.record_completion(None);
                    warn!("Match {} failed: {}", i, e);
                    Err(BatchError {
                        game_index: i,
                        seed: config.seed_for(i),
                        message: e.to_string(),
                    })
                }
            })
            .collect()
    };

    let results = if config.parallel_games > 0 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_games as usize)
            .build()
        {
            Ok(pool) => pool.install(play),
            Err(e) => {
                warn!("Failed to build thread pool: {}, using default", e);
                play()
            }
        }
    } else {
        play()
    };

    let (games, errors): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.is_ok());
    let games: Vec<GameMetrics> = games.into_iter().filter_map(|r| r.ok()).collect();
    let errors: Vec<BatchError> = errors.into_iter().filter_map(|r| r.err()).collect();

    let summary = BatchSummary::from_games(&games, errors.len());
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        "Batch complete: {} matches in {:.1}s ({:.1} matches/sec)",
        games.len(),
        duration_seconds,
        games.len() as f64 / duration_seconds.max(f64::EPSILON)
    );

    BatchResults {
        config,
        games,
        summary,
        duration_seconds,
        errors,
    }
}

/// Verify determinism by running the same seed several times.
pub fn verify_determinism(scenario: Option<&Scenario>, seed: u64, runs: u32) -> Result<bool> {
    let config = BatchConfig::new(1).with_seed(seed);
    let game = game_config(&config, scenario, 0);

    let first = run_game(&game)?;
    for run in 1..runs {
        let next = run_game(&game)?;
        if next.report != first.report || next.final_state_hash != first.final_state_hash {
            warn!(seed, run, "Match diverged");
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert_eq!(config.game_count, 100);
        assert_eq!(config.parallel_games, 0);
        assert_eq!(config.sim, SimConfig::default());
    }

    #[test]
    fn test_batch_config_builder() {
        let config = BatchConfig::new(500).with_seed(12345).with_parallel(4);

        assert_eq!(config.game_count, 500);
        assert_eq!(config.seed_start, 12345);
        assert_eq!(config.parallel_games, 4);
        assert_eq!(config.seed_for(3), 12348);
    }

    #[test]
    fn test_progress_tracking() {
        let progress = BatchProgress::new(100);
        assert_eq!(progress.current(), 0);
        assert_eq!(progress.percentage(), 0.0);

        progress.record_completion(Some(Side::Blue));
        progress.record_completion(Some(Side::Red));
        progress.record_completion(Some(Side::Blue));

        assert_eq!(progress.current(), 3);
        assert!((progress.blue_win_rate() - 0.666).abs() < 0.01);
    }

    #[test]
    fn test_run_batch_small() {
        let results = run_batch(BatchConfig::new(6), None);

        assert_eq!(results.games.len(), 6);
        assert!(results.errors.is_empty());
        assert_eq!(results.summary.total_games, 6);
        assert_eq!(results.summary.blue_wins + results.summary.red_wins, 6);
        assert!(results.summary.avg_events > 0.0);
    }

    #[test]
    fn test_games_keep_index_order() {
        let results = run_batch(BatchConfig::new(8).with_seed(40), None);
        for (i, game) in results.games.iter().enumerate() {
            assert_eq!(game.game_index, i as u32);
            assert_eq!(game.seed, 40 + i as u64);
        }
    }

    #[test]
    fn test_thread_count_does_not_change_results() {
        let wide = run_batch(BatchConfig::new(6).with_seed(7), None);
        let narrow = run_batch(BatchConfig::new(6).with_seed(7).with_parallel(1), None);
        assert_eq!(wide.games, narrow.games);
        assert_eq!(wide.summary, narrow.summary);
    }

    #[test]
    fn test_shared_scenario() {
        let scenario = Scenario::generated(99);
        let results = run_batch(BatchConfig::new(4), Some(&scenario));
        assert_eq!(results.games.len(), 4);
        for game in &results.games {
            assert!(game.winner == scenario.blue.id || game.winner == scenario.red.id);
        }
    }

    #[test]
    fn test_failures_are_collected() {
        let sim = SimConfig {
            max_events: Some(1),
            ..SimConfig::default()
        };
        let results = run_batch(BatchConfig::new(3).with_sim_config(sim), None);

        assert!(results.games.is_empty());
        assert_eq!(results.errors.len(), 3);
        assert_eq!(results.summary.errors, 3);
        assert_eq!(results.errors[1].seed, 1);
    }

    #[test]
    fn test_verify_determinism() {
        assert!(verify_determinism(None, 12345, 3).unwrap());
    }

    #[test]
    fn test_batch_results_save_load() {
        let results = run_batch(BatchConfig::new(3), None);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        results.save(&path).unwrap();
        assert!(path.exists());

        let loaded = BatchResults::load(&path).unwrap();
        assert_eq!(loaded.games, results.games);
        assert_eq!(loaded.config.game_count, 3);
    }
}
