//! Determinism testing utilities.
//!
//! Provides a harness for verifying that drafts and matches produce
//! identical results given identical seeds.
//!
//! # Testing Strategy
//!
//! A match is a pure function of its teams, its config and the random
//! source. Sources of non-determinism include:
//!
//! - **Ambient randomness**: `thread_rng()` anywhere in the core. Every
//!   draw must go through the caller's seeded `Rng`.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The core stores teams and players in role-indexed vectors.
//!
//! - **Wall-clock reads**: the match clock is advanced only by events.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: draft and engine determinism per seed
//! 2. **Property tests**: random seeds and skills still replay identically
//! 3. **Parallel tests**: running N matches on threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use moba_core::engine::Simulation;

use crate::fixtures::seeded_rng;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a seeded simulation multiple times and verify determinism.
///
/// Each run gets a fresh state from `setup` and a fresh generator seeded
/// with `seed`, then advances `ticks` times.
///
/// # Example
///
/// ```ignore
/// use moba_test_utils::determinism::verify_determinism;
///
/// let result = verify_determinism(
///     3,
///     200,
///     42,
///     || engine_fixture(),
///     |sim, rng| { let _ = sim.tick(rng); },
///     |sim| sim.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    seed: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, &mut rand_chacha::ChaCha8Rng),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();
        let mut rng = seeded_rng(seed);

        for _ in 0..ticks {
            step(&mut state, &mut rng);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Simplified determinism check for the match engine.
///
/// Runs the engine twice from identical setups and seeds and compares the
/// final state hashes. Ticks past the end of a match are no-ops.
pub fn verify_simulation_determinism<F>(setup_fn: F, seed: u64, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let result = verify_determinism(
        2,
        num_ticks,
        seed,
        &setup_fn,
        |sim, rng| {
            let _ = sim.tick(rng);
        },
        |sim| sim.state_hash(),
    );
    result.is_deterministic
}

/// Result of parallel simulation runs.
#[derive(Debug, Clone)]
pub struct ParallelSimResult {
    /// Final state hash from each simulation.
    pub hashes: Vec<u64>,
    /// Number of simulations run.
    pub num_sims: usize,
}

impl ParallelSimResult {
    /// Check if all simulations produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all simulations matched.
    ///
    /// # Panics
    ///
    /// Panics if simulations produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel simulations diverged!\n\
                 Simulations: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_sims,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Play N matches to the end on scoped threads and collect final hashes.
///
/// Matches that hit the event cap still contribute their hash.
pub fn run_parallel_simulations_scoped<F>(setup_fn: F, seed: u64, num_sims: usize) -> ParallelSimResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    let _ = sim.run(&mut seeded_rng(seed));
                    sim.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ParallelSimResult { hashes, num_sims }
}

/// Compare two engines tick-by-tick, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs agree for `num_ticks`, `Some(tick)` otherwise.
pub fn find_first_divergence<F>(setup_fn: F, seed: u64, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();
    let mut rng1 = seeded_rng(seed);
    let mut rng2 = seeded_rng(seed);

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        let _ = sim1.tick(&mut rng1);
        let _ = sim2.tick(&mut rng2);

        if sim1.state_hash() != sim2.state_hash() {
            tracing::debug!(tick, "Simulations diverged");
            return Some(tick);
        }
    }

    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for draft and match testing.
pub mod strategies {
    use moba_core::champion::{Champion, Role};
    use moba_core::config::SimConfig;
    use moba_core::team::Lane;
    use proptest::prelude::*;

    use crate::fixtures::champion;

    /// Any seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }

    /// Uniform attribute value for a team (40-99).
    pub fn arb_attribute() -> impl Strategy<Value = u32> {
        40u32..100u32
    }

    /// Champion base skill (1-100).
    pub fn arb_skill() -> impl Strategy<Value = u32> {
        1u32..=100u32
    }

    /// Any role.
    pub fn arb_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    /// Any lane.
    pub fn arb_lane() -> impl Strategy<Value = Lane> {
        prop::sample::select(Lane::ALL.to_vec())
    }

    /// A champion pool with `min..max` single-role champions per role.
    ///
    /// Every role keeps at least four champions beyond the ten bans, so a
    /// full draft is always possible.
    pub fn arb_champion_pool() -> impl Strategy<Value = Vec<Champion>> {
        proptest::collection::vec(arb_skill(), 70..90).prop_map(|skills| {
            skills
                .into_iter()
                .enumerate()
                .map(|(n, skill)| {
                    let role = Role::ALL[n % Role::ALL.len()];
                    champion(n as u32, skill, &[role])
                })
                .collect()
        })
    }

    /// A sequence of match-clock instants in seconds.
    pub fn arb_clock_sequence(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
        proptest::collection::vec(0u64..3600, 0..max_len)
    }

    /// Engine tuning within valid ranges.
    ///
    /// Inhibitors stay down for at least a few events, otherwise no base
    /// tower could ever be reached.
    pub fn arb_sim_config() -> impl Strategy<Value = SimConfig> {
        (0.05f64..0.45, 180u64..600, 0.0f64..=1.0).prop_map(
            |(min_win_chance, inhibitor_respawn_secs, assist_chance)| SimConfig {
                min_win_chance,
                inhibitor_respawn_secs,
                assist_chance,
                ..SimConfig::default()
            },
        )
    }
}
