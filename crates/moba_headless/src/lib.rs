//! Headless match runner for balance checks and CI verification.
//!
//! This crate drives `moba_core` without any UI:
//!
//! - **Single matches**: draft and play one seeded match, emit the report as JSON
//! - **Batch runs**: play many seeded matches in parallel and summarize them
//! - **Determinism checks**: replay a seed and compare reports and state hashes
//!
//! # Output
//!
//! - **stdout**: JSON results (reports, summaries) or RON scenarios
//! - **stderr**: logs (human-readable)
//!
//! # Example
//!
//! ```bash
//! # One match on a generated roster
//! cargo run -p moba_headless -- run --seed 7
//!
//! # A batch of 1000 matches
//! cargo run -p moba_headless -- batch --count 1000 --seed 0
//! ```

pub mod batch;
pub mod error;
pub mod game_runner;
pub mod metrics;
pub mod scenario;

pub use batch::{run_batch, verify_determinism, BatchConfig, BatchResults};
pub use error::HeadlessError;
pub use game_runner::{run_game, GameConfig, GameResult};
pub use metrics::{BatchSummary, GameMetrics};
pub use scenario::{Scenario, ScenarioError};
