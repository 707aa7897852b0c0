//! # MOBA Core
//!
//! Picks & bans draft and event-driven match simulation for a MOBA manager.
//!
//! This crate contains **only** match logic:
//! - No rendering
//! - No IO beyond optional config loading
//! - No ambient randomness (every draw goes through a caller-supplied `Rng`)
//! - No wall-clock reads (match time is a `Duration` advanced by events)
//!
//! This separation enables:
//! - Reproducible matches from a seed
//! - Headless batch runs
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`champion`] - Champions, roles and role affinities
//! - [`player`] - Player records and the per-match skill model
//! - [`team`] - Team battle state: towers, inhibitors, nexus, roster
//! - [`draft`] - Picks & bans state machine
//! - [`events`] - Event catalog, factory and resolution
//! - [`engine`] - Tick-by-tick match engine
//! - [`match_sim`] - Match records and the draft + play orchestrator
//! - [`config`] - Simulation tuning

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod champion;
pub mod config;
pub mod draft;
pub mod engine;
pub mod error;
pub mod events;
pub mod match_sim;
pub mod player;
pub mod random;
pub mod team;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::champion::{
        Champion, ChampionDifficulty, ChampionId, ChampionType, Role, RoleMultipliers,
    };
    pub use crate::config::{EventDurations, SimConfig};
    pub use crate::draft::{Draft, DraftAction, DraftActionKind, DraftPhase};
    pub use crate::engine::{EngineState, Simulation};
    pub use crate::error::{GameError, Result};
    pub use crate::events::{EventKind, EventOutcome, SimEvent};
    pub use crate::match_sim::{Match, MatchId, MatchRecord, MatchReport, MatchSimulation};
    pub use crate::player::{MasteryTier, Player, PlayerAttributes, PlayerId, RosterPlayer};
    pub use crate::team::{Lane, Side, Team, TeamBattleState, TeamId, Teams};
}
