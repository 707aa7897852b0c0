//! Event-driven match engine.
//!
//! One tick resolves exactly one event:
//!
//! 1. Respawn inhibitors whose deadline has passed.
//! 2. Refresh win probabilities.
//! 3. Compute the enabled event kinds for the current minute.
//! 4. Draw one kind, weighted by catalog priority.
//! 5. Create and resolve the event, append it to the history and advance the
//!    clock by its duration.
//! 6. Stop once a nexus has fallen.
//!
//! # Termination
//!
//! Contested rolls are clamped away from 0 and 1, towers never come back,
//! and Nexus Assault carries the highest priority once a nexus is exposed.
//! A match therefore ends with probability 1. [`SimConfig::max_events`]
//! bounds the loop for tests and batch runs regardless.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SimConfig;
use crate::error::{GameError, Result};
use crate::events::{catalog_entry, create_event, enabled_events, EventKind, SimEvent};
use crate::random::choose_weighted;
use crate::team::{Side, Teams};

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineState {
    /// Both nexuses stand.
    Running,
    /// A nexus has fallen.
    Over,
}

/// A match in progress: both teams, the clock and the resolved events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    teams: Teams,
    config: SimConfig,
    match_time: Duration,
    history: Vec<SimEvent>,
    state: EngineState,
}

impl Simulation {
    /// Create an engine at match time zero.
    #[must_use]
    pub fn new(teams: Teams, config: SimConfig) -> Self {
        Self {
            teams,
            config,
            match_time: Duration::ZERO,
            history: Vec::new(),
            state: EngineState::Running,
        }
    }

    /// Both teams.
    #[must_use]
    pub const fn teams(&self) -> &Teams {
        &self.teams
    }

    /// Both teams, mutably. Used by the draft before the first tick.
    pub fn teams_mut(&mut self) -> &mut Teams {
        &mut self.teams
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current match clock.
    #[must_use]
    pub const fn match_time(&self) -> Duration {
        self.match_time
    }

    /// Resolved events in order.
    #[must_use]
    pub fn history(&self) -> &[SimEvent] {
        &self.history
    }

    /// Number of events resolved so far.
    #[must_use]
    pub fn events_resolved(&self) -> u32 {
        self.history.len() as u32
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Whether a nexus has fallen.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state == EngineState::Over
    }

    /// Side whose nexus still stands, once the match is over.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        if !self.is_over() {
            return None;
        }
        Side::BOTH
            .into_iter()
            .find(|&side| self.teams[side].is_nexus_alive())
    }

    /// Event kinds eligible at the current clock.
    #[must_use]
    pub fn enabled_events(&self) -> Vec<EventKind> {
        enabled_events(self.match_time, &self.teams.blue, &self.teams.red)
    }

    /// Resolve one event.
    ///
    /// Does nothing once the match is over.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<EngineState> {
        if self.is_over() {
            return Ok(self.state);
        }

        self.teams.update_cooldowns(self.match_time);
        self.teams.update_win_probabilities();

        let enabled = self.enabled_events();
        let kind = *choose_weighted(rng, &enabled, |kind| {
            f64::from(catalog_entry(*kind).priority)
        })?;

        let mut event = create_event(kind, &self.teams, self.match_time)?;
        event.resolve(&mut self.teams, &self.config, rng)?;
        self.match_time = event.end_time();

        debug!(
            event = %kind,
            minute = self.match_time.as_secs() / 60,
            outcome = ?event.outcome,
            blue_nexus = self.teams.blue.nexus(),
            red_nexus = self.teams.red.nexus(),
            "Event resolved"
        );
        self.history.push(event);

        if !self.teams.blue.is_nexus_alive() || !self.teams.red.is_nexus_alive() {
            self.state = EngineState::Over;
        }

        #[cfg(feature = "debug-validation")]
        self.validate_structures();

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::trace!(events = self.history.len(), state_hash = hash, "Engine state hash");
        }

        Ok(self.state)
    }

    /// Tick until a nexus falls and return the winning side.
    ///
    /// Fails with [`GameError::EventLimitReached`] when the configured cap
    /// trips first.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Side> {
        while !self.is_over() {
            if let Some(max_events) = self.config.max_events {
                if self.events_resolved() >= max_events {
                    warn!(
                        events = max_events,
                        match_time_secs = self.match_time.as_secs(),
                        "Event cap reached before a nexus fell"
                    );
                    return Err(GameError::EventLimitReached {
                        events: max_events,
                        match_time_secs: self.match_time.as_secs(),
                    });
                }
            }
            self.tick(rng)?;
        }

        let winner = if self.teams.blue.is_nexus_alive() {
            Side::Blue
        } else {
            Side::Red
        };
        debug!(
            %winner,
            events = self.history.len(),
            match_time_secs = self.match_time.as_secs(),
            "Match over"
        );
        Ok(winner)
    }

    /// Restore teams, clock and history. Only valid between matches.
    pub fn reset(&mut self) {
        self.teams.reset();
        self.match_time = Duration::ZERO;
        self.history.clear();
        self.state = EngineState::Running;
    }

    /// Hash of the clock, structures, player counters and history.
    ///
    /// Two engines fed the same teams and seed hash identically.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.match_time.hash(&mut hasher);
        self.state.hash(&mut hasher);

        for side in Side::BOTH {
            let team = &self.teams[side];
            team.team_id.hash(&mut hasher);
            team.towers.hash(&mut hasher);
            team.inhibitors.hash(&mut hasher);
            team.nexus().hash(&mut hasher);
            for player in team.players() {
                player.stats.hash(&mut hasher);
                player.consecutive_kills.hash(&mut hasher);
                player.points.hash(&mut hasher);
            }
        }

        self.history.len().hash(&mut hasher);
        for event in &self.history {
            event.kind.hash(&mut hasher);
            event.time.hash(&mut hasher);
            event.outcome.hash(&mut hasher);
            event.winner.hash(&mut hasher);
            event.duration.hash(&mut hasher);
        }

        hasher.finish()
    }

    #[cfg(feature = "debug-validation")]
    fn validate_structures(&self) {
        use crate::team::{BASE_TOWERS, LANE_TOWERS};

        for side in Side::BOTH {
            let team = &self.teams[side];
            for lane in crate::team::Lane::ALL {
                debug_assert!(team.towers.lane(lane) <= LANE_TOWERS);
            }
            debug_assert!(team.towers.base <= BASE_TOWERS);
            debug_assert!(team.nexus() <= 1);
        }
        debug_assert!(self.teams.blue.is_nexus_alive() || self.teams.red.is_nexus_alive());
    }
}
