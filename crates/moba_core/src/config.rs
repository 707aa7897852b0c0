//! Simulation tuning loaded from RON.
//!
//! All values have defaults; a RON document only needs the fields it
//! overrides.
//!
//! # Example RON
//!
//! ```ron
//! SimConfig(
//!     inhibitor_respawn_secs: 300,
//!     durations: EventDurations(fight: 40),
//!     min_win_chance: 0.2,
//!     max_events: Some(5000),
//! )
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::events::EventKind;

/// Upper bound for `inhibitor_respawn_secs`.
pub const MAX_INHIBITOR_RESPAWN_SECS: u64 = 3600;

/// Upper bound for any single event duration.
pub const MAX_EVENT_SECS: u64 = 3600;

/// Match clock seconds consumed by each event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDurations {
    /// Quiet stretch.
    pub nothing: u64,
    /// Skirmish.
    pub fight: u64,
    /// Any jungle objective.
    pub jungle: u64,
    /// Tower push.
    pub tower: u64,
    /// Inhibitor push.
    pub inhibitor: u64,
    /// Nexus push.
    pub nexus: u64,
}

impl Default for EventDurations {
    fn default() -> Self {
        Self {
            nothing: 30,
            fight: 45,
            jungle: 60,
            tower: 60,
            inhibitor: 60,
            nexus: 45,
        }
    }
}

impl EventDurations {
    /// Clock advance for an event kind.
    #[must_use]
    pub fn for_kind(&self, kind: EventKind) -> Duration {
        let secs = match kind {
            EventKind::Nothing => self.nothing,
            EventKind::Fight => self.fight,
            EventKind::JungleVoidgrubs
            | EventKind::JungleHerald
            | EventKind::JungleBaron
            | EventKind::JungleDragon => self.jungle,
            EventKind::TowerAssault => self.tower,
            EventKind::InhibitorAssault => self.inhibitor,
            EventKind::NexusAssault => self.nexus,
        };
        Duration::from_secs(secs)
    }
}

/// Tuning for the simulation engine and event resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seconds a downed inhibitor stays down.
    pub inhibitor_respawn_secs: u64,
    /// Clock advance per event kind.
    pub durations: EventDurations,
    /// Floor (and `1 - ceiling`) for any contested roll.
    pub min_win_chance: f64,
    /// Bonus points for scoring a kill.
    pub kill_points: u32,
    /// Bonus points for an assist.
    pub assist_points: u32,
    /// Chance for each other member of the winning side to assist a kill.
    pub assist_chance: f64,
    /// Safety cap on resolved events. `None` runs until a nexus falls.
    pub max_events: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            inhibitor_respawn_secs: 300,
            durations: EventDurations::default(),
            min_win_chance: 0.15,
            kill_points: 2,
            assist_points: 1,
            assist_chance: 0.5,
            max_events: Some(10_000),
        }
    }
}

impl SimConfig {
    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = ron::from_str(ron).map_err(|e| GameError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| GameError::ConfigRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_ron_str(&contents)
    }

    /// Reject values that would stall or skew the simulation.
    pub fn validate(&self) -> Result<()> {
        let d = &self.durations;
        if [d.nothing, d.fight, d.jungle, d.tower, d.inhibitor, d.nexus].contains(&0) {
            return Err(GameError::ConfigParse(
                "event durations must be greater than zero".to_string(),
            ));
        }
        if [d.nothing, d.fight, d.jungle, d.tower, d.inhibitor, d.nexus]
            .iter()
            .any(|&secs| secs > MAX_EVENT_SECS)
        {
            return Err(GameError::ConfigParse(format!(
                "event durations must not exceed {MAX_EVENT_SECS} seconds"
            )));
        }
        // A downed inhibitor must outlast its own assault and one tower push,
        // otherwise base towers and the nexus are never exposed.
        let min_respawn = d.inhibitor + d.tower;
        if self.inhibitor_respawn_secs <= min_respawn
            || self.inhibitor_respawn_secs > MAX_INHIBITOR_RESPAWN_SECS
        {
            return Err(GameError::ConfigParse(format!(
                "inhibitor_respawn_secs must be within ({min_respawn}, {MAX_INHIBITOR_RESPAWN_SECS}], got {}",
                self.inhibitor_respawn_secs
            )));
        }
        if !(0.0..0.5).contains(&self.min_win_chance) {
            return Err(GameError::ConfigParse(format!(
                "min_win_chance must be within [0.0, 0.5), got {}",
                self.min_win_chance
            )));
        }
        if !(0.0..=1.0).contains(&self.assist_chance) {
            return Err(GameError::ConfigParse(format!(
                "assist_chance must be within [0.0, 1.0], got {}",
                self.assist_chance
            )));
        }
        Ok(())
    }

    /// Inhibitor respawn cooldown.
    #[must_use]
    pub fn inhibitor_respawn(&self) -> Duration {
        Duration::from_secs(self.inhibitor_respawn_secs)
    }

    /// Clamp a probability into `[min_win_chance, 1 - min_win_chance]`.
    #[must_use]
    pub fn clamp_chance(&self, chance: f64) -> f64 {
        chance.clamp(self.min_win_chance, 1.0 - self.min_win_chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = SimConfig::from_ron_str(
            "SimConfig(inhibitor_respawn_secs: 120, durations: EventDurations(fight: 40))",
        )
        .unwrap();
        assert_eq!(config.inhibitor_respawn(), Duration::from_secs(120));
        assert_eq!(config.durations.fight, 40);
        assert_eq!(config.durations.nexus, 45);
        assert_eq!(config.max_events, Some(10_000));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let result = SimConfig::from_ron_str("SimConfig(durations: EventDurations(nothing: 0))");
        assert!(matches!(result, Err(GameError::ConfigParse(_))));
    }

    #[test]
    fn test_short_respawn_rejected() {
        for secs in [0, 30, 60, 120] {
            let result =
                SimConfig::from_ron_str(&format!("SimConfig(inhibitor_respawn_secs: {secs})"));
            assert!(matches!(result, Err(GameError::ConfigParse(_))), "{secs}");
        }
        assert!(SimConfig::from_ron_str("SimConfig(inhibitor_respawn_secs: 121)").is_ok());
    }

    #[test]
    fn test_respawn_bound_follows_durations() {
        let config = SimConfig {
            inhibitor_respawn_secs: 150,
            durations: EventDurations {
                inhibitor: 90,
                tower: 60,
                ..EventDurations::default()
            },
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(GameError::ConfigParse(_))));
    }

    #[test]
    fn test_oversized_values_rejected() {
        let result = SimConfig::from_ron_str("SimConfig(inhibitor_respawn_secs: 18446744073709551615)");
        assert!(matches!(result, Err(GameError::ConfigParse(_))));
        assert!(SimConfig::from_ron_str("SimConfig(inhibitor_respawn_secs: 3600)").is_ok());

        let result = SimConfig::from_ron_str(
            "SimConfig(durations: EventDurations(nexus: 18446744073709551615))",
        );
        assert!(matches!(result, Err(GameError::ConfigParse(_))));
    }

    #[test]
    fn test_bad_ron_rejected() {
        assert!(SimConfig::from_ron_str("SimConfig(min_win_chance: ").is_err());
    }

    #[test]
    fn test_clamp_chance() {
        let config = SimConfig::default();
        assert!((config.clamp_chance(0.01) - 0.15).abs() < 1e-9);
        assert!((config.clamp_chance(0.99) - 0.85).abs() < 1e-9);
        assert!((config.clamp_chance(0.4) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_durations_per_kind() {
        let durations = EventDurations::default();
        assert_eq!(durations.for_kind(EventKind::JungleBaron), Duration::from_secs(60));
        assert_eq!(durations.for_kind(EventKind::Nothing), Duration::from_secs(30));
    }
}
