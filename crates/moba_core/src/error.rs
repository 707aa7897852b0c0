//! Error types for the draft and match simulation.

use thiserror::Error;

use crate::champion::{ChampionId, Role};
use crate::events::EventKind;
use crate::team::{Side, TeamId};

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all draft and simulation errors.
///
/// Nothing in the core retries. Every variant halts the current draft or
/// match attempt and is handed back to the caller.
#[derive(Debug, Error)]
pub enum GameError {
    /// A roster slot reached the engine without a champion.
    #[error("No champion assigned to {role} of team {team}")]
    NoChampionAssigned {
        /// Team owning the empty slot.
        team: TeamId,
        /// Role of the empty slot.
        role: Role,
    },

    /// The recorded winner is not one of the two teams of the match.
    #[error("Team {0} cannot be the victorious team in this match")]
    InvalidVictoriousTeam(TeamId),

    /// A roster could not be turned into a five-role lineup.
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    /// Two roster players were assigned the same role.
    #[error("Role {0} is assigned to more than one player")]
    DuplicateRole(Role),

    /// No available champion has full affinity for the role being picked.
    #[error("No pickable champion for {role} on {side} side")]
    NoPickCandidates {
        /// Side making the pick.
        side: Side,
        /// Role being filled.
        role: Role,
    },

    /// The shared pool has nothing left to ban.
    #[error("No bannable champion left for {0} side")]
    NoBanCandidates(Side),

    /// The champion was already banned or picked.
    #[error("Champion {0} is not available")]
    ChampionUnavailable(ChampionId),

    /// The champion is not part of the draft pool.
    #[error("Champion {0} is not in the champion pool")]
    UnknownChampion(ChampionId),

    /// The role already has a champion for this side.
    #[error("Role {role} is already filled on {side} side")]
    RoleAlreadyFilled {
        /// Side making the pick.
        side: Side,
        /// Role that is already filled.
        role: Role,
    },

    /// A draft action was attempted after the draft finished.
    #[error("Picks and bans are already over")]
    DraftOver,

    /// A side acted while the draft expected a different action.
    #[error("Not {side} side's turn to {action}")]
    OutOfTurn {
        /// Side that tried to act.
        side: Side,
        /// Attempted action, "ban" or "pick".
        action: &'static str,
    },

    /// A structure was attacked after it had already fallen.
    #[error("Structure already destroyed: {0}")]
    StructureAlreadyDestroyed(String),

    /// A role multiplier fell outside `0.0..=1.0`.
    #[error("Role multiplier for {role} must be within 0.0 and 1.0, got {value}")]
    InvalidRoleMultiplier {
        /// Offending role.
        role: Role,
        /// Offending value.
        value: f64,
    },

    /// A champion has no role it plays at full affinity.
    #[error("Champion '{0}' has no role with full affinity")]
    NoFullRoleAffinity(String),

    /// A champion was built with identical primary and secondary types.
    #[error("Champion '{0}' repeats its primary type as secondary type")]
    DuplicateChampionType(String),

    /// A jungle event was built from a kind that is not a jungle objective.
    #[error("Invalid event kind passed to jungle event: {0:?}")]
    UnknownJungleObjective(EventKind),

    /// A weighted draw was attempted with unusable weights.
    #[error("Invalid weights for random choice: {0}")]
    InvalidWeights(String),

    /// The engine hit its configured safety cap before a nexus fell.
    #[error("Match did not finish after {events} events ({match_time_secs}s of match time)")]
    EventLimitReached {
        /// Number of events resolved.
        events: u32,
        /// Match clock when the cap tripped.
        match_time_secs: u64,
    },

    /// Failed to parse a configuration document.
    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {message}")]
    ConfigRead {
        /// Path to the file that failed to load.
        path: String,
        /// Error message.
        message: String,
    },

    /// A match date could not be parsed.
    #[error("Invalid match date '{0}'")]
    InvalidDate(String),
}
