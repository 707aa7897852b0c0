//! Player records and the per-match skill model.
//!
//! [`Player`] is the generated, persistent record. [`RosterPlayer`] wraps it
//! for one match: an assigned role, an optional champion from the draft,
//! and the counters that the simulation mutates.
//!
//! Effective strength for a match is
//! `role overall * role multiplier + champion skill * mastery + points`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::champion::{Champion, ChampionId, Role, RoleMultipliers};

/// Unique identifier for players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer mean of a group of attribute values.
fn group_overall(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    values.iter().sum::<u32>() / values.len() as u32
}

/// Aggression and lane dominance.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffensiveAttributes {
    pub lane_pressure: u32,
    pub kill_instinct: u32,
    pub aggressiveness: u32,
}

impl OffensiveAttributes {
    /// Mean of the group.
    #[must_use]
    pub fn overall(&self) -> u32 {
        group_overall(&[self.lane_pressure, self.kill_instinct, self.aggressiveness])
    }
}

/// Team play and calls.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationAttributes {
    pub shot_calling: u32,
    pub decisioning: u32,
    pub team_work: u32,
}

impl CommunicationAttributes {
    /// Mean of the group.
    #[must_use]
    pub fn overall(&self) -> u32 {
        group_overall(&[self.shot_calling, self.decisioning, self.team_work])
    }
}

/// Raw execution.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechanicsAttributes {
    pub reflexes: u32,
    pub speed: u32,
    pub farming: u32,
    pub kiting: u32,
    pub positioning: u32,
    pub accuracy: u32,
}

impl MechanicsAttributes {
    /// Mean of the group.
    #[must_use]
    pub fn overall(&self) -> u32 {
        group_overall(&[
            self.reflexes,
            self.speed,
            self.farming,
            self.kiting,
            self.positioning,
            self.accuracy,
        ])
    }
}

/// Map and objective play.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityAttributes {
    pub vision_control: u32,
    pub map_control: u32,
    pub objective_control: u32,
}

impl UtilityAttributes {
    /// Mean of the group.
    #[must_use]
    pub fn overall(&self) -> u32 {
        group_overall(&[self.vision_control, self.map_control, self.objective_control])
    }
}

/// Game knowledge.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeAttributes {
    pub map_awareness: u32,
    pub timing: u32,
    pub itemization: u32,
}

impl KnowledgeAttributes {
    /// Mean of the group.
    #[must_use]
    pub fn overall(&self) -> u32 {
        group_overall(&[self.map_awareness, self.timing, self.itemization])
    }
}

/// The five attribute groups of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    /// Offensive group.
    pub offensive: OffensiveAttributes,
    /// Communication group.
    pub communication: CommunicationAttributes,
    /// Mechanics group.
    pub mechanics: MechanicsAttributes,
    /// Knowledge group.
    pub knowledge: KnowledgeAttributes,
    /// Utility group.
    pub utility: UtilityAttributes,
}

impl PlayerAttributes {
    /// Every attribute set to `value`. Handy for fixtures.
    #[must_use]
    pub const fn uniform(value: u32) -> Self {
        Self {
            offensive: OffensiveAttributes {
                lane_pressure: value,
                kill_instinct: value,
                aggressiveness: value,
            },
            communication: CommunicationAttributes {
                shot_calling: value,
                decisioning: value,
                team_work: value,
            },
            mechanics: MechanicsAttributes {
                reflexes: value,
                speed: value,
                farming: value,
                kiting: value,
                positioning: value,
                accuracy: value,
            },
            knowledge: KnowledgeAttributes {
                map_awareness: value,
                timing: value,
                itemization: value,
            },
            utility: UtilityAttributes {
                vision_control: value,
                map_control: value,
                objective_control: value,
            },
        }
    }

    /// Role-weighted overall rating.
    ///
    /// Every group counts once, then each role adds five more weighted group
    /// shares, and the total is divided by ten.
    #[must_use]
    pub fn overall(&self, role: Role) -> u32 {
        let offensive = self.offensive.overall();
        let communication = self.communication.overall();
        let mechanics = self.mechanics.overall();
        let knowledge = self.knowledge.overall();
        let utility = self.utility.overall();

        let mut sum = offensive + communication + mechanics + knowledge + utility;
        sum += match role {
            Role::Top | Role::Mid => offensive + mechanics + communication + 2 * knowledge,
            Role::Adc => offensive + 2 * mechanics + 2 * communication,
            Role::Jungle | Role::Support => communication + knowledge + 3 * utility,
        };
        sum / 10
    }
}

/// Discrete champion familiarity tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum MasteryTier {
    /// Lowest tier, also used for unfamiliar champions.
    #[default]
    Bronze,
    /// x1.05
    Silver,
    /// x1.10
    Gold,
    /// x1.15
    Platinum,
    /// x1.20
    Diamond,
    /// x1.25
    Master,
    /// x1.30
    Grandmaster,
}

impl MasteryTier {
    /// Skill multiplier applied to the champion's base skill.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Bronze => 1.00,
            Self::Silver => 1.05,
            Self::Gold => 1.10,
            Self::Platinum => 1.15,
            Self::Diamond => 1.20,
            Self::Master => 1.25,
            Self::Grandmaster => 1.30,
        }
    }
}

/// One entry of a player's champion pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChampionFamiliarity {
    /// Champion this entry refers to.
    pub champion_id: ChampionId,
    /// Familiarity tier.
    pub mastery: MasteryTier,
    /// Accumulated experience on the champion.
    pub total_exp: f64,
}

/// A generated player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier.
    pub id: PlayerId,
    /// In-game name.
    pub nick_name: String,
    /// Nationality label.
    pub nationality: String,
    /// Comfort multiplier per role.
    pub roles: RoleMultipliers,
    /// Attribute groups.
    pub attributes: PlayerAttributes,
    /// Familiar champions.
    pub champion_pool: Vec<ChampionFamiliarity>,
}

impl Player {
    /// Mastery tier for a champion, defaulting to the lowest tier.
    #[must_use]
    pub fn mastery(&self, champion_id: ChampionId) -> MasteryTier {
        self.champion_pool
            .iter()
            .find(|entry| entry.champion_id == champion_id)
            .map(|entry| entry.mastery)
            .unwrap_or_default()
    }

    /// The role this player is most comfortable in.
    #[must_use]
    pub fn best_role(&self) -> Role {
        self.roles.best_role()
    }
}

/// Per-match counters of a roster player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Kills scored.
    pub kills: u32,
    /// Times killed.
    pub deaths: u32,
    /// Kills assisted.
    pub assists: u32,
    /// Longest run of kills without dying in this match.
    pub max_kill_streak: u32,
}

impl PlayerStats {
    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A player bound to a role for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    /// The underlying player record.
    pub player: Player,
    /// Assigned role, unique within the team.
    pub role: Role,
    /// Champion assigned by the draft.
    pub champion: Option<Champion>,
    /// Match counters.
    pub stats: PlayerStats,
    /// Kills since the last death.
    pub consecutive_kills: u32,
    /// Bonus points accumulated from events.
    pub points: u32,
}

impl RosterPlayer {
    /// Bind a player to a role, without a champion.
    #[must_use]
    pub fn new(player: Player, role: Role) -> Self {
        Self {
            player,
            role,
            champion: None,
            stats: PlayerStats::default(),
            consecutive_kills: 0,
            points: 0,
        }
    }

    /// Bind a player to a role with a champion already chosen.
    #[must_use]
    pub fn with_champion(mut self, champion: Champion) -> Self {
        self.champion = Some(champion);
        self
    }

    /// Player identifier.
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.player.id
    }

    /// Player multiplier for the assigned role.
    #[must_use]
    pub fn role_multiplier(&self) -> f64 {
        self.player.roles.get(self.role)
    }

    /// Role-weighted attribute overall scaled by role comfort.
    #[must_use]
    pub fn skill(&self) -> f64 {
        f64::from(self.player.attributes.overall(self.role)) * self.role_multiplier()
    }

    /// Mastery multiplier this player has on `champion`.
    #[must_use]
    pub fn mastery_multiplier(&self, champion: &Champion) -> f64 {
        self.player.mastery(champion.id).multiplier()
    }

    /// Skill the player would bring on `champion`.
    #[must_use]
    pub fn projected_champion_skill(&self, champion: &Champion) -> f64 {
        f64::from(champion.skill) * self.mastery_multiplier(champion)
    }

    /// Champion contribution of the assigned champion, zero when unassigned.
    #[must_use]
    pub fn champion_skill(&self) -> f64 {
        self.champion
            .as_ref()
            .map_or(0.0, |champion| self.projected_champion_skill(champion))
    }

    /// Effective strength for this match.
    #[must_use]
    pub fn total_skill(&self) -> f64 {
        self.skill() + self.champion_skill() + f64::from(self.points)
    }

    /// Assign the drafted champion.
    pub fn assign_champion(&mut self, champion: Champion) {
        self.champion = Some(champion);
    }

    /// Drop the champion assignment.
    pub fn clear_champion(&mut self) {
        self.champion = None;
    }

    /// Record a kill and extend the streak.
    pub fn record_kill(&mut self, points: u32) {
        self.stats.kills += 1;
        self.consecutive_kills += 1;
        self.stats.max_kill_streak = self.stats.max_kill_streak.max(self.consecutive_kills);
        self.points += points;
    }

    /// Record a death and end the streak.
    pub fn record_death(&mut self) {
        self.stats.deaths += 1;
        self.consecutive_kills = 0;
    }

    /// Record an assist.
    pub fn record_assist(&mut self, points: u32) {
        self.stats.assists += 1;
        self.points += points;
    }

    /// Add bonus points from an objective or structure.
    pub fn add_points(&mut self, points: u32) {
        self.points += points;
    }

    /// 2 to 4 kills without dying.
    #[must_use]
    pub fn is_on_killing_spree(&self) -> bool {
        (2..=4).contains(&self.consecutive_kills)
    }

    /// 5 to 7 kills without dying.
    #[must_use]
    pub fn is_godlike(&self) -> bool {
        (5..8).contains(&self.consecutive_kills)
    }

    /// 8 or more kills without dying.
    #[must_use]
    pub fn is_legendary(&self) -> bool {
        self.consecutive_kills >= 8
    }

    /// Zero counters and points between matches. The champion stays.
    pub fn reset(&mut self) {
        self.stats.reset();
        self.consecutive_kills = 0;
        self.points = 0;
    }
}
