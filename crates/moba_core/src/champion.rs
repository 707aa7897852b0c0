//! Champion definitions and competitive roles.
//!
//! Champions are generated outside the core and are immutable once built.
//! The draft and the skill model only read them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Unique identifier for champions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChampionId(pub u32);

impl ChampionId {
    /// Create a new champion ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChampionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The five competitive positions, one per roster slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Top lane.
    Top,
    /// Jungle.
    Jungle,
    /// Mid lane.
    Mid,
    /// Bottom lane carry.
    Adc,
    /// Support.
    Support,
}

impl Role {
    /// All roles in roster order.
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    /// Position of this role inside a five-slot roster.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Jungle => 1,
            Self::Mid => 2,
            Self::Adc => 3,
            Self::Support => 4,
        }
    }

    /// Get the short name for this role.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Jungle => "JNG",
            Self::Mid => "MID",
            Self::Adc => "ADC",
            Self::Support => "SUP",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// One affinity multiplier per role, each within `0.0..=1.0`.
///
/// Used both for champions (how well the champion fits a role) and for
/// players (how comfortable the player is in a role).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleMultipliers {
    /// Top lane multiplier.
    pub top: f64,
    /// Jungle multiplier.
    pub jungle: f64,
    /// Mid lane multiplier.
    pub mid: f64,
    /// Bottom lane carry multiplier.
    pub adc: f64,
    /// Support multiplier.
    pub support: f64,
}

impl RoleMultipliers {
    /// Build a validated set of multipliers.
    pub fn new(top: f64, jungle: f64, mid: f64, adc: f64, support: f64) -> Result<Self> {
        let multipliers = Self {
            top,
            jungle,
            mid,
            adc,
            support,
        };
        multipliers.validate()?;
        Ok(multipliers)
    }

    /// Full affinity for the given roles, zero for every other role.
    #[must_use]
    pub fn full_for(roles: &[Role]) -> Self {
        let mut multipliers = Self {
            top: 0.0,
            jungle: 0.0,
            mid: 0.0,
            adc: 0.0,
            support: 0.0,
        };
        for &role in roles {
            multipliers.set(role, 1.0);
        }
        multipliers
    }

    /// Check that every multiplier lies within `0.0..=1.0`.
    pub fn validate(&self) -> Result<()> {
        for role in Role::ALL {
            let value = self.get(role);
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidRoleMultiplier { role, value });
            }
        }
        Ok(())
    }

    /// Multiplier for a role.
    #[must_use]
    pub const fn get(&self, role: Role) -> f64 {
        match role {
            Role::Top => self.top,
            Role::Jungle => self.jungle,
            Role::Mid => self.mid,
            Role::Adc => self.adc,
            Role::Support => self.support,
        }
    }

    /// Overwrite the multiplier for a role.
    pub fn set(&mut self, role: Role, value: f64) {
        match role {
            Role::Top => self.top = value,
            Role::Jungle => self.jungle = value,
            Role::Mid => self.mid = value,
            Role::Adc => self.adc = value,
            Role::Support => self.support = value,
        }
    }

    /// The role with the highest multiplier. Ties resolve in roster order.
    #[must_use]
    pub fn best_role(&self) -> Role {
        let mut best = Role::Top;
        for role in Role::ALL {
            if self.get(role) > self.get(best) {
                best = role;
            }
        }
        best
    }

    /// Whether the multiplier for `role` is exactly 1.0.
    #[must_use]
    pub fn is_full(&self, role: Role) -> bool {
        (self.get(role) - 1.0).abs() < f64::EPSILON
    }

    /// Whether at least one role has full affinity.
    #[must_use]
    pub fn has_full_role(&self) -> bool {
        Role::ALL.iter().any(|&role| self.is_full(role))
    }
}

/// How hard a champion is to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChampionDifficulty {
    /// Forgiving kit.
    Easy,
    /// Average kit.
    #[default]
    Medium,
    /// Demanding kit.
    Hard,
}

/// Broad class tag for a champion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChampionType {
    /// Frontline that soaks damage.
    Tank,
    /// Sustained melee damage.
    Fighter,
    /// Burst damage against single targets.
    Assassin,
    /// Ability damage.
    Mage,
    /// Ranged auto-attack damage.
    Marksman,
    /// Utility and protection.
    Support,
}

/// An immutable champion record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    /// Unique identifier.
    pub id: ChampionId,
    /// Display name.
    pub name: String,
    /// Base skill rating.
    pub skill: u32,
    /// Per-role affinity; at least one role is 1.0.
    pub roles: RoleMultipliers,
    /// Difficulty tier.
    pub difficulty: ChampionDifficulty,
    /// Primary class tag.
    pub primary_type: ChampionType,
    /// Optional secondary class tag, never equal to the primary one.
    pub secondary_type: Option<ChampionType>,
}

impl Champion {
    /// Build a validated champion.
    pub fn new(
        id: ChampionId,
        name: impl Into<String>,
        skill: u32,
        roles: RoleMultipliers,
        difficulty: ChampionDifficulty,
        primary_type: ChampionType,
        secondary_type: Option<ChampionType>,
    ) -> Result<Self> {
        let champion = Self {
            id,
            name: name.into(),
            skill,
            roles,
            difficulty,
            primary_type,
            secondary_type,
        };
        champion.validate()?;
        Ok(champion)
    }

    /// Check multipliers, full-affinity role and type tags.
    pub fn validate(&self) -> Result<()> {
        self.roles.validate()?;
        if !self.roles.has_full_role() {
            return Err(GameError::NoFullRoleAffinity(self.name.clone()));
        }
        if self.secondary_type == Some(self.primary_type) {
            return Err(GameError::DuplicateChampionType(self.name.clone()));
        }
        Ok(())
    }

    /// Whether this champion is a natural pick for `role`.
    #[must_use]
    pub fn plays(&self, role: Role) -> bool {
        self.roles.is_full(role)
    }
}
