//! Team records and per-match team battle state.
//!
//! [`TeamBattleState`] tracks the structures a team still has standing and
//! the five roster players fielded for the match. Lanes and inhibitors are
//! tracked independently; the exposure queries compose them:
//!
//! - an inhibitor layer is exposed once any lane has lost all its towers;
//! - the nexus is exposed once the base towers are down and at least one
//!   inhibitor is down.
//!
//! Tower and nexus destruction is monotonic. Inhibitors come back once
//! their respawn deadline has passed (see [`TeamBattleState::update_cooldowns`]).

use std::fmt;
use std::ops::{Index, IndexMut};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::champion::Role;
use crate::error::{GameError, Result};
use crate::player::{Player, RosterPlayer};

/// Towers per lane at the start of a match.
pub const LANE_TOWERS: u8 = 3;

/// Base towers guarding the nexus at the start of a match.
pub const BASE_TOWERS: u8 = 2;

/// Unique identifier for teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team record as produced by the roster generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Nationality label.
    pub nationality: String,
    /// Full roster; the first five are fielded.
    pub roster: Vec<Player>,
}

/// Map side. Blue acts first in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// First team of the match.
    Blue,
    /// Second team of the match.
    Red,
}

impl Side {
    /// Both sides, blue first.
    pub const BOTH: [Side; 2] = [Side::Blue, Side::Red];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Blue => Self::Red,
            Self::Red => Self::Blue,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blue => f.write_str("blue"),
            Self::Red => f.write_str("red"),
        }
    }
}

/// A path from one base to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    /// Top lane.
    Top,
    /// Middle lane.
    Mid,
    /// Bottom lane.
    Bot,
}

impl Lane {
    /// All lanes, top to bottom.
    pub const ALL: [Lane; 3] = [Lane::Top, Lane::Mid, Lane::Bot];
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Mid => f.write_str("mid"),
            Self::Bot => f.write_str("bot"),
        }
    }
}

/// Remaining towers per lane plus the base pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Towers {
    /// Top lane towers (0-3).
    pub top: u8,
    /// Mid lane towers (0-3).
    pub mid: u8,
    /// Bot lane towers (0-3).
    pub bot: u8,
    /// Base towers in front of the nexus (0-2).
    pub base: u8,
}

impl Default for Towers {
    fn default() -> Self {
        Self {
            top: LANE_TOWERS,
            mid: LANE_TOWERS,
            bot: LANE_TOWERS,
            base: BASE_TOWERS,
        }
    }
}

impl Towers {
    /// Towers left in a lane.
    #[must_use]
    pub const fn lane(&self, lane: Lane) -> u8 {
        match lane {
            Lane::Top => self.top,
            Lane::Mid => self.mid,
            Lane::Bot => self.bot,
        }
    }

    fn lane_mut(&mut self, lane: Lane) -> &mut u8 {
        match lane {
            Lane::Top => &mut self.top,
            Lane::Mid => &mut self.mid,
            Lane::Bot => &mut self.bot,
        }
    }

    /// Every tower, lane and base, is down.
    #[must_use]
    pub const fn all_down(&self) -> bool {
        self.top == 0 && self.mid == 0 && self.bot == 0 && self.base == 0
    }

    /// Lanes with no towers left.
    pub fn open_lanes(&self) -> impl Iterator<Item = Lane> + '_ {
        Lane::ALL
            .into_iter()
            .filter(move |&lane| self.lane(lane) == 0)
    }

    /// Restore starting values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// State of one inhibitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inhibitor {
    /// Whether the inhibitor is standing.
    pub alive: bool,
    /// Match time at which a downed inhibitor comes back.
    pub respawn_at: Option<Duration>,
}

impl Default for Inhibitor {
    fn default() -> Self {
        Self {
            alive: true,
            respawn_at: None,
        }
    }
}

/// The three lane inhibitors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inhibitors {
    /// Top lane inhibitor.
    pub top: Inhibitor,
    /// Mid lane inhibitor.
    pub mid: Inhibitor,
    /// Bot lane inhibitor.
    pub bot: Inhibitor,
}

impl Inhibitors {
    /// Inhibitor of a lane.
    #[must_use]
    pub const fn lane(&self, lane: Lane) -> &Inhibitor {
        match lane {
            Lane::Top => &self.top,
            Lane::Mid => &self.mid,
            Lane::Bot => &self.bot,
        }
    }

    fn lane_mut(&mut self, lane: Lane) -> &mut Inhibitor {
        match lane {
            Lane::Top => &mut self.top,
            Lane::Mid => &mut self.mid,
            Lane::Bot => &mut self.bot,
        }
    }

    /// Every inhibitor is standing.
    #[must_use]
    pub fn all_up(&self) -> bool {
        Lane::ALL.iter().all(|&lane| self.lane(lane).alive)
    }

    /// Restore starting values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-match state of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBattleState {
    /// Team identity.
    pub team_id: TeamId,
    /// Display name.
    pub name: String,
    /// Lane and base towers.
    pub towers: Towers,
    /// Lane inhibitors.
    pub inhibitors: Inhibitors,
    /// 1 while the nexus stands, 0 once destroyed.
    nexus: u8,
    /// Fielded players, indexed by [`Role::index`].
    players: Vec<RosterPlayer>,
    /// Latest win probability estimate.
    pub win_prob: f64,
}

impl TeamBattleState {
    /// Build a battle state from exactly five players with distinct roles.
    pub fn new(team_id: TeamId, name: impl Into<String>, players: Vec<RosterPlayer>) -> Result<Self> {
        if players.len() != Role::ALL.len() {
            return Err(GameError::InvalidRoster(format!(
                "expected {} players, got {}",
                Role::ALL.len(),
                players.len()
            )));
        }

        let mut slots: Vec<Option<RosterPlayer>> = vec![None; Role::ALL.len()];
        for player in players {
            let slot = &mut slots[player.role.index()];
            if slot.is_some() {
                return Err(GameError::DuplicateRole(player.role));
            }
            *slot = Some(player);
        }

        Ok(Self {
            team_id,
            name: name.into(),
            towers: Towers::default(),
            inhibitors: Inhibitors::default(),
            nexus: 1,
            players: slots.into_iter().flatten().collect(),
            win_prob: 0.0,
        })
    }

    /// Field the first five roster players, one per role in roster order.
    pub fn from_team(team: &Team) -> Result<Self> {
        if team.roster.len() < Role::ALL.len() {
            return Err(GameError::InvalidRoster(format!(
                "team {} has only {} players",
                team.id,
                team.roster.len()
            )));
        }
        let players = team
            .roster
            .iter()
            .zip(Role::ALL)
            .map(|(player, role)| RosterPlayer::new(player.clone(), role))
            .collect();
        Self::new(team.id, team.name.clone(), players)
    }

    /// Player in a role.
    #[must_use]
    pub fn player(&self, role: Role) -> &RosterPlayer {
        &self.players[role.index()]
    }

    /// Mutable player in a role.
    pub fn player_mut(&mut self, role: Role) -> &mut RosterPlayer {
        &mut self.players[role.index()]
    }

    /// All players in role order.
    #[must_use]
    pub fn players(&self) -> &[RosterPlayer] {
        &self.players
    }

    /// All players in role order, mutably.
    pub fn players_mut(&mut self) -> &mut [RosterPlayer] {
        &mut self.players
    }

    /// Roles that still have no champion.
    pub fn unfilled_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.players
            .iter()
            .filter(|player| player.champion.is_none())
            .map(|player| player.role)
    }

    // === Structures ===

    /// Remove one tower from a lane.
    pub fn destroy_tower(&mut self, lane: Lane) -> Result<()> {
        let towers = self.towers.lane_mut(lane);
        if *towers == 0 {
            return Err(GameError::StructureAlreadyDestroyed(format!(
                "{lane} towers of team {}",
                self.team_id
            )));
        }
        *towers -= 1;
        Ok(())
    }

    /// Remove one base tower.
    pub fn destroy_base_tower(&mut self) -> Result<()> {
        if self.towers.base == 0 {
            return Err(GameError::StructureAlreadyDestroyed(format!(
                "base towers of team {}",
                self.team_id
            )));
        }
        self.towers.base -= 1;
        Ok(())
    }

    /// Destroy the nexus, ending the match.
    pub fn destroy_nexus(&mut self) -> Result<()> {
        if self.nexus == 0 {
            return Err(GameError::StructureAlreadyDestroyed(format!(
                "nexus of team {}",
                self.team_id
            )));
        }
        self.nexus = 0;
        Ok(())
    }

    /// Nexus value, always 0 or 1.
    #[must_use]
    pub const fn nexus(&self) -> u8 {
        self.nexus
    }

    /// Whether the nexus still stands.
    #[must_use]
    pub const fn is_nexus_alive(&self) -> bool {
        self.nexus == 1
    }

    /// Take down a lane inhibitor until `now + cooldown`, saturating at
    /// `Duration::MAX`.
    ///
    /// Returns `false` and changes nothing if the inhibitor is already down.
    pub fn take_down_inhibitor(&mut self, lane: Lane, now: Duration, cooldown: Duration) -> bool {
        let inhibitor = self.inhibitors.lane_mut(lane);
        if !inhibitor.alive {
            return false;
        }
        inhibitor.alive = false;
        inhibitor.respawn_at = Some(now.saturating_add(cooldown));
        true
    }

    /// Bring back every downed inhibitor whose deadline is `<= now`.
    pub fn update_cooldowns(&mut self, now: Duration) {
        for lane in Lane::ALL {
            let inhibitor = self.inhibitors.lane_mut(lane);
            if let Some(respawn_at) = inhibitor.respawn_at {
                if respawn_at <= now {
                    inhibitor.alive = true;
                    inhibitor.respawn_at = None;
                }
            }
        }
    }

    /// Whether a lane inhibitor is standing.
    #[must_use]
    pub fn is_inhibitor_up(&self, lane: Lane) -> bool {
        self.inhibitors.lane(lane).alive
    }

    /// Every inhibitor is standing.
    #[must_use]
    pub fn are_all_inhibitors_up(&self) -> bool {
        self.inhibitors.all_up()
    }

    /// Any lane has lost all of its towers.
    ///
    /// Independent of whether the inhibitor behind that lane is still up.
    #[must_use]
    pub fn are_inhibitors_exposed(&self) -> bool {
        self.towers.open_lanes().next().is_some()
    }

    /// Lanes whose towers are gone and whose inhibitor is still up.
    #[must_use]
    pub fn exposed_inhibitors(&self) -> Vec<Lane> {
        self.towers
            .open_lanes()
            .filter(|&lane| self.is_inhibitor_up(lane))
            .collect()
    }

    /// Base towers can be attacked once any inhibitor is down.
    #[must_use]
    pub fn are_base_towers_exposed(&self) -> bool {
        !self.are_all_inhibitors_up()
    }

    /// Base towers are down and not every inhibitor is up.
    #[must_use]
    pub fn is_nexus_exposed(&self) -> bool {
        self.towers.base == 0 && !self.are_all_inhibitors_up()
    }

    /// Every lane and base tower has fallen.
    #[must_use]
    pub fn are_all_towers_down(&self) -> bool {
        self.towers.all_down()
    }

    // === Aggregates ===

    /// Team kills.
    #[must_use]
    pub fn kills(&self) -> u32 {
        self.players.iter().map(|p| p.stats.kills).sum()
    }

    /// Team deaths.
    #[must_use]
    pub fn deaths(&self) -> u32 {
        self.players.iter().map(|p| p.stats.deaths).sum()
    }

    /// Team assists.
    #[must_use]
    pub fn assists(&self) -> u32 {
        self.players.iter().map(|p| p.stats.assists).sum()
    }

    /// Bonus points across the team.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.players.iter().map(|p| p.points).sum()
    }

    /// Sum of role skills.
    #[must_use]
    pub fn player_overall(&self) -> f64 {
        self.players.iter().map(RosterPlayer::skill).sum()
    }

    /// Sum of champion contributions.
    #[must_use]
    pub fn champion_overall(&self) -> f64 {
        self.players.iter().map(RosterPlayer::champion_skill).sum()
    }

    /// Overall team strength used for contested rolls.
    #[must_use]
    pub fn total_skill(&self) -> f64 {
        self.player_overall() + self.champion_overall() + f64::from(self.points())
    }

    /// Restore structures and player counters. Only valid between matches.
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.towers.reset();
        self.inhibitors.reset();
        self.nexus = 1;
        self.win_prob = 0.0;
    }
}

/// Both teams of a match, addressed by [`Side`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teams {
    /// Blue side team.
    pub blue: TeamBattleState,
    /// Red side team.
    pub red: TeamBattleState,
}

impl Teams {
    /// Pair two teams, with win probabilities split from their current skill.
    #[must_use]
    pub fn new(blue: TeamBattleState, red: TeamBattleState) -> Self {
        let mut teams = Self { blue, red };
        teams.update_win_probabilities();
        teams
    }

    /// Mutable access to a side and its opponent at once.
    pub fn split_mut(&mut self, side: Side) -> (&mut TeamBattleState, &mut TeamBattleState) {
        match side {
            Side::Blue => (&mut self.blue, &mut self.red),
            Side::Red => (&mut self.red, &mut self.blue),
        }
    }

    /// Side of the team with the given id.
    #[must_use]
    pub fn side_of(&self, team_id: TeamId) -> Option<Side> {
        Side::BOTH.into_iter().find(|&side| self[side].team_id == team_id)
    }

    /// Split win probability in proportion to total skill.
    pub fn update_win_probabilities(&mut self) {
        let blue = self.blue.total_skill();
        let red = self.red.total_skill();
        let total = blue + red;
        if total > 0.0 {
            self.blue.win_prob = blue / total;
            self.red.win_prob = red / total;
        } else {
            self.blue.win_prob = 0.5;
            self.red.win_prob = 0.5;
        }
    }

    /// Advance inhibitor respawns on both teams.
    pub fn update_cooldowns(&mut self, now: Duration) {
        self.blue.update_cooldowns(now);
        self.red.update_cooldowns(now);
    }

    /// Restore both teams.
    pub fn reset(&mut self) {
        self.blue.reset();
        self.red.reset();
        self.update_win_probabilities();
    }
}

impl Index<Side> for Teams {
    type Output = TeamBattleState;

    fn index(&self, side: Side) -> &Self::Output {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }
}

impl IndexMut<Side> for Teams {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }
}
