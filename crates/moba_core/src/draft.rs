//! Picks & bans.
//!
//! The draft is a five-phase state machine driven by two counters. Each
//! ban or pick advances the cursor:
//!
//! - `BanBlue`: ban, then `PickRed` once ten bans are in, else `BanRed`.
//! - `BanRed`: ban, then `PickBlue` after the sixth ban of the first phase,
//!   else `BanBlue`.
//! - `PickBlue`: one pick on the opening turn, two afterwards, then `PickRed`.
//! - `PickRed`: one pick when entered at 5, 6 or 9 picks, two otherwise.
//!   Then `BanRed` at six picks and six bans, `Done` at ten picks, else
//!   `PickBlue`.
//!
//! Starting from `BanBlue` this yields six alternating bans, six picks
//! (B, RR, BB, R), four bans starting on red, and four picks (R, BB, R).
//!
//! Actions are taken either by the built-in selector ([`Draft::step`],
//! [`Draft::run`]) or by hand ([`Draft::ban_champion`],
//! [`Draft::pick_champion`]); both go through the same transitions.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::champion::{Champion, ChampionId, Role};
use crate::error::{GameError, Result};
use crate::random::{choose_uniform, weighted_index};
use crate::team::{Side, TeamBattleState, Teams};

/// Bans in a full draft, five per side.
pub const TOTAL_BANS: u32 = 10;

/// Picks in a full draft, five per side.
pub const TOTAL_PICKS: u32 = 10;

/// Bans in the first ban phase.
const FIRST_PHASE_BANS: u32 = 6;

/// Picks in the first pick phase.
const FIRST_PHASE_PICKS: u32 = 6;

/// Phase cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftPhase {
    /// Blue bans next.
    BanBlue,
    /// Red bans next.
    BanRed,
    /// Blue picks next.
    PickBlue,
    /// Red picks next.
    PickRed,
    /// All picks made.
    Done,
}

impl DraftPhase {
    /// Side expected to act, `None` once done.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::BanBlue | Self::PickBlue => Some(Side::Blue),
            Self::BanRed | Self::PickRed => Some(Side::Red),
            Self::Done => None,
        }
    }

    /// Whether the phase expects a ban.
    #[must_use]
    pub const fn is_ban(self) -> bool {
        matches!(self, Self::BanBlue | Self::BanRed)
    }

    /// Whether the phase expects a pick.
    #[must_use]
    pub const fn is_pick(self) -> bool {
        matches!(self, Self::PickBlue | Self::PickRed)
    }
}

impl fmt::Display for DraftPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BanBlue => "BAN_BLUE",
            Self::BanRed => "BAN_RED",
            Self::PickBlue => "PICK_BLUE",
            Self::PickRed => "PICK_RED",
            Self::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// Availability of a champion in the shared pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolStatus {
    /// Can still be banned or picked.
    Available,
    /// Removed by a ban of the given side.
    Banned(Side),
    /// Claimed by the given side.
    Picked(Side),
}

/// A champion in the shared pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// The champion.
    pub champion: Champion,
    /// Current availability.
    pub status: PoolStatus,
}

impl PoolEntry {
    /// Whether the entry can still be banned or picked.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == PoolStatus::Available
    }
}

/// Ban or pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftActionKind {
    /// Champion removed from the pool.
    Ban,
    /// Champion assigned to a role.
    Pick,
}

/// One entry of the draft log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftAction {
    /// Acting side.
    pub side: Side,
    /// Ban or pick.
    pub kind: DraftActionKind,
    /// Champion banned or picked.
    pub champion: ChampionId,
    /// Role filled, picks only.
    pub role: Option<Role>,
}

/// Bans and picks recorded for one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideDraft {
    /// Banned champions in order.
    pub bans: Vec<ChampionId>,
    /// Picked champions in order, with the role they fill.
    pub picks: Vec<(Role, ChampionId)>,
}

/// Draft state for one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pool: Vec<PoolEntry>,
    blue: SideDraft,
    red: SideDraft,
    phase: DraftPhase,
    bans_count: u32,
    picks_count: u32,
    /// Picks left in the current pick turn.
    turn_picks: u32,
    is_over: bool,
    log: Vec<DraftAction>,
}

impl Draft {
    /// Start a draft over a champion pool at `BanBlue`.
    #[must_use]
    pub fn new(pool: &[Champion]) -> Self {
        Self {
            pool: pool
                .iter()
                .cloned()
                .map(|champion| PoolEntry {
                    champion,
                    status: PoolStatus::Available,
                })
                .collect(),
            blue: SideDraft::default(),
            red: SideDraft::default(),
            phase: DraftPhase::BanBlue,
            bans_count: 0,
            picks_count: 0,
            turn_picks: 0,
            is_over: false,
            log: Vec::new(),
        }
    }

    // === Queries ===

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> DraftPhase {
        self.phase
    }

    /// Bans made so far.
    #[must_use]
    pub const fn bans_count(&self) -> u32 {
        self.bans_count
    }

    /// Picks made so far.
    #[must_use]
    pub const fn picks_count(&self) -> u32 {
        self.picks_count
    }

    /// Whether all ten picks are made.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.is_over
    }

    /// Shared pool with availability tags.
    #[must_use]
    pub fn pool(&self) -> &[PoolEntry] {
        &self.pool
    }

    /// Champions still available.
    pub fn available(&self) -> impl Iterator<Item = &Champion> + '_ {
        self.pool
            .iter()
            .filter(|entry| entry.is_available())
            .map(|entry| &entry.champion)
    }

    /// Bans and picks of one side.
    #[must_use]
    pub const fn side(&self, side: Side) -> &SideDraft {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    /// Every action in order.
    #[must_use]
    pub fn log(&self) -> &[DraftAction] {
        &self.log
    }

    // === Driving ===

    /// Perform one phase turn with the built-in selector.
    ///
    /// A pick turn makes all of its picks (one or two) before returning.
    pub fn step<R: Rng + ?Sized>(&mut self, teams: &mut Teams, rng: &mut R) -> Result<()> {
        match self.phase {
            DraftPhase::Done => Err(GameError::DraftOver),
            DraftPhase::BanBlue | DraftPhase::BanRed => {
                let side = self.acting_side()?;
                let id = self.select_ban(side, &teams[side.opponent()], rng)?;
                self.ban_champion(side, id)
            }
            phase @ (DraftPhase::PickBlue | DraftPhase::PickRed) => {
                let side = self.acting_side()?;
                while self.phase == phase {
                    let (role, id) = self.select_pick(side, &teams[side], rng)?;
                    self.pick_champion(teams, side, role, id)?;
                }
                Ok(())
            }
        }
    }

    /// Run the built-in selector until the draft is over.
    pub fn run<R: Rng + ?Sized>(&mut self, teams: &mut Teams, rng: &mut R) -> Result<()> {
        while !self.is_over {
            self.step(teams, rng)?;
        }
        info!(
            blue_team = %teams.blue.team_id,
            red_team = %teams.red.team_id,
            bans = self.bans_count,
            picks = self.picks_count,
            "Draft complete"
        );
        Ok(())
    }

    /// Ban a champion for `side`. The phase must expect a ban from `side`.
    pub fn ban_champion(&mut self, side: Side, id: ChampionId) -> Result<()> {
        self.expect_turn(side, DraftActionKind::Ban)?;
        let entry = self.available_entry(id)?;
        entry.status = PoolStatus::Banned(side);

        self.side_mut(side).bans.push(id);
        self.log.push(DraftAction {
            side,
            kind: DraftActionKind::Ban,
            champion: id,
            role: None,
        });
        self.bans_count += 1;
        debug!(%side, champion = %id, bans = self.bans_count, "Champion banned");

        let next = match side {
            Side::Blue if self.bans_count == TOTAL_BANS => DraftPhase::PickRed,
            Side::Blue => DraftPhase::BanRed,
            Side::Red if self.bans_count == FIRST_PHASE_BANS && self.picks_count == 0 => {
                DraftPhase::PickBlue
            }
            Side::Red => DraftPhase::BanBlue,
        };
        self.enter(next);
        Ok(())
    }

    /// Pick a champion for `role` of `side` and assign it to that player.
    ///
    /// The phase must expect a pick from `side` and the role must be unfilled.
    pub fn pick_champion(
        &mut self,
        teams: &mut Teams,
        side: Side,
        role: Role,
        id: ChampionId,
    ) -> Result<()> {
        self.expect_turn(side, DraftActionKind::Pick)?;
        if teams[side].player(role).champion.is_some() {
            return Err(GameError::RoleAlreadyFilled { side, role });
        }
        let entry = self.available_entry(id)?;
        entry.status = PoolStatus::Picked(side);
        let champion = entry.champion.clone();

        debug!(
            %side,
            %role,
            champion = %champion.name,
            player = %teams[side].player(role).player.nick_name,
            "Champion picked"
        );
        teams[side].player_mut(role).assign_champion(champion);
        self.side_mut(side).picks.push((role, id));
        self.log.push(DraftAction {
            side,
            kind: DraftActionKind::Pick,
            champion: id,
            role: Some(role),
        });
        self.picks_count += 1;
        self.turn_picks = self.turn_picks.saturating_sub(1);
        if self.turn_picks > 0 {
            return Ok(());
        }

        match side {
            Side::Blue => self.enter(DraftPhase::PickRed),
            Side::Red => {
                if self.picks_count == FIRST_PHASE_PICKS && self.bans_count == FIRST_PHASE_BANS {
                    self.enter(DraftPhase::BanRed);
                } else if self.picks_count == TOTAL_PICKS {
                    self.is_over = true;
                    self.enter(DraftPhase::Done);
                } else {
                    self.enter(DraftPhase::PickBlue);
                }
            }
        }
        Ok(())
    }

    // === Built-in selector ===

    /// Choose a champion for `side` to ban.
    ///
    /// Each available champion is weighted by the best skill an opposing
    /// player would reach on it in their own role, or by its base skill
    /// when it fits no opponent.
    pub fn select_ban<R: Rng + ?Sized>(
        &self,
        side: Side,
        opponent: &TeamBattleState,
        rng: &mut R,
    ) -> Result<ChampionId> {
        let candidates: Vec<&Champion> = self.available().collect();
        if candidates.is_empty() {
            return Err(GameError::NoBanCandidates(side));
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|champion| {
                opponent
                    .players()
                    .iter()
                    .filter(|player| champion.roles.is_full(player.role))
                    .map(|player| player.projected_champion_skill(champion))
                    .reduce(f64::max)
                    .unwrap_or_else(|| f64::from(champion.skill))
            })
            .collect();
        let index = weighted_index(rng, &weights)?;
        Ok(candidates[index].id)
    }

    /// Choose a role and champion for `side` to pick.
    ///
    /// The role is drawn uniformly from the unfilled ones (no draw when one
    /// is left). Candidates are available champions with full affinity for
    /// that role, weighted by the player's projected skill on them.
    pub fn select_pick<R: Rng + ?Sized>(
        &self,
        side: Side,
        team: &TeamBattleState,
        rng: &mut R,
    ) -> Result<(Role, ChampionId)> {
        let roles: Vec<Role> = team.unfilled_roles().collect();
        let role = match roles.as_slice() {
            [only] => *only,
            _ => *choose_uniform(rng, &roles).ok_or_else(|| {
                GameError::InvalidRoster(format!("{side} side has no unfilled role left"))
            })?,
        };

        let candidates: Vec<&Champion> = self
            .available()
            .filter(|champion| champion.roles.is_full(role))
            .collect();
        if candidates.is_empty() {
            return Err(GameError::NoPickCandidates { side, role });
        }

        let player = team.player(role);
        let weights: Vec<f64> = candidates
            .iter()
            .map(|champion| player.projected_champion_skill(champion))
            .collect();
        let index = weighted_index(rng, &weights)?;
        Ok((role, candidates[index].id))
    }

    // === Internals ===

    fn acting_side(&self) -> Result<Side> {
        self.phase.side().ok_or(GameError::DraftOver)
    }

    fn expect_turn(&self, side: Side, kind: DraftActionKind) -> Result<()> {
        let acting = self.acting_side()?;
        let expected_kind = match kind {
            DraftActionKind::Ban => self.phase.is_ban(),
            DraftActionKind::Pick => self.phase.is_pick(),
        };
        if acting != side || !expected_kind {
            let action = match kind {
                DraftActionKind::Ban => "ban",
                DraftActionKind::Pick => "pick",
            };
            return Err(GameError::OutOfTurn { side, action });
        }
        Ok(())
    }

    fn available_entry(&mut self, id: ChampionId) -> Result<&mut PoolEntry> {
        let entry = self
            .pool
            .iter_mut()
            .find(|entry| entry.champion.id == id)
            .ok_or(GameError::UnknownChampion(id))?;
        if !entry.is_available() {
            return Err(GameError::ChampionUnavailable(id));
        }
        Ok(entry)
    }

    fn side_mut(&mut self, side: Side) -> &mut SideDraft {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    /// Move the cursor, sizing the pick turn when entering a pick phase.
    fn enter(&mut self, phase: DraftPhase) {
        self.turn_picks = match phase {
            DraftPhase::PickBlue if self.picks_count == 0 => 1,
            DraftPhase::PickRed if matches!(self.picks_count, 5 | 6 | 9) => 1,
            DraftPhase::PickBlue | DraftPhase::PickRed => 2,
            _ => 0,
        };
        self.phase = phase;
    }
}
