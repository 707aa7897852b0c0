//! Event catalog, factory and resolution.
//!
//! The catalog is the single source of truth for what may happen in a match:
//! each [`EventKind`] has a point value, a priority weight used by the
//! engine's weighted draw, and an eligibility rule. Eligibility is either a
//! match-clock window in whole minutes or a structural exposure check.
//!
//! | Kind | Points | Priority | Eligible |
//! |---|---|---|---|
//! | Nothing | 0 | 20 | always |
//! | Fight | 0 | 5 | always |
//! | Voidgrubs | 15 | 15 | minutes 6..14 |
//! | Herald | 15 | 15 | minutes 14..20 |
//! | Baron | 15 | 20 | from minute 20 |
//! | Dragon | 15 | 20 | from minute 5 |
//! | Tower Assault | 15 | 15 | from minute 10 |
//! | Inhibitor Assault | 10 | 20 | either team's inhibitors exposed |
//! | Nexus Assault | 40 | 50 | either team's nexus exposed |
//!
//! Events are created by [`create_event`], resolved once against the two
//! teams with [`SimEvent::resolve`], and then only read.

use std::fmt;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::champion::Role;
use crate::config::SimConfig;
use crate::error::{GameError, Result};
use crate::random::{choose_uniform, choose_weighted, roll};
use crate::team::{Lane, Side, TeamBattleState, TeamId, Teams};

/// Every kind of event the engine can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Nothing notable happens.
    Nothing,
    /// A skirmish with one kill.
    Fight,
    /// Early jungle objective.
    JungleVoidgrubs,
    /// Mid-game jungle objective.
    JungleHerald,
    /// Late jungle objective.
    JungleBaron,
    /// Recurring jungle objective.
    JungleDragon,
    /// Push on a lane or base tower.
    TowerAssault,
    /// Push on an exposed inhibitor.
    InhibitorAssault,
    /// Push on an exposed nexus.
    NexusAssault,
}

impl EventKind {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nothing => "Nothing",
            Self::Fight => "Fight",
            Self::JungleVoidgrubs => "Voidgrubs",
            Self::JungleHerald => "Herald",
            Self::JungleBaron => "Baron",
            Self::JungleDragon => "Dragon",
            Self::TowerAssault => "Tower Assault",
            Self::InhibitorAssault => "Inhibitor Assault",
            Self::NexusAssault => "Nexus Assault",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How an event ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventOutcome {
    /// No effect on the match.
    Nothing,
    /// A player was killed.
    Kill,
    /// A jungle objective was secured.
    TakeObjective,
    /// A tower push was repelled.
    DefendTower,
    /// An inhibitor push was repelled.
    DefendInhibitor,
    /// A nexus push was repelled.
    DefendNexus,
    /// A tower fell.
    TakeTower,
    /// An inhibitor fell.
    TakeInhibitor,
    /// A nexus fell.
    TakeNexus,
}

/// When an event kind may be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eligibility {
    /// Every tick.
    Always,
    /// `start_minute <= minute < end_minute`; `end_minute == 0` is open-ended.
    Window {
        /// First eligible minute.
        start_minute: u64,
        /// First ineligible minute, or 0.
        end_minute: u64,
    },
    /// While either team's inhibitors are exposed.
    InhibitorsExposed,
    /// While either team's nexus is exposed.
    NexusExposed,
}

/// One row of the event catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpec {
    /// Event kind.
    pub kind: EventKind,
    /// Points awarded by the event.
    pub points: u32,
    /// Weight in the engine's draw.
    pub priority: u32,
    /// Reserved for per-kind throttling; not enforced.
    pub cooldown_secs: u64,
    /// Eligibility rule.
    pub eligibility: Eligibility,
}

const fn window(start_minute: u64, end_minute: u64) -> Eligibility {
    Eligibility::Window {
        start_minute,
        end_minute,
    }
}

/// The event catalog, in the order enabled events are reported.
pub const CATALOG: [EventSpec; 9] = [
    EventSpec {
        kind: EventKind::Nothing,
        points: 0,
        priority: 20,
        cooldown_secs: 0,
        eligibility: Eligibility::Always,
    },
    EventSpec {
        kind: EventKind::Fight,
        points: 0,
        priority: 5,
        cooldown_secs: 0,
        eligibility: Eligibility::Always,
    },
    EventSpec {
        kind: EventKind::JungleVoidgrubs,
        points: 15,
        priority: 15,
        cooldown_secs: 0,
        eligibility: window(6, 14),
    },
    EventSpec {
        kind: EventKind::JungleHerald,
        points: 15,
        priority: 15,
        cooldown_secs: 0,
        eligibility: window(14, 20),
    },
    EventSpec {
        kind: EventKind::JungleBaron,
        points: 15,
        priority: 20,
        cooldown_secs: 0,
        eligibility: window(20, 0),
    },
    EventSpec {
        kind: EventKind::JungleDragon,
        points: 15,
        priority: 20,
        cooldown_secs: 0,
        eligibility: window(5, 0),
    },
    EventSpec {
        kind: EventKind::TowerAssault,
        points: 15,
        priority: 15,
        cooldown_secs: 0,
        eligibility: window(10, 0),
    },
    EventSpec {
        kind: EventKind::InhibitorAssault,
        points: 10,
        priority: 20,
        cooldown_secs: 0,
        eligibility: Eligibility::InhibitorsExposed,
    },
    EventSpec {
        kind: EventKind::NexusAssault,
        points: 40,
        priority: 50,
        cooldown_secs: 0,
        eligibility: Eligibility::NexusExposed,
    },
];

/// Catalog row for a kind.
#[must_use]
pub fn catalog_entry(kind: EventKind) -> &'static EventSpec {
    let index = match kind {
        EventKind::Nothing => 0,
        EventKind::Fight => 1,
        EventKind::JungleVoidgrubs => 2,
        EventKind::JungleHerald => 3,
        EventKind::JungleBaron => 4,
        EventKind::JungleDragon => 5,
        EventKind::TowerAssault => 6,
        EventKind::InhibitorAssault => 7,
        EventKind::NexusAssault => 8,
    };
    &CATALOG[index]
}

/// Whole match-clock minutes elapsed.
#[must_use]
pub const fn match_minute(match_time: Duration) -> u64 {
    match_time.as_secs() / 60
}

impl EventSpec {
    /// Whether this kind may be drawn at `match_time` given both teams.
    #[must_use]
    pub fn is_enabled(&self, match_time: Duration, blue: &TeamBattleState, red: &TeamBattleState) -> bool {
        match self.eligibility {
            Eligibility::Always => true,
            Eligibility::Window {
                start_minute,
                end_minute,
            } => {
                let minute = match_minute(match_time);
                minute >= start_minute && (end_minute == 0 || minute < end_minute)
            }
            Eligibility::InhibitorsExposed => {
                blue.are_inhibitors_exposed() || red.are_inhibitors_exposed()
            }
            Eligibility::NexusExposed => blue.is_nexus_exposed() || red.is_nexus_exposed(),
        }
    }
}

/// Kinds eligible at `match_time`, in catalog order.
#[must_use]
pub fn enabled_events(match_time: Duration, blue: &TeamBattleState, red: &TeamBattleState) -> Vec<EventKind> {
    CATALOG
        .iter()
        .filter(|spec| spec.is_enabled(match_time, blue, red))
        .map(|spec| spec.kind)
        .collect()
}

/// The jungle objectives sharing one event implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JungleObjective {
    /// Voidgrubs.
    Voidgrubs,
    /// Rift Herald.
    Herald,
    /// Baron.
    Baron,
    /// Dragon.
    Dragon,
}

impl TryFrom<EventKind> for JungleObjective {
    type Error = GameError;

    fn try_from(kind: EventKind) -> Result<Self> {
        match kind {
            EventKind::JungleVoidgrubs => Ok(Self::Voidgrubs),
            EventKind::JungleHerald => Ok(Self::Herald),
            EventKind::JungleBaron => Ok(Self::Baron),
            EventKind::JungleDragon => Ok(Self::Dragon),
            other => Err(GameError::UnknownJungleObjective(other)),
        }
    }
}

/// Concrete behaviour of an event, chosen by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventAction {
    /// Nothing happens.
    Nothing,
    /// A skirmish.
    Fight,
    /// A contested jungle objective.
    Jungle(JungleObjective),
    /// A tower push.
    TowerAssault,
    /// An inhibitor push.
    InhibitorAssault,
    /// A nexus push.
    NexusAssault,
}

/// A structure targeted by an assault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureTarget {
    /// Outermost remaining tower of a lane.
    Tower(Lane),
    /// One of the two base towers.
    BaseTower,
    /// Inhibitor of a lane.
    Inhibitor(Lane),
    /// The nexus.
    Nexus,
}

/// What happened, for commentary and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDetail {
    /// Nothing to report.
    None,
    /// A kill. Roles refer to the winning side (killer, assists) and the
    /// losing side (victim).
    Kill {
        /// Killer's role.
        killer: Role,
        /// Victim's role.
        victim: Role,
        /// Roles that assisted.
        assists: Vec<Role>,
    },
    /// A jungle objective.
    Objective(JungleObjective),
    /// An assault on a structure of `defender`.
    Structure {
        /// Side owning the structure.
        defender: Side,
        /// Structure attacked.
        target: StructureTarget,
    },
}

/// A single event of the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Catalog kind.
    pub kind: EventKind,
    /// Behaviour.
    pub action: EventAction,
    /// Blue team the event is bound to.
    pub blue_team: TeamId,
    /// Red team the event is bound to.
    pub red_team: TeamId,
    /// Match time at which the event starts.
    pub time: Duration,
    /// Catalog point value.
    pub points: u32,
    /// Set once resolved.
    pub outcome: Option<EventOutcome>,
    /// Side credited with the outcome, if any.
    pub winner: Option<Side>,
    /// Match clock consumed by the event.
    pub duration: Duration,
    /// Participants and targets.
    pub detail: EventDetail,
}

/// Build the event for `kind`, bound to both teams.
pub fn create_event(kind: EventKind, teams: &Teams, match_time: Duration) -> Result<SimEvent> {
    let action = match kind {
        EventKind::Nothing => EventAction::Nothing,
        EventKind::Fight => EventAction::Fight,
        EventKind::JungleVoidgrubs
        | EventKind::JungleHerald
        | EventKind::JungleBaron
        | EventKind::JungleDragon => return jungle_event(kind, teams, match_time),
        EventKind::TowerAssault => EventAction::TowerAssault,
        EventKind::InhibitorAssault => EventAction::InhibitorAssault,
        EventKind::NexusAssault => EventAction::NexusAssault,
    };
    Ok(SimEvent::new(kind, action, teams, match_time))
}

/// Build a jungle event. Fails for kinds that are not jungle objectives.
pub fn jungle_event(kind: EventKind, teams: &Teams, match_time: Duration) -> Result<SimEvent> {
    let objective = JungleObjective::try_from(kind)?;
    Ok(SimEvent::new(kind, EventAction::Jungle(objective), teams, match_time))
}

impl SimEvent {
    fn new(kind: EventKind, action: EventAction, teams: &Teams, time: Duration) -> Self {
        Self {
            kind,
            action,
            blue_team: teams.blue.team_id,
            red_team: teams.red.team_id,
            time,
            points: catalog_entry(kind).points,
            outcome: None,
            winner: None,
            duration: Duration::ZERO,
            detail: EventDetail::None,
        }
    }

    /// Whether [`SimEvent::resolve`] has run.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// Match time once the event is over.
    #[must_use]
    pub fn end_time(&self) -> Duration {
        self.time + self.duration
    }

    /// Apply the event to both teams and record its outcome and duration.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        teams: &mut Teams,
        config: &SimConfig,
        rng: &mut R,
    ) -> Result<()> {
        match self.action {
            EventAction::Nothing => self.finish(EventOutcome::Nothing, None, EventDetail::None),
            EventAction::Fight => self.resolve_fight(teams, config, rng)?,
            EventAction::Jungle(objective) => self.resolve_jungle(objective, teams, config, rng),
            EventAction::TowerAssault => self.resolve_tower(teams, config, rng)?,
            EventAction::InhibitorAssault => self.resolve_inhibitor(teams, config, rng),
            EventAction::NexusAssault => self.resolve_nexus(teams, config, rng)?,
        }
        self.duration = config.durations.for_kind(self.kind);

        trace!(
            kind = %self.kind,
            time_secs = self.time.as_secs(),
            outcome = ?self.outcome,
            winner = ?self.winner,
            "Event resolved"
        );
        Ok(())
    }

    fn finish(&mut self, outcome: EventOutcome, winner: Option<Side>, detail: EventDetail) {
        self.outcome = Some(outcome);
        self.winner = winner;
        self.detail = detail;
    }

    fn resolve_fight<R: Rng + ?Sized>(
        &mut self,
        teams: &mut Teams,
        config: &SimConfig,
        rng: &mut R,
    ) -> Result<()> {
        let winner = draw_winner(teams, config, rng);
        let killer = *choose_weighted(rng, &Role::ALL, |&role| {
            teams[winner].player(role).total_skill()
        })?;
        let victim = Role::ALL[rng.gen_range(0..Role::ALL.len())];
        let assists: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|&role| role != killer && roll(rng, config.assist_chance))
            .collect();

        let (winners, losers) = teams.split_mut(winner);
        winners.player_mut(killer).record_kill(config.kill_points);
        for &role in &assists {
            winners.player_mut(role).record_assist(config.assist_points);
        }
        losers.player_mut(victim).record_death();

        self.finish(
            EventOutcome::Kill,
            Some(winner),
            EventDetail::Kill {
                killer,
                victim,
                assists,
            },
        );
        Ok(())
    }

    fn resolve_jungle<R: Rng + ?Sized>(
        &mut self,
        objective: JungleObjective,
        teams: &mut Teams,
        config: &SimConfig,
        rng: &mut R,
    ) {
        let winner = draw_winner(teams, config, rng);
        award(&mut teams[winner], self.points);
        self.finish(
            EventOutcome::TakeObjective,
            Some(winner),
            EventDetail::Objective(objective),
        );
    }

    fn resolve_tower<R: Rng + ?Sized>(
        &mut self,
        teams: &mut Teams,
        config: &SimConfig,
        rng: &mut R,
    ) -> Result<()> {
        let mut attacker = draw_winner(teams, config, rng);
        let mut targets = tower_targets(&teams[attacker.opponent()]);
        if targets.is_empty() {
            attacker = attacker.opponent();
            targets = tower_targets(&teams[attacker.opponent()]);
        }
        let Some(&target) = choose_uniform(rng, &targets) else {
            self.finish(EventOutcome::Nothing, None, EventDetail::None);
            return Ok(());
        };

        let defender = attacker.opponent();
        let detail = EventDetail::Structure { defender, target };
        if roll(rng, contest_chance(teams, attacker, config)) {
            let defending = &mut teams[defender];
            match target {
                StructureTarget::Tower(lane) => defending.destroy_tower(lane)?,
                _ => defending.destroy_base_tower()?,
            }
            award(&mut teams[attacker], self.points);
            self.finish(EventOutcome::TakeTower, Some(attacker), detail);
        } else {
            award(&mut teams[defender], self.points);
            self.finish(EventOutcome::DefendTower, Some(defender), detail);
        }
        Ok(())
    }

    fn resolve_inhibitor<R: Rng + ?Sized>(
        &mut self,
        teams: &mut Teams,
        config: &SimConfig,
        rng: &mut R,
    ) {
        let Some(defender) = pick_defender(teams, config, rng, |team| {
            !team.exposed_inhibitors().is_empty()
        }) else {
            self.finish(EventOutcome::Nothing, None, EventDetail::None);
            return;
        };
        let lanes = teams[defender].exposed_inhibitors();
        let Some(&lane) = choose_uniform(rng, &lanes) else {
            self.finish(EventOutcome::Nothing, None, EventDetail::None);
            return;
        };

        let attacker = defender.opponent();
        let detail = EventDetail::Structure {
            defender,
            target: StructureTarget::Inhibitor(lane),
        };
        if roll(rng, contest_chance(teams, attacker, config)) {
            teams[defender].take_down_inhibitor(lane, self.time, config.inhibitor_respawn());
            award(&mut teams[attacker], self.points);
            self.finish(EventOutcome::TakeInhibitor, Some(attacker), detail);
        } else {
            award(&mut teams[defender], self.points);
            self.finish(EventOutcome::DefendInhibitor, Some(defender), detail);
        }
    }

    fn resolve_nexus<R: Rng + ?Sized>(
        &mut self,
        teams: &mut Teams,
        config: &SimConfig,
        rng: &mut R,
    ) -> Result<()> {
        let Some(defender) = pick_defender(teams, config, rng, TeamBattleState::is_nexus_exposed)
        else {
            self.finish(EventOutcome::Nothing, None, EventDetail::None);
            return Ok(());
        };

        let attacker = defender.opponent();
        let detail = EventDetail::Structure {
            defender,
            target: StructureTarget::Nexus,
        };
        if roll(rng, contest_chance(teams, attacker, config)) {
            teams[defender].destroy_nexus()?;
            award(&mut teams[attacker], self.points);
            self.finish(EventOutcome::TakeNexus, Some(attacker), detail);
        } else {
            award(&mut teams[defender], self.points);
            self.finish(EventOutcome::DefendNexus, Some(defender), detail);
        }
        Ok(())
    }
}

/// Clamped chance for `side` to win a contested roll.
///
/// Reads the win probability last set by [`Teams::update_win_probabilities`].
#[must_use]
pub fn contest_chance(teams: &Teams, side: Side, config: &SimConfig) -> f64 {
    config.clamp_chance(teams[side].win_prob)
}

/// Draw which side comes out ahead of a contested event.
fn draw_winner<R: Rng + ?Sized>(teams: &Teams, config: &SimConfig, rng: &mut R) -> Side {
    if roll(rng, contest_chance(teams, Side::Blue, config)) {
        Side::Blue
    } else {
        Side::Red
    }
}

/// Choose which team defends. With both eligible, the loser of a draw defends.
fn pick_defender<R, F>(teams: &Teams, config: &SimConfig, rng: &mut R, eligible: F) -> Option<Side>
where
    R: Rng + ?Sized,
    F: Fn(&TeamBattleState) -> bool,
{
    match (eligible(&teams.blue), eligible(&teams.red)) {
        (true, true) => Some(draw_winner(teams, config, rng).opponent()),
        (true, false) => Some(Side::Blue),
        (false, true) => Some(Side::Red),
        (false, false) => None,
    }
}

/// Towers of `team` that can be attacked right now.
fn tower_targets(team: &TeamBattleState) -> Vec<StructureTarget> {
    let mut targets: Vec<StructureTarget> = Lane::ALL
        .into_iter()
        .filter(|&lane| team.towers.lane(lane) > 0)
        .map(StructureTarget::Tower)
        .collect();
    if team.towers.base > 0 && team.are_base_towers_exposed() {
        targets.push(StructureTarget::BaseTower);
    }
    targets
}

/// Split event points evenly across a team.
fn award(team: &mut TeamBattleState, points: u32) {
    let share = points / Role::ALL.len() as u32;
    for player in team.players_mut() {
        player.add_points(share);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::champion::RoleMultipliers;
    use crate::player::{Player, PlayerAttributes, PlayerId, RosterPlayer};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team(id: u64) -> TeamBattleState {
        let players = Role::ALL
            .iter()
            .enumerate()
            .map(|(i, &role)| {
                RosterPlayer::new(
                    Player {
                        id: PlayerId(id * 10 + i as u64),
                        nick_name: format!("p{i}"),
                        nationality: "Brazil".to_string(),
                        roles: RoleMultipliers::full_for(&Role::ALL),
                        attributes: PlayerAttributes::uniform(75),
                        champion_pool: Vec::new(),
                    },
                    role,
                )
            })
            .collect();
        TeamBattleState::new(TeamId(id), format!("team{id}"), players).unwrap()
    }

    fn teams() -> Teams {
        Teams::new(team(1), team(2))
    }

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    fn enabled_at(teams: &Teams, time: Duration) -> Vec<EventKind> {
        enabled_events(time, &teams.blue, &teams.red)
    }

    #[test]
    fn test_catalog_is_indexed_by_kind() {
        for entry in &CATALOG {
            assert_eq!(catalog_entry(entry.kind).kind, entry.kind);
        }
    }

    #[test]
    fn test_window_boundaries() {
        let teams = teams();
        assert!(!enabled_at(&teams, minutes(6) - Duration::from_secs(1))
            .contains(&EventKind::JungleVoidgrubs));
        assert!(enabled_at(&teams, minutes(13) + Duration::from_secs(59))
            .contains(&EventKind::JungleVoidgrubs));
        assert!(!enabled_at(&teams, minutes(14)).contains(&EventKind::JungleVoidgrubs));
        assert!(enabled_at(&teams, minutes(10)).contains(&EventKind::TowerAssault));
        assert!(!enabled_at(&teams, minutes(9)).contains(&EventKind::TowerAssault));
    }

    #[test]
    fn test_nothing_and_fight_always_enabled() {
        let teams = teams();
        for minute in [0, 1, 7, 15, 30, 90] {
            let enabled = enabled_at(&teams, minutes(minute));
            assert_eq!(&enabled[..2], &[EventKind::Nothing, EventKind::Fight]);
        }
    }

    #[test]
    fn test_inhibitor_assault_ignores_clock() {
        let mut teams = teams();
        teams.red.towers.bot = 0;
        let enabled = enabled_at(&teams, minutes(1));
        assert_eq!(
            enabled,
            vec![EventKind::Nothing, EventKind::Fight, EventKind::InhibitorAssault]
        );
    }

    #[test]
    fn test_factory_binds_catalog_points() {
        let teams = teams();
        for entry in &CATALOG {
            let event = create_event(entry.kind, &teams, minutes(3)).unwrap();
            assert_eq!(event.points, entry.points);
            assert_eq!(event.time, minutes(3));
            assert_eq!(event.blue_team, TeamId(1));
            assert_eq!(event.red_team, TeamId(2));
            assert!(!event.is_resolved());
        }
    }

    #[test]
    fn test_jungle_kinds_share_one_action() {
        let teams = teams();
        let event = create_event(EventKind::JungleBaron, &teams, minutes(25)).unwrap();
        assert_eq!(event.action, EventAction::Jungle(JungleObjective::Baron));
    }

    #[test]
    fn test_unknown_jungle_kind_is_fatal() {
        let teams = teams();
        let result = jungle_event(EventKind::TowerAssault, &teams, minutes(25));
        assert!(matches!(
            result,
            Err(GameError::UnknownJungleObjective(EventKind::TowerAssault))
        ));
    }

    #[test]
    fn test_every_kind_resolves() {
        let mut teams = teams();
        teams.red.towers.top = 0;
        teams.red.towers.base = 0;
        teams.red.take_down_inhibitor(Lane::Mid, minutes(20), minutes(5));
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for entry in &CATALOG {
            let mut event = create_event(entry.kind, &teams, minutes(25)).unwrap();
            event.resolve(&mut teams, &config, &mut rng).unwrap();
            assert!(event.is_resolved());
            assert!(event.duration > Duration::ZERO);
        }
    }

    #[test]
    fn test_fight_records_kill_and_death() {
        let mut teams = teams();
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut event = create_event(EventKind::Fight, &teams, minutes(3)).unwrap();
        event.resolve(&mut teams, &config, &mut rng).unwrap();

        let winner = event.winner.unwrap();
        assert_eq!(event.outcome, Some(EventOutcome::Kill));
        assert_eq!(teams[winner].kills(), 1);
        assert_eq!(teams[winner.opponent()].deaths(), 1);
        let EventDetail::Kill { killer, assists, .. } = &event.detail else {
            panic!("expected kill detail");
        };
        assert!(!assists.contains(killer));
        assert_eq!(teams[winner].assists() as usize, assists.len());
    }

    #[test]
    fn test_tower_assault_without_targets_resolves_to_nothing() {
        let mut teams = teams();
        for side in Side::BOTH {
            teams[side].towers.top = 0;
            teams[side].towers.mid = 0;
            teams[side].towers.bot = 0;
            teams[side].towers.base = 0;
        }
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut event = create_event(EventKind::TowerAssault, &teams, minutes(30)).unwrap();
        event.resolve(&mut teams, &config, &mut rng).unwrap();
        assert_eq!(event.outcome, Some(EventOutcome::Nothing));
    }

    #[test]
    fn test_tower_assault_switches_to_side_with_towers() {
        let mut teams = teams();
        teams.red.towers.top = 0;
        teams.red.towers.mid = 0;
        teams.red.towers.bot = 0;
        teams.red.towers.base = 0;
        let config = SimConfig::default();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut attempt = teams.clone();
            let mut event = create_event(EventKind::TowerAssault, &attempt, minutes(30)).unwrap();
            event.resolve(&mut attempt, &config, &mut rng).unwrap();
            let EventDetail::Structure { defender, .. } = event.detail else {
                panic!("expected structure detail");
            };
            assert_eq!(defender, Side::Blue);
        }
    }

    #[test]
    fn test_base_tower_only_targeted_behind_downed_inhibitor() {
        let mut team = team(1);
        team.towers.top = 0;
        team.towers.mid = 0;
        team.towers.bot = 0;
        assert!(tower_targets(&team).is_empty());

        team.take_down_inhibitor(Lane::Top, minutes(20), minutes(5));
        assert_eq!(tower_targets(&team), vec![StructureTarget::BaseTower]);
    }

    #[test]
    fn test_inhibitor_assault_takes_exposed_lane() {
        let mut teams = teams();
        teams.blue.towers.mid = 0;
        let config = SimConfig {
            min_win_chance: 0.49,
            ..SimConfig::default()
        };

        let mut taken = false;
        for seed in 0..30 {
            let mut attempt = teams.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut event =
                create_event(EventKind::InhibitorAssault, &attempt, minutes(20)).unwrap();
            event.resolve(&mut attempt, &config, &mut rng).unwrap();
            assert_eq!(
                event.detail,
                EventDetail::Structure {
                    defender: Side::Blue,
                    target: StructureTarget::Inhibitor(Lane::Mid),
                }
            );
            if event.outcome == Some(EventOutcome::TakeInhibitor) {
                assert!(!attempt.blue.is_inhibitor_up(Lane::Mid));
                assert_eq!(
                    attempt.blue.inhibitors.mid.respawn_at,
                    Some(minutes(20) + config.inhibitor_respawn())
                );
                taken = true;
            }
        }
        assert!(taken);
    }

    #[test]
    fn test_nexus_assault_can_end_match() {
        let mut teams = teams();
        teams.red.towers.top = 0;
        teams.red.towers.base = 0;
        teams.red.take_down_inhibitor(Lane::Top, minutes(30), minutes(5));
        let config = SimConfig::default();

        let mut fell = false;
        for seed in 0..30 {
            let mut attempt = teams.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut event = create_event(EventKind::NexusAssault, &attempt, minutes(31)).unwrap();
            event.resolve(&mut attempt, &config, &mut rng).unwrap();
            match event.outcome {
                Some(EventOutcome::TakeNexus) => {
                    assert_eq!(attempt.red.nexus(), 0);
                    assert_eq!(event.winner, Some(Side::Blue));
                    fell = true;
                }
                Some(EventOutcome::DefendNexus) => assert_eq!(attempt.red.nexus(), 1),
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert!(fell);
    }

    #[test]
    fn test_contest_chance_is_clamped() {
        let mut teams = teams();
        teams.blue.player_mut(Role::Mid).add_points(100_000);
        teams.update_win_probabilities();
        let config = SimConfig::default();
        assert!((contest_chance(&teams, Side::Red, &config) - config.min_win_chance).abs() < 1e-9);
        assert!(
            (contest_chance(&teams, Side::Blue, &config) - (1.0 - config.min_win_chance)).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_contest_chance_reads_stored_estimate() {
        let mut teams = teams();
        teams.blue.win_prob = 0.3;
        teams.red.win_prob = 0.7;
        let config = SimConfig::default();
        assert!((contest_chance(&teams, Side::Blue, &config) - 0.3).abs() < 1e-9);
        assert!((contest_chance(&teams, Side::Red, &config) - 0.7).abs() < 1e-9);
    }
}
