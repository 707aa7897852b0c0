//! Match records and the orchestrator that drafts and plays a match.
//!
//! [`MatchSimulation`] ties the pieces together: it owns the [`Match`]
//! record and an engine holding both teams, runs picks & bans over a
//! champion pool, checks that every slot has a champion, drives the engine
//! to the end and writes the winner back into the record.

use std::time::Duration;

use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::champion::{Champion, Role};
use crate::config::SimConfig;
use crate::draft::{Draft, DraftAction};
use crate::engine::Simulation;
use crate::error::{GameError, Result};
use crate::events::SimEvent;
use crate::team::{Side, TeamBattleState, TeamId, Teams};

/// Date format used by stored match records.
pub const MATCH_DATE_FORMAT: &str = "%Y-%m-%d, %H:%M";

/// Unique identifier for matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub u64);

/// A scheduled or played match between two teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Unique identifier.
    pub id: MatchId,
    /// Championship the match belongs to.
    pub championship_id: u64,
    /// Blue side team.
    pub team1: TeamId,
    /// Red side team.
    pub team2: TeamId,
    /// Scheduled date.
    pub date: NaiveDateTime,
    /// Winner once played.
    pub victorious_team: Option<TeamId>,
}

/// Flat, serializable form of a [`Match`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Match id.
    pub id: u64,
    /// Championship id.
    pub championship_id: u64,
    /// Blue side team id.
    pub team1_id: u64,
    /// Red side team id.
    pub team2_id: u64,
    /// Date in [`MATCH_DATE_FORMAT`].
    pub date: String,
    /// Winner id, if played.
    pub victorious_team_id: Option<u64>,
}

impl Match {
    /// A match that has not been played yet.
    #[must_use]
    pub fn new(
        id: MatchId,
        championship_id: u64,
        team1: TeamId,
        team2: TeamId,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            championship_id,
            team1,
            team2,
            date,
            victorious_team: None,
        }
    }

    /// Whether `team` is one of the two teams.
    #[must_use]
    pub fn involves(&self, team: TeamId) -> bool {
        self.team1 == team || self.team2 == team
    }

    /// Record the winner.
    pub fn set_winner(&mut self, team: TeamId) -> Result<()> {
        if !self.involves(team) {
            return Err(GameError::InvalidVictoriousTeam(team));
        }
        self.victorious_team = Some(team);
        Ok(())
    }

    /// Serializable record.
    pub fn to_record(&self) -> Result<MatchRecord> {
        if let Some(winner) = self.victorious_team {
            if !self.involves(winner) {
                return Err(GameError::InvalidVictoriousTeam(winner));
            }
        }
        Ok(MatchRecord {
            id: self.id.0,
            championship_id: self.championship_id,
            team1_id: self.team1.0,
            team2_id: self.team2.0,
            date: self.date.format(MATCH_DATE_FORMAT).to_string(),
            victorious_team_id: self.victorious_team.map(|team| team.0),
        })
    }

    /// Rebuild from a record, validating date and winner.
    pub fn from_record(record: &MatchRecord) -> Result<Self> {
        let date = NaiveDateTime::parse_from_str(&record.date, MATCH_DATE_FORMAT)
            .map_err(|_| GameError::InvalidDate(record.date.clone()))?;
        let mut game = Self::new(
            MatchId(record.id),
            record.championship_id,
            TeamId(record.team1_id),
            TeamId(record.team2_id),
            date,
        );
        if let Some(winner) = record.victorious_team_id {
            game.set_winner(TeamId(winner))?;
        }
        Ok(game)
    }
}

/// Kills, deaths and assists of one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    /// Team id.
    pub team_id: TeamId,
    /// Team kills.
    pub kills: u32,
    /// Team deaths.
    pub deaths: u32,
    /// Team assists.
    pub assists: u32,
    /// Towers still standing, lanes and base.
    pub towers_left: u8,
}

impl TeamScore {
    fn of(team: &TeamBattleState) -> Self {
        let towers = team.towers;
        Self {
            team_id: team.team_id,
            kills: team.kills(),
            deaths: team.deaths(),
            assists: team.assists(),
            towers_left: towers.top + towers.mid + towers.bot + towers.base,
        }
    }
}

/// Result of a simulated match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Match id.
    pub match_id: MatchId,
    /// Winning team.
    pub winner: TeamId,
    /// Winning side.
    pub winner_side: Side,
    /// Final match clock.
    pub duration: Duration,
    /// Blue side score.
    pub blue: TeamScore,
    /// Red side score.
    pub red: TeamScore,
    /// Draft log, empty if the champions were assigned by hand.
    pub draft: Vec<DraftAction>,
    /// Every resolved event in order.
    pub events: Vec<SimEvent>,
}

/// Drafts and plays one match.
#[derive(Debug, Clone)]
pub struct MatchSimulation {
    game: Match,
    engine: Simulation,
    draft_log: Vec<DraftAction>,
}

impl MatchSimulation {
    /// Bind a match to its two battle states.
    ///
    /// `blue` must be `team1` of the match and `red` must be `team2`.
    pub fn new(
        game: Match,
        blue: TeamBattleState,
        red: TeamBattleState,
        config: SimConfig,
    ) -> Result<Self> {
        if blue.team_id != game.team1 {
            return Err(GameError::InvalidRoster(format!(
                "blue team {} is not team1 {} of match",
                blue.team_id, game.team1
            )));
        }
        if red.team_id != game.team2 {
            return Err(GameError::InvalidRoster(format!(
                "red team {} is not team2 {} of match",
                red.team_id, game.team2
            )));
        }
        config.validate()?;

        Ok(Self {
            game,
            engine: Simulation::new(Teams::new(blue, red), config),
            draft_log: Vec::new(),
        })
    }

    /// Match record.
    #[must_use]
    pub const fn game(&self) -> &Match {
        &self.game
    }

    /// Engine, for inspection.
    #[must_use]
    pub const fn engine(&self) -> &Simulation {
        &self.engine
    }

    /// Both teams.
    #[must_use]
    pub const fn teams(&self) -> &Teams {
        self.engine.teams()
    }

    /// Both teams, mutably, for assigning champions by hand.
    pub fn teams_mut(&mut self) -> &mut Teams {
        self.engine.teams_mut()
    }

    /// Run picks & bans over `pool` with the built-in selector.
    ///
    /// Any earlier champion assignment is dropped first.
    pub fn draft<R: Rng + ?Sized>(&mut self, pool: &[Champion], rng: &mut R) -> Result<()> {
        let teams = self.engine.teams_mut();
        for side in Side::BOTH {
            for player in teams[side].players_mut() {
                player.clear_champion();
            }
        }

        let mut draft = Draft::new(pool);
        draft.run(teams, rng)?;
        self.draft_log = draft.log().to_vec();
        Ok(())
    }

    /// Fail on the first roster slot that has no champion.
    pub fn check_champions(&self) -> Result<()> {
        for side in Side::BOTH {
            let team = &self.teams()[side];
            if let Some(role) = team.unfilled_roles().next() {
                return Err(GameError::NoChampionAssigned {
                    team: team.team_id,
                    role,
                });
            }
        }
        Ok(())
    }

    /// Play the match to the end.
    ///
    /// Fails before the first tick if any slot lacks a champion. On success
    /// the winner is stored in the match record.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MatchReport> {
        self.check_champions()?;

        info!(
            match_id = self.game.id.0,
            blue = %self.teams().blue.name,
            red = %self.teams().red.name,
            "Match started"
        );
        let winner_side = self.engine.run(rng)?;
        let winner = self.teams()[winner_side].team_id;
        self.game.set_winner(winner)?;

        let teams = self.teams();
        info!(
            match_id = self.game.id.0,
            winner = %teams[winner_side].name,
            minutes = self.engine.match_time().as_secs() / 60,
            events = self.engine.history().len(),
            "Match finished"
        );

        Ok(MatchReport {
            match_id: self.game.id,
            winner,
            winner_side,
            duration: self.engine.match_time(),
            blue: TeamScore::of(&teams.blue),
            red: TeamScore::of(&teams.red),
            draft: self.draft_log.clone(),
            events: self.engine.history().to_vec(),
        })
    }

    /// Restore both teams and the engine. Champions stay assigned.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.game.victorious_team = None;
    }

    /// Roles of `side` that still need a champion.
    #[must_use]
    pub fn unfilled_roles(&self, side: Side) -> Vec<Role> {
        self.teams()[side].unfilled_roles().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap()
    }

    fn game() -> Match {
        Match::new(MatchId(7), 1, TeamId(1), TeamId(2), date())
    }

    #[test]
    fn test_record_formats_date() {
        let record = game().to_record().unwrap();
        assert_eq!(record.date, "2024-06-01, 18:30");
        assert_eq!(record.victorious_team_id, None);
    }

    #[test]
    fn test_record_round_trip_with_winner() {
        let mut game = game();
        game.set_winner(TeamId(2)).unwrap();
        let restored = Match::from_record(&game.to_record().unwrap()).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn test_foreign_winner_rejected() {
        let mut game = game();
        assert!(matches!(
            game.set_winner(TeamId(3)),
            Err(GameError::InvalidVictoriousTeam(TeamId(3)))
        ));

        game.victorious_team = Some(TeamId(3));
        assert!(matches!(
            game.to_record(),
            Err(GameError::InvalidVictoriousTeam(TeamId(3)))
        ));

        let mut record = self::game().to_record().unwrap();
        record.victorious_team_id = Some(9);
        assert!(matches!(
            Match::from_record(&record),
            Err(GameError::InvalidVictoriousTeam(TeamId(9)))
        ));
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut record = game().to_record().unwrap();
        record.date = "June first".to_string();
        assert!(matches!(
            Match::from_record(&record),
            Err(GameError::InvalidDate(_))
        ));
    }
}
