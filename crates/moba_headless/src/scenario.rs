//! Scenario loading and generation.
//!
//! A scenario holds everything one match needs before the draft: the
//! champion pool and the two team records. Scenarios are written in RON so
//! they can be edited by hand, or generated from a seed for quick runs.

use std::collections::HashSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use moba_core::champion::{
    Champion, ChampionDifficulty, ChampionId, ChampionType, Role, RoleMultipliers,
};
use moba_core::config::SimConfig;
use moba_core::error::GameError;
use moba_core::match_sim::{Match, MatchId, MatchSimulation};
use moba_core::player::{
    ChampionFamiliarity, CommunicationAttributes, KnowledgeAttributes, MasteryTier,
    MechanicsAttributes, OffensiveAttributes, Player, PlayerAttributes, PlayerId,
    UtilityAttributes,
};
use moba_core::team::{Team, TeamBattleState, TeamId};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Champions per role in a generated pool.
pub const GENERATED_CHAMPIONS_PER_ROLE: u32 = 12;

/// Familiar champions per generated player.
const FAMILIAR_CHAMPIONS: usize = 3;

const NAME_HEADS: [&str; 10] = [
    "Ash", "Bryn", "Cael", "Dra", "Eld", "Fen", "Gor", "Hal", "Ily", "Kor",
];
const NAME_TAILS: [&str; 8] = ["ar", "eth", "ion", "ra", "is", "ux", "ana", "orn"];
const NICK_NAMES: [&str; 10] = [
    "Faker", "Rookie", "Shadow", "Blitz", "Nova", "Vortex", "Echo", "Raven", "Pulse", "Zenith",
];

const TIERS: [MasteryTier; 7] = [
    MasteryTier::Bronze,
    MasteryTier::Silver,
    MasteryTier::Gold,
    MasteryTier::Platinum,
    MasteryTier::Diamond,
    MasteryTier::Master,
    MasteryTier::Grandmaster,
];

const TYPES: [ChampionType; 6] = [
    ChampionType::Tank,
    ChampionType::Fighter,
    ChampionType::Assassin,
    ChampionType::Mage,
    ChampionType::Marksman,
    ChampionType::Support,
];

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Scenario content is inconsistent.
    #[error("Invalid scenario: {0}")]
    Invalid(String),
    /// Core rejected the scenario data.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// A complete match setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Championship the match belongs to.
    #[serde(default)]
    pub championship_id: u64,
    /// Scheduled kickoff.
    #[serde(default = "default_kickoff")]
    pub kickoff: NaiveDateTime,
    /// Champions available to the draft.
    pub champions: Vec<Champion>,
    /// Team playing blue side.
    pub blue: Team,
    /// Team playing red side.
    pub red: Team,
}

fn default_kickoff() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|day| day.and_hms_opt(18, 0, 0))
        .unwrap_or_default()
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check champions, ids and rosters.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.champions.is_empty() {
            return Err(ScenarioError::Invalid("champion pool is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for champion in &self.champions {
            champion.validate()?;
            if !seen.insert(champion.id) {
                return Err(ScenarioError::Invalid(format!(
                    "champion id {} appears twice",
                    champion.id
                )));
            }
        }

        if self.blue.id == self.red.id {
            return Err(ScenarioError::Invalid(format!(
                "both sides are team {}",
                self.blue.id
            )));
        }
        TeamBattleState::from_team(&self.blue)?;
        TeamBattleState::from_team(&self.red)?;
        Ok(())
    }

    /// Bind the two teams to a fresh, undrafted match.
    pub fn to_match(&self, id: MatchId, config: SimConfig) -> Result<MatchSimulation, ScenarioError> {
        let game = Match::new(
            id,
            self.championship_id,
            self.blue.id,
            self.red.id,
            self.kickoff,
        );
        let simulation = MatchSimulation::new(
            game,
            TeamBattleState::from_team(&self.blue)?,
            TeamBattleState::from_team(&self.red)?,
            config,
        )?;
        Ok(simulation)
    }

    /// Serialize to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// A demo scenario built entirely from `seed`.
    ///
    /// Every role gets [`GENERATED_CHAMPIONS_PER_ROLE`] champions, so the
    /// draft can never run dry even if all ten bans hit one role.
    #[must_use]
    pub fn generated(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let champions = generate_champions(&mut rng);
        let blue = generate_team(&mut rng, TeamId(1), "Azure Wolves", &champions);
        let red = generate_team(&mut rng, TeamId(2), "Crimson Drakes", &champions);

        Self {
            name: format!("Generated #{seed}"),
            championship_id: 0,
            kickoff: default_kickoff(),
            champions,
            blue,
            red,
        }
    }
}

const fn role_type(role: Role) -> ChampionType {
    match role {
        Role::Top => ChampionType::Fighter,
        Role::Jungle => ChampionType::Assassin,
        Role::Mid => ChampionType::Mage,
        Role::Adc => ChampionType::Marksman,
        Role::Support => ChampionType::Support,
    }
}

fn generate_champions<R: Rng + ?Sized>(rng: &mut R) -> Vec<Champion> {
    let mut champions =
        Vec::with_capacity(Role::ALL.len() * GENERATED_CHAMPIONS_PER_ROLE as usize);

    for role in Role::ALL {
        for n in 0..GENERATED_CHAMPIONS_PER_ROLE {
            let mut roles = RoleMultipliers::full_for(&[role]);
            // Some champions flex into a second role at reduced affinity.
            if rng.gen_bool(0.2) {
                let others: Vec<Role> = Role::ALL.into_iter().filter(|&r| r != role).collect();
                if let Some(&other) = others.choose(rng) {
                    roles.set(other, rng.gen_range(0.4..0.9));
                }
            }

            let primary_type = role_type(role);
            let secondary_type = if rng.gen_bool(0.3) {
                TYPES
                    .iter()
                    .filter(|&&t| t != primary_type)
                    .copied()
                    .collect::<Vec<_>>()
                    .choose(rng)
                    .copied()
            } else {
                None
            };

            let difficulty = match rng.gen_range(0..3) {
                0 => ChampionDifficulty::Easy,
                1 => ChampionDifficulty::Medium,
                _ => ChampionDifficulty::Hard,
            };

            let name = format!(
                "{}{}",
                NAME_HEADS[rng.gen_range(0..NAME_HEADS.len())],
                NAME_TAILS[rng.gen_range(0..NAME_TAILS.len())]
            );

            champions.push(Champion {
                id: ChampionId(role.index() as u32 * 100 + n),
                name,
                skill: rng.gen_range(55..=90),
                roles,
                difficulty,
                primary_type,
                secondary_type,
            });
        }
    }
    champions
}

fn random_attributes<R: Rng + ?Sized>(rng: &mut R) -> PlayerAttributes {
    let mut stat = || rng.gen_range(45..=95);
    PlayerAttributes {
        offensive: OffensiveAttributes {
            lane_pressure: stat(),
            kill_instinct: stat(),
            aggressiveness: stat(),
        },
        communication: CommunicationAttributes {
            shot_calling: stat(),
            decisioning: stat(),
            team_work: stat(),
        },
        mechanics: MechanicsAttributes {
            reflexes: stat(),
            speed: stat(),
            farming: stat(),
            kiting: stat(),
            positioning: stat(),
            accuracy: stat(),
        },
        knowledge: KnowledgeAttributes {
            map_awareness: stat(),
            timing: stat(),
            itemization: stat(),
        },
        utility: UtilityAttributes {
            vision_control: stat(),
            map_control: stat(),
            objective_control: stat(),
        },
    }
}

fn generate_player<R: Rng + ?Sized>(
    rng: &mut R,
    id: PlayerId,
    role: Role,
    champions: &[Champion],
) -> Player {
    let mut roles = RoleMultipliers::full_for(&[role]);
    for other in Role::ALL.into_iter().filter(|&r| r != role) {
        roles.set(other, rng.gen_range(0.2..0.8));
    }

    let candidates: Vec<ChampionId> = champions
        .iter()
        .filter(|c| c.roles.is_full(role))
        .map(|c| c.id)
        .collect();
    let familiar: Vec<ChampionId> = candidates
        .choose_multiple(rng, FAMILIAR_CHAMPIONS)
        .copied()
        .collect();
    let champion_pool = familiar
        .into_iter()
        .map(|champion_id| ChampionFamiliarity {
            champion_id,
            mastery: TIERS[rng.gen_range(0..TIERS.len())],
            total_exp: rng.gen_range(50.0..2_000.0),
        })
        .collect();

    Player {
        id,
        nick_name: NICK_NAMES[rng.gen_range(0..NICK_NAMES.len())].to_string(),
        nationality: "Korea".to_string(),
        roles,
        attributes: random_attributes(rng),
        champion_pool,
    }
}

fn generate_team<R: Rng + ?Sized>(
    rng: &mut R,
    id: TeamId,
    name: &str,
    champions: &[Champion],
) -> Team {
    let roster = Role::ALL
        .into_iter()
        .map(|role| {
            let player_id = PlayerId(id.0 * 10 + role.index() as u64);
            generate_player(rng, player_id, role, champions)
        })
        .collect();

    Team {
        id,
        name: name.to_string(),
        nationality: "Korea".to_string(),
        roster,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moba_core::team::Side;
    use moba_test_utils::fixtures::{seeded_rng, standard_pool, team};

    fn fixture_scenario() -> Scenario {
        Scenario {
            name: "fixture".to_string(),
            championship_id: 3,
            kickoff: default_kickoff(),
            champions: standard_pool(),
            blue: team(1, 72),
            red: team(2, 70),
        }
    }

    #[test]
    fn test_generated_is_valid() {
        for seed in 0..10 {
            let scenario = Scenario::generated(seed);
            assert!(scenario.validate().is_ok(), "seed {seed}");
            assert_eq!(
                scenario.champions.len(),
                Role::ALL.len() * GENERATED_CHAMPIONS_PER_ROLE as usize
            );
            assert_eq!(scenario.blue.roster.len(), 5);
            assert_eq!(scenario.red.roster.len(), 5);
        }
    }

    #[test]
    fn test_generated_is_deterministic() {
        assert_eq!(Scenario::generated(42), Scenario::generated(42));
        assert_ne!(Scenario::generated(42), Scenario::generated(43));
    }

    #[test]
    fn test_generated_players_know_their_role() {
        let scenario = Scenario::generated(5);
        for (player, role) in scenario.blue.roster.iter().zip(Role::ALL) {
            assert!(player.roles.is_full(role));
            assert_eq!(player.champion_pool.len(), FAMILIAR_CHAMPIONS);
            for familiar in &player.champion_pool {
                let champion = scenario
                    .champions
                    .iter()
                    .find(|c| c.id == familiar.champion_id)
                    .unwrap();
                assert!(champion.roles.is_full(role));
            }
        }
    }

    #[test]
    fn test_ron_round_trip() {
        let scenario = Scenario::generated(7);
        let ron = scenario.to_ron_string().unwrap();
        let parsed = Scenario::from_ron_str(&ron).unwrap();
        assert_eq!(parsed, scenario);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Scenario::load("does/not/exist.ron");
        assert!(matches!(result, Err(ScenarioError::FileNotFound(_))));
    }

    #[test]
    fn test_duplicate_champion_rejected() {
        let mut scenario = fixture_scenario();
        let duplicate = scenario.champions[0].clone();
        scenario.champions.push(duplicate);
        assert!(matches!(scenario.validate(), Err(ScenarioError::Invalid(_))));
    }

    #[test]
    fn test_same_team_on_both_sides_rejected() {
        let mut scenario = fixture_scenario();
        scenario.red = scenario.blue.clone();
        assert!(matches!(scenario.validate(), Err(ScenarioError::Invalid(_))));
    }

    #[test]
    fn test_short_roster_rejected() {
        let mut scenario = fixture_scenario();
        scenario.red.roster.truncate(4);
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::Game(GameError::InvalidRoster(_)))
        ));
    }

    #[test]
    fn test_to_match_binds_sides() {
        let scenario = fixture_scenario();
        let mut simulation = scenario.to_match(MatchId(9), SimConfig::default()).unwrap();
        assert_eq!(simulation.game().team1, TeamId(1));
        assert_eq!(simulation.game().team2, TeamId(2));
        assert_eq!(simulation.game().championship_id, 3);
        assert_eq!(simulation.unfilled_roles(Side::Blue).len(), 5);

        simulation
            .draft(&scenario.champions, &mut seeded_rng(1))
            .unwrap();
        assert!(simulation.check_champions().is_ok());
    }
}
