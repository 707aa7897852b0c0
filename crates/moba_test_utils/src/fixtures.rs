//! Test fixtures and helpers.
//!
//! Pre-built champions, players, teams and matches for consistent testing.
//! Everything here is deterministic; randomness only enters through
//! [`seeded_rng`].

use chrono::{NaiveDate, NaiveDateTime};
use moba_core::champion::{
    Champion, ChampionDifficulty, ChampionId, ChampionType, Role, RoleMultipliers,
};
use moba_core::config::SimConfig;
use moba_core::match_sim::{Match, MatchId, MatchSimulation};
use moba_core::player::{ChampionFamiliarity, MasteryTier, Player, PlayerAttributes, PlayerId};
use moba_core::team::{Team, TeamBattleState, TeamId, Teams};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Champions per role in [`standard_pool`].
pub const POOL_PER_ROLE: u32 = 10;

/// Seeded random source used by every test.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn primary_type(role: Role) -> ChampionType {
    match role {
        Role::Top => ChampionType::Fighter,
        Role::Jungle => ChampionType::Assassin,
        Role::Mid => ChampionType::Mage,
        Role::Adc => ChampionType::Marksman,
        Role::Support => ChampionType::Support,
    }
}

/// A champion with full affinity for `roles` and nothing else.
///
/// # Panics
///
/// Panics if `roles` is empty.
#[must_use]
pub fn champion(id: u32, skill: u32, roles: &[Role]) -> Champion {
    Champion::new(
        ChampionId(id),
        format!("Champion {id}"),
        skill,
        RoleMultipliers::full_for(roles),
        ChampionDifficulty::Medium,
        primary_type(roles[0]),
        None,
    )
    .expect("fixture champion must be valid")
}

/// `per_role` single-role champions for every role.
///
/// Ids are `role_index * 100 + n`, skills run from 60 upwards.
#[must_use]
pub fn champion_pool(per_role: u32) -> Vec<Champion> {
    Role::ALL
        .iter()
        .flat_map(|&role| {
            (0..per_role).map(move |n| champion(role.index() as u32 * 100 + n, 60 + n * 2, &[role]))
        })
        .collect()
}

/// The pool used by most tests: ten champions per role plus two flex picks.
#[must_use]
pub fn standard_pool() -> Vec<Champion> {
    let mut pool = champion_pool(POOL_PER_ROLE);
    pool.push(champion(900, 75, &[Role::Top, Role::Jungle]));
    pool.push(champion(901, 75, &[Role::Mid, Role::Support]));
    pool
}

/// A player fitting `role` with every attribute at `attribute`.
///
/// Familiar with the first three champions of its role in
/// [`champion_pool`] at rising mastery.
#[must_use]
pub fn player(id: u64, role: Role, attribute: u32) -> Player {
    let base = role.index() as u32 * 100;
    Player {
        id: PlayerId(id),
        nick_name: format!("Player{id}"),
        nationality: "Korea".to_string(),
        roles: RoleMultipliers::full_for(&[role]),
        attributes: PlayerAttributes::uniform(attribute),
        champion_pool: [MasteryTier::Gold, MasteryTier::Diamond, MasteryTier::Grandmaster]
            .into_iter()
            .enumerate()
            .map(|(n, mastery)| ChampionFamiliarity {
                champion_id: ChampionId(base + n as u32),
                mastery,
                total_exp: 100.0 * (n as f64 + 1.0),
            })
            .collect(),
    }
}

/// A team record with one player per role, in role order.
#[must_use]
pub fn team(id: u64, attribute: u32) -> Team {
    Team {
        id: TeamId(id),
        name: format!("Team {id}"),
        nationality: "Korea".to_string(),
        roster: Role::ALL
            .iter()
            .map(|&role| player(id * 10 + role.index() as u64, role, attribute))
            .collect(),
    }
}

/// Battle state for [`team`], without champions.
///
/// # Panics
///
/// Panics if the fixture roster is invalid, which would be a fixture bug.
#[must_use]
pub fn team_state(id: u64, attribute: u32) -> TeamBattleState {
    TeamBattleState::from_team(&team(id, attribute)).expect("fixture team must be valid")
}

/// Battle state for [`team`] with the first champion of each role assigned.
#[must_use]
pub fn team_state_with_champions(id: u64, attribute: u32) -> TeamBattleState {
    let mut state = team_state(id, attribute);
    for player in state.players_mut() {
        let role = player.role;
        player.assign_champion(champion(role.index() as u32 * 100, 70, &[role]));
    }
    state
}

/// Two undrafted teams: blue is team 1, red is team 2.
#[must_use]
pub fn teams(blue_attribute: u32, red_attribute: u32) -> Teams {
    Teams::new(team_state(1, blue_attribute), team_state(2, red_attribute))
}

/// Fixed kickoff date.
///
/// # Panics
///
/// Never; the date literal is valid.
#[must_use]
pub fn match_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 12)
        .and_then(|day| day.and_hms_opt(17, 0, 0))
        .expect("fixture date must be valid")
}

/// Unplayed match between teams 1 and 2.
#[must_use]
pub fn game(id: u64) -> Match {
    Match::new(MatchId(id), 1, TeamId(1), TeamId(2), match_date())
}

/// Match simulation with no champions assigned.
///
/// # Panics
///
/// Panics if the fixture teams do not match the fixture match.
#[must_use]
pub fn undrafted_match(config: SimConfig) -> MatchSimulation {
    MatchSimulation::new(game(1), team_state(1, 72), team_state(2, 70), config)
        .expect("fixture match must be valid")
}

/// Match simulation drafted over [`standard_pool`] with `seed`.
///
/// # Panics
///
/// Panics if the draft fails, which the standard pool rules out.
#[must_use]
pub fn drafted_match(seed: u64) -> MatchSimulation {
    let mut sim = undrafted_match(SimConfig::default());
    sim.draft(&standard_pool(), &mut seeded_rng(seed))
        .expect("standard pool must support a full draft");
    sim
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pool_has_enough_per_role() {
        let pool = standard_pool();
        for role in Role::ALL {
            let count = pool.iter().filter(|c| c.roles.is_full(role)).count();
            assert!(count >= POOL_PER_ROLE as usize);
        }
    }

    #[test]
    fn test_team_fields_every_role() {
        let state = team_state(3, 70);
        for role in Role::ALL {
            assert_eq!(state.player(role).role, role);
        }
        assert_eq!(state.unfilled_roles().count(), 5);
    }

    #[test]
    fn test_drafted_match_is_ready() {
        let sim = drafted_match(1);
        assert!(sim.check_champions().is_ok());
    }
}
