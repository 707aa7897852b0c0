//! Property tests for structures, cooldowns, drafts and termination.

use std::time::Duration;

use moba_core::config::SimConfig;
use moba_core::draft::Draft;
use moba_core::engine::Simulation;
use moba_core::team::{Lane, Side, Teams, BASE_TOWERS, LANE_TOWERS};
use moba_test_utils::determinism::strategies::{
    arb_attribute, arb_champion_pool, arb_clock_sequence, arb_lane, arb_seed, arb_sim_config,
};
use moba_test_utils::fixtures::{drafted_match, seeded_rng, team_state_with_champions, teams};
use proptest::prelude::*;

fn structure_snapshot(teams: &Teams) -> Vec<u8> {
    Side::BOTH
        .into_iter()
        .flat_map(|side| {
            let towers = teams[side].towers;
            [towers.top, towers.mid, towers.bot, towers.base, teams[side].nexus()]
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Towers and nexus never come back during a match.
    #[test]
    fn prop_structures_are_monotonic(seed in arb_seed(), blue in arb_attribute(), red in arb_attribute()) {
        let mut sim = Simulation::new(
            Teams::new(team_state_with_champions(1, blue), team_state_with_champions(2, red)),
            SimConfig::default(),
        );
        let mut rng = seeded_rng(seed);
        let mut previous = structure_snapshot(sim.teams());

        while !sim.is_over() && sim.history().len() < 2_000 {
            sim.tick(&mut rng).unwrap();
            let current = structure_snapshot(sim.teams());
            for (before, after) in previous.iter().zip(&current) {
                prop_assert!(after <= before);
            }
            previous = current;
        }

        for side in Side::BOTH {
            for lane in Lane::ALL {
                prop_assert!(sim.teams()[side].towers.lane(lane) <= LANE_TOWERS);
            }
            prop_assert!(sim.teams()[side].towers.base <= BASE_TOWERS);
        }
    }

    /// Applying the same cooldown update twice equals applying it once.
    #[test]
    fn prop_cooldown_update_is_idempotent(
        lane in arb_lane(),
        taken_at in 0u64..3600,
        cooldown in 1u64..600,
        clock in arb_clock_sequence(12),
    ) {
        let mut once = teams(70, 70);
        once.red.take_down_inhibitor(lane, Duration::from_secs(taken_at), Duration::from_secs(cooldown));
        let mut twice = once.clone();

        for now in clock {
            let now = Duration::from_secs(now);
            once.update_cooldowns(now);
            twice.update_cooldowns(now);
            twice.update_cooldowns(now);
            prop_assert_eq!(&once.red.inhibitors, &twice.red.inhibitors);

            let up = once.red.is_inhibitor_up(lane);
            let deadline = Duration::from_secs(taken_at + cooldown);
            if now < deadline && !up {
                prop_assert_eq!(once.red.inhibitors.lane(lane).respawn_at, Some(deadline));
            }
        }
    }

    /// A full draft always completes when each role keeps enough champions.
    #[test]
    fn prop_draft_always_completes(pool in arb_champion_pool(), seed in arb_seed()) {
        let mut draft = Draft::new(&pool);
        let mut teams = teams(70, 70);
        draft.run(&mut teams, &mut seeded_rng(seed)).unwrap();
        prop_assert!(draft.is_over());
        prop_assert_eq!(draft.bans_count(), 10);
        prop_assert_eq!(draft.picks_count(), 10);
        for side in Side::BOTH {
            prop_assert_eq!(teams[side].unfilled_roles().count(), 0);
        }
    }

    /// Every drafted match ends with exactly one nexus standing.
    #[test]
    fn prop_matches_terminate(draft_seed in 0u64..64, match_seed in arb_seed(), config in arb_sim_config()) {
        let sim = drafted_match(draft_seed);
        let mut engine = Simulation::new(sim.teams().clone(), config);
        let winner = engine.run(&mut seeded_rng(match_seed)).unwrap();
        prop_assert_eq!(engine.winner(), Some(winner));
        prop_assert_eq!(engine.teams()[winner].nexus(), 1);
        prop_assert_eq!(engine.teams()[winner.opponent()].nexus(), 0);
    }
}
