//! Draft + match orchestration, end to end.

use std::time::Duration;

use moba_core::champion::Role;
use moba_core::config::SimConfig;
use moba_core::engine::EngineState;
use moba_core::error::GameError;
use moba_core::events::{EventKind, EventOutcome};
use moba_core::match_sim::Match;
use moba_core::team::Side;
use moba_test_utils::fixtures::{drafted_match, seeded_rng, standard_pool, undrafted_match};

#[test]
fn test_full_match_has_winner_and_history() {
    let mut sim = drafted_match(1);
    let report = sim.run(&mut seeded_rng(100)).unwrap();

    assert_eq!(sim.engine().state(), EngineState::Over);
    assert_eq!(sim.game().victorious_team, Some(report.winner));
    assert_eq!(sim.teams()[report.winner_side].team_id, report.winner);
    assert_eq!(sim.teams()[report.winner_side].nexus(), 1);
    assert_eq!(sim.teams()[report.winner_side.opponent()].nexus(), 0);

    assert_eq!(report.draft.len(), 20);
    let last = report.events.last().unwrap();
    assert_eq!(last.kind, EventKind::NexusAssault);
    assert_eq!(last.outcome, Some(EventOutcome::TakeNexus));
    assert_eq!(last.winner, Some(report.winner_side));
    assert_eq!(report.duration, last.end_time());
}

#[test]
fn test_kills_match_deaths() {
    let mut sim = drafted_match(2);
    let report = sim.run(&mut seeded_rng(7)).unwrap();
    assert_eq!(report.blue.kills, report.red.deaths);
    assert_eq!(report.red.kills, report.blue.deaths);

    let fights = report
        .events
        .iter()
        .filter(|event| event.outcome == Some(EventOutcome::Kill))
        .count() as u32;
    assert_eq!(report.blue.kills + report.red.kills, fights);
}

#[test]
fn test_missing_champion_fails_before_engine_starts() {
    let mut sim = undrafted_match(SimConfig::default());
    let result = sim.run(&mut seeded_rng(0));

    assert!(matches!(
        result,
        Err(GameError::NoChampionAssigned { role: Role::Top, .. })
    ));
    assert!(sim.engine().history().is_empty());
    assert_eq!(sim.engine().match_time(), Duration::ZERO);
    assert_eq!(sim.game().victorious_team, None);
}

#[test]
fn test_single_empty_slot_is_reported() {
    let mut sim = drafted_match(4);
    sim.teams_mut().red.player_mut(Role::Support).clear_champion();
    let red = sim.teams().red.team_id;

    assert!(matches!(
        sim.run(&mut seeded_rng(0)),
        Err(GameError::NoChampionAssigned { team, role: Role::Support }) if team == red
    ));
}

#[test]
fn test_same_seeds_same_report() {
    let play = |draft_seed, match_seed| {
        let mut sim = drafted_match(draft_seed);
        sim.run(&mut seeded_rng(match_seed)).unwrap()
    };
    let a = play(9, 99);
    let b = play(9, 99);
    assert_eq!(a, b);
}

#[test]
fn test_reset_allows_rematch() {
    let mut sim = drafted_match(5);
    let first = sim.run(&mut seeded_rng(50)).unwrap();

    sim.reset();
    assert_eq!(sim.engine().state(), EngineState::Running);
    assert!(sim.engine().history().is_empty());
    assert_eq!(sim.game().victorious_team, None);
    assert_eq!(sim.teams().blue.kills(), 0);

    let second = sim.run(&mut seeded_rng(50)).unwrap();
    assert_eq!(first.events, second.events);
}

#[test]
fn test_redraft_replaces_champions() {
    let mut sim = drafted_match(6);
    sim.draft(&standard_pool(), &mut seeded_rng(600)).unwrap();
    assert!(sim.check_champions().is_ok());
    for side in Side::BOTH {
        assert!(sim.unfilled_roles(side).is_empty());
    }
}

#[test]
fn test_many_seeds_terminate() {
    for seed in 0..25 {
        let mut sim = drafted_match(seed);
        let report = sim.run(&mut seeded_rng(seed * 31 + 1)).unwrap();
        assert!(report.duration > Duration::ZERO);
        assert!(report.events.len() < 10_000);
    }
}

#[test]
fn test_config_from_ron_drives_durations() {
    let config = SimConfig::from_ron_str(
        "SimConfig(durations: EventDurations(nothing: 10, fight: 10, jungle: 10, tower: 10, inhibitor: 10, nexus: 10))",
    )
    .unwrap();
    let mut sim = undrafted_match(config);
    sim.draft(&standard_pool(), &mut seeded_rng(3)).unwrap();
    let report = sim.run(&mut seeded_rng(3)).unwrap();

    for event in &report.events {
        assert_eq!(event.duration, Duration::from_secs(10));
    }
    assert_eq!(
        report.duration,
        Duration::from_secs(10 * report.events.len() as u64)
    );
}

#[test]
fn test_shortest_accepted_respawn_still_ends_matches() {
    let config = SimConfig::from_ron_str("SimConfig(inhibitor_respawn_secs: 121)").unwrap();
    for seed in 0..5 {
        let mut sim = undrafted_match(config.clone());
        sim.draft(&standard_pool(), &mut seeded_rng(seed)).unwrap();
        let report = sim.run(&mut seeded_rng(seed)).unwrap();

        let loser = report.winner_side.opponent();
        assert_eq!(sim.teams()[loser].nexus(), 0);
        assert_eq!(sim.teams()[loser].towers.base, 0);
    }
}

#[test]
fn test_short_respawn_config_is_rejected() {
    let result = SimConfig::from_ron_str("SimConfig(inhibitor_respawn_secs: 30)");
    assert!(matches!(result, Err(GameError::ConfigParse(_))));
}

#[test]
fn test_record_round_trip_after_match() {
    let mut sim = drafted_match(8);
    sim.run(&mut seeded_rng(8)).unwrap();
    let record = sim.game().to_record().unwrap();
    let restored = Match::from_record(&record).unwrap();
    assert_eq!(&restored, sim.game());
}
