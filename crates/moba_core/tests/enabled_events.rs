//! Enabled-event fixtures over match time and structure exposure.

use std::time::Duration;

use moba_core::events::{enabled_events, EventKind};
use moba_core::team::{Lane, Teams};
use moba_test_utils::fixtures::teams;

use EventKind::{
    Fight, InhibitorAssault, JungleBaron, JungleDragon, JungleHerald, JungleVoidgrubs,
    NexusAssault, Nothing, TowerAssault,
};

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

fn enabled(teams: &Teams, time: Duration) -> Vec<EventKind> {
    enabled_events(time, &teams.blue, &teams.red)
}

#[test]
fn test_two_minutes() {
    assert_eq!(enabled(&teams(70, 70), minutes(2)), vec![Nothing, Fight]);
}

#[test]
fn test_five_minutes_adds_dragon() {
    assert_eq!(
        enabled(&teams(70, 70), minutes(5)),
        vec![Nothing, Fight, JungleDragon]
    );
}

#[test]
fn test_six_minutes_adds_voidgrubs() {
    assert_eq!(
        enabled(&teams(70, 70), minutes(6)),
        vec![Nothing, Fight, JungleVoidgrubs, JungleDragon]
    );
}

#[test]
fn test_ten_minutes_adds_tower_assault() {
    assert_eq!(
        enabled(&teams(70, 70), minutes(10)),
        vec![Nothing, Fight, JungleVoidgrubs, JungleDragon, TowerAssault]
    );
}

#[test]
fn test_fourteen_minutes_swaps_voidgrubs_for_herald() {
    assert_eq!(
        enabled(&teams(70, 70), minutes(14)),
        vec![Nothing, Fight, JungleHerald, JungleDragon, TowerAssault]
    );
}

#[test]
fn test_twenty_minutes_swaps_herald_for_baron() {
    assert_eq!(
        enabled(&teams(70, 70), minutes(20)),
        vec![Nothing, Fight, JungleBaron, JungleDragon, TowerAssault]
    );
}

#[test]
fn test_minute_is_floored() {
    let teams = teams(70, 70);
    let just_before = minutes(5) - Duration::from_secs(1);
    assert_eq!(enabled(&teams, just_before), vec![Nothing, Fight]);
}

#[test]
fn test_inhibitor_assault_follows_exposure_and_respawn() {
    let mut teams = teams(70, 70);
    let taken_at = minutes(3);
    let cooldown = Duration::from_secs(5);

    teams.red.towers.top = 0;
    assert!(enabled(&teams, taken_at).contains(&InhibitorAssault));

    teams
        .red
        .take_down_inhibitor(Lane::Top, taken_at, cooldown);
    for offset in 0..5 {
        let now = taken_at + Duration::from_secs(offset);
        teams.update_cooldowns(now);
        assert!(!teams.red.is_inhibitor_up(Lane::Top), "respawned early at +{offset}s");
        assert!(enabled(&teams, now).contains(&InhibitorAssault));
    }

    teams.update_cooldowns(taken_at + cooldown);
    assert!(teams.red.is_inhibitor_up(Lane::Top));
}

#[test]
fn test_nexus_assault_needs_base_towers_and_a_downed_inhibitor() {
    let mut teams = teams(70, 70);
    let now = minutes(25);

    teams.blue.towers.base = 0;
    assert!(!enabled(&teams, now).contains(&NexusAssault));

    teams.blue.towers.mid = 0;
    teams.blue.towers.bot = 0;
    teams
        .blue
        .take_down_inhibitor(Lane::Mid, now, Duration::from_secs(300));
    teams
        .blue
        .take_down_inhibitor(Lane::Bot, now, Duration::from_secs(400));
    assert!(enabled(&teams, now).contains(&NexusAssault));

    // One inhibitor back while another is still down keeps the nexus open.
    let mid_back = now + Duration::from_secs(300);
    teams.update_cooldowns(mid_back);
    assert!(teams.blue.is_inhibitor_up(Lane::Mid));
    assert!(enabled(&teams, mid_back).contains(&NexusAssault));

    // All inhibitors up again closes it, even with base towers down.
    let all_back = now + Duration::from_secs(400);
    teams.update_cooldowns(all_back);
    assert!(teams.blue.are_all_inhibitors_up());
    assert!(!enabled(&teams, all_back).contains(&NexusAssault));
}

#[test]
fn test_nothing_and_fight_always_lead() {
    let mut teams = teams(70, 70);
    teams.red.towers.top = 0;
    teams.red.towers.base = 0;
    teams
        .red
        .take_down_inhibitor(Lane::Top, minutes(1), Duration::from_secs(300));
    for minute in [0, 3, 8, 17, 45] {
        let set = enabled(&teams, minutes(minute));
        assert_eq!(&set[..2], &[Nothing, Fight]);
        assert_eq!(set.last(), Some(&NexusAssault));
    }
}
