//! Match metrics collection for balance analysis.
//!
//! Each played match is reduced to a [`GameMetrics`] record; a batch of
//! records is folded into a [`BatchSummary`].

use std::collections::BTreeMap;

use moba_core::events::EventOutcome;
use moba_core::match_sim::MatchReport;
use moba_core::team::{Side, TeamId};
use serde::{Deserialize, Serialize};

/// Metrics for a single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetrics {
    /// Position of the match in its batch.
    pub game_index: u32,
    /// Random seed used.
    pub seed: u64,
    /// Winning team.
    pub winner: TeamId,
    /// Side the winner played on.
    pub winner_side: Side,
    /// Match clock at the end, in seconds.
    pub duration_secs: u64,
    /// Events resolved.
    pub events: u32,
    /// Blue kills.
    pub blue_kills: u32,
    /// Red kills.
    pub red_kills: u32,
    /// Towers blue still had standing.
    pub blue_towers_left: u8,
    /// Towers red still had standing.
    pub red_towers_left: u8,
    /// Contested events that ended with a defence.
    pub defended: u32,
    /// Event count per event kind label.
    pub event_counts: BTreeMap<String, u32>,
    /// Final engine state hash (for determinism validation).
    pub final_state_hash: u64,
}

impl GameMetrics {
    /// Reduce a match report.
    #[must_use]
    pub fn from_report(game_index: u32, seed: u64, report: &MatchReport) -> Self {
        let mut event_counts: BTreeMap<String, u32> = BTreeMap::new();
        let mut defended = 0;
        for event in &report.events {
            *event_counts.entry(event.kind.label().to_string()).or_default() += 1;
            if matches!(
                event.outcome,
                Some(
                    EventOutcome::DefendTower
                        | EventOutcome::DefendInhibitor
                        | EventOutcome::DefendNexus
                )
            ) {
                defended += 1;
            }
        }

        Self {
            game_index,
            seed,
            winner: report.winner,
            winner_side: report.winner_side,
            duration_secs: report.duration.as_secs(),
            events: report.events.len() as u32,
            blue_kills: report.blue.kills,
            red_kills: report.red.kills,
            blue_towers_left: report.blue.towers_left,
            red_towers_left: report.red.towers_left,
            defended,
            event_counts,
            final_state_hash: 0,
        }
    }

    /// Kills by both sides.
    #[must_use]
    pub fn total_kills(&self) -> u32 {
        self.blue_kills + self.red_kills
    }
}

/// Summary statistics across a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Matches that finished.
    pub total_games: u32,
    /// Matches won by the blue side.
    pub blue_wins: u32,
    /// Matches won by the red side.
    pub red_wins: u32,
    /// Blue wins over finished matches.
    pub blue_win_rate: f64,
    /// Average match length in seconds.
    pub avg_duration_secs: f64,
    /// Shortest match.
    pub min_duration_secs: u64,
    /// Longest match.
    pub max_duration_secs: u64,
    /// Average events per match.
    pub avg_events: f64,
    /// Average kills per match.
    pub avg_kills: f64,
    /// Average appearances per match by event kind.
    pub avg_event_counts: BTreeMap<String, f64>,
    /// Matches that failed.
    pub errors: u32,
}

impl BatchSummary {
    /// Calculate a summary from finished matches and the failure count.
    #[must_use]
    pub fn from_games(games: &[GameMetrics], errors: usize) -> Self {
        let mut summary = Self {
            errors: errors as u32,
            ..Default::default()
        };
        if games.is_empty() {
            return summary;
        }

        let count = games.len() as f64;
        summary.total_games = games.len() as u32;

        let mut duration_sum = 0u64;
        let mut min_duration = u64::MAX;
        let mut max_duration = 0u64;
        let mut events_sum = 0u64;
        let mut kills_sum = 0u64;
        let mut kind_totals: BTreeMap<String, u64> = BTreeMap::new();

        for game in games {
            duration_sum += game.duration_secs;
            min_duration = min_duration.min(game.duration_secs);
            max_duration = max_duration.max(game.duration_secs);
            events_sum += u64::from(game.events);
            kills_sum += u64::from(game.total_kills());

            match game.winner_side {
                Side::Blue => summary.blue_wins += 1,
                Side::Red => summary.red_wins += 1,
            }

            for (kind, n) in &game.event_counts {
                *kind_totals.entry(kind.clone()).or_default() += u64::from(*n);
            }
        }

        summary.blue_win_rate = f64::from(summary.blue_wins) / count;
        summary.avg_duration_secs = duration_sum as f64 / count;
        summary.min_duration_secs = min_duration;
        summary.max_duration_secs = max_duration;
        summary.avg_events = events_sum as f64 / count;
        summary.avg_kills = kills_sum as f64 / count;
        summary.avg_event_counts = kind_totals
            .into_iter()
            .map(|(kind, total)| (kind, total as f64 / count))
            .collect();

        summary
    }

    /// Whether the blue win rate is within `threshold` of 50%.
    #[must_use]
    pub fn is_balanced(&self, threshold: f64) -> bool {
        self.total_games == 0 || (self.blue_win_rate - 0.5).abs() <= threshold
    }

    /// The side winning more than `0.5 + threshold` of matches, if any.
    #[must_use]
    pub fn dominant_side(&self, threshold: f64) -> Option<Side> {
        if self.total_games == 0 {
            return None;
        }
        if self.blue_win_rate > 0.5 + threshold {
            Some(Side::Blue)
        } else if 1.0 - self.blue_win_rate > 0.5 + threshold {
            Some(Side::Red)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(index: u32, side: Side, duration_secs: u64, events: u32) -> GameMetrics {
        GameMetrics {
            game_index: index,
            seed: u64::from(index),
            winner: TeamId(if side == Side::Blue { 1 } else { 2 }),
            winner_side: side,
            duration_secs,
            events,
            blue_kills: 3,
            red_kills: 1,
            blue_towers_left: 4,
            red_towers_left: 0,
            defended: 0,
            event_counts: BTreeMap::from([("Fight".to_string(), 4)]),
            final_state_hash: 0,
        }
    }

    #[test]
    fn test_batch_summary() {
        let games = vec![
            game(0, Side::Blue, 1800, 40),
            game(1, Side::Blue, 2400, 60),
            game(2, Side::Red, 3000, 80),
        ];
        let summary = BatchSummary::from_games(&games, 1);

        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.blue_wins, 2);
        assert_eq!(summary.red_wins, 1);
        assert_eq!(summary.errors, 1);
        assert!((summary.blue_win_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((summary.avg_duration_secs - 2400.0).abs() < 1e-9);
        assert_eq!(summary.min_duration_secs, 1800);
        assert_eq!(summary.max_duration_secs, 3000);
        assert!((summary.avg_events - 60.0).abs() < 1e-9);
        assert!((summary.avg_kills - 4.0).abs() < 1e-9);
        assert!((summary.avg_event_counts["Fight"] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary_keeps_errors() {
        let summary = BatchSummary::from_games(&[], 5);
        assert_eq!(summary.total_games, 0);
        assert_eq!(summary.errors, 5);
        assert!(summary.is_balanced(0.0));
        assert_eq!(summary.dominant_side(0.0), None);
    }

    #[test]
    fn test_balance_check() {
        let games = vec![
            game(0, Side::Blue, 1800, 40),
            game(1, Side::Blue, 1800, 40),
            game(2, Side::Blue, 1800, 40),
            game(3, Side::Red, 1800, 40),
        ];
        let summary = BatchSummary::from_games(&games, 0);
        assert!(!summary.is_balanced(0.2));
        assert!(summary.is_balanced(0.25));
        assert_eq!(summary.dominant_side(0.1), Some(Side::Blue));
        assert_eq!(summary.dominant_side(0.3), None);
    }
}
