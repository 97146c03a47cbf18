use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use super::{HolePoints, HoleStrokes, ScoringEngine, ScoringMode, TeamId};

/// Strokes recorded for one played hole, as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoleScores {
    pub played_hole_id: i64,
    pub position: i32,
    pub strokes: HoleStrokes,
}

/// A team's cumulative result. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub team_id: TeamId,
    pub total_strokes: u64,
    pub total_points: u64,
    pub position: u32,
    pub holes_scored: u32,
}

/// Per-hole view used by scoreboard grids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleBreakdown {
    pub played_hole_id: i64,
    pub position: i32,
    pub strokes: HoleStrokes,
    pub points: HolePoints,
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub scoring_mode: ScoringMode,
    pub entries: Vec<StandingEntry>,
    /// True while any played hole has fewer records than the session has teams.
    pub has_missing_scores: bool,
    pub holes: Vec<HoleBreakdown>,
}

#[derive(Debug, Default)]
struct Totals {
    strokes: u64,
    points: u64,
    holes: u32,
}

/// Sums per-hole points into a ranked table.
pub struct StandingsAggregator {
    engine: ScoringEngine,
}

impl StandingsAggregator {
    pub fn new(engine: ScoringEngine) -> Self {
        Self { engine }
    }

    #[instrument(skip(self, holes), fields(mode = %self.engine.mode(), holes = holes.len()))]
    pub fn aggregate(&self, team_count: usize, holes: &[HoleScores]) -> Standings {
        let mut ordered: Vec<&HoleScores> = holes.iter().collect();
        ordered.sort_by_key(|hole| (hole.position, hole.played_hole_id));

        let mut totals: BTreeMap<TeamId, Totals> = BTreeMap::new();
        let mut breakdown = Vec::with_capacity(ordered.len());

        for hole in ordered {
            let points = self.engine.score_hole(&hole.strokes);

            for (team_id, strokes) in hole.strokes.iter() {
                let team = totals.entry(team_id).or_default();
                let earned = points.get(team_id).unwrap_or_default();
                team.strokes = team.strokes.saturating_add(u64::from(strokes));
                team.points = team.points.saturating_add(u64::from(earned));
                team.holes += 1;
            }

            breakdown.push(HoleBreakdown {
                played_hole_id: hole.played_hole_id,
                position: hole.position,
                strokes: hole.strokes.clone(),
                points,
                is_complete: hole.strokes.len() >= team_count,
            });
        }

        let has_missing_scores = breakdown.iter().any(|hole| !hole.is_complete);

        let mut entries: Vec<StandingEntry> = totals
            .into_iter()
            .map(|(team_id, team)| StandingEntry {
                team_id,
                total_strokes: team.strokes,
                total_points: team.points,
                position: 0,
                holes_scored: team.holes,
            })
            .collect();

        let mode = self.engine.mode();
        entries.sort_by(|a, b| rank_order(mode, a, b));
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.position = index as u32 + 1;
        }

        debug!(
            teams = entries.len(),
            has_missing_scores, "Standings aggregated"
        );

        Standings {
            scoring_mode: mode,
            entries,
            has_missing_scores,
            holes: breakdown,
        }
    }
}

/// Stroke play: fewest strokes first. Points modes: most points first, fewest
/// strokes breaking ties. Remaining ties keep team id order (the sort is stable).
fn rank_order(mode: ScoringMode, a: &StandingEntry, b: &StandingEntry) -> Ordering {
    if mode.ranks_by_points() {
        b.total_points
            .cmp(&a.total_points)
            .then(a.total_strokes.cmp(&b.total_strokes))
    } else {
        a.total_strokes.cmp(&b.total_strokes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: TeamId = 1;
    const B: TeamId = 2;
    const C: TeamId = 3;

    fn hole(played_hole_id: i64, position: i32, strokes: &[(TeamId, u32)]) -> HoleScores {
        HoleScores {
            played_hole_id,
            position,
            strokes: strokes.iter().copied().collect(),
        }
    }

    fn aggregator(mode: ScoringMode) -> StandingsAggregator {
        StandingsAggregator::new(ScoringEngine::new(mode))
    }

    fn summary(standings: &Standings) -> Vec<(TeamId, u64, u64, u32)> {
        standings
            .entries
            .iter()
            .map(|e| (e.team_id, e.total_points, e.total_strokes, e.position))
            .collect()
    }

    #[test]
    fn redistribution_two_hole_scenario() {
        let holes = vec![
            hole(10, 1, &[(A, 4), (B, 4), (C, 6)]),
            hole(11, 2, &[(A, 3), (B, 5), (C, 5)]),
        ];

        let standings = aggregator(ScoringMode::Redistribution).aggregate(3, &holes);

        assert_eq!(
            summary(&standings),
            vec![(A, 3, 7, 1), (B, 1, 9, 2), (C, 0, 11, 3)]
        );
        assert!(!standings.has_missing_scores);
        assert_eq!(standings.holes[0].points.get(C), Some(0));
        assert_eq!(standings.holes[1].points.get(A), Some(2));
    }

    #[test]
    fn stroke_play_ranks_fewest_strokes_first() {
        let holes = vec![
            hole(1, 1, &[(A, 5), (B, 3), (C, 4)]),
            hole(2, 2, &[(A, 4), (B, 4), (C, 4)]),
        ];

        let standings = aggregator(ScoringMode::StrokePlay).aggregate(3, &holes);

        assert_eq!(
            summary(&standings),
            vec![(B, 7, 7, 1), (C, 8, 8, 2), (A, 9, 9, 3)]
        );
    }

    #[test]
    fn stroke_play_points_equal_strokes() {
        let holes = vec![hole(1, 1, &[(A, 5), (B, 3)]), hole(2, 2, &[(A, 2)])];

        let standings = aggregator(ScoringMode::StrokePlay).aggregate(2, &holes);

        for entry in &standings.entries {
            assert_eq!(entry.total_points, entry.total_strokes);
        }
    }

    #[test]
    fn ties_get_sequential_positions_in_team_order() {
        let holes = vec![hole(1, 1, &[(C, 4), (A, 4), (B, 4)])];

        let standings = aggregator(ScoringMode::StrokePlay).aggregate(3, &holes);

        let positions: Vec<(TeamId, u32)> = standings
            .entries
            .iter()
            .map(|e| (e.team_id, e.position))
            .collect();
        assert_eq!(positions, vec![(A, 1), (B, 2), (C, 3)]);
    }

    #[test]
    fn points_ties_broken_by_fewer_strokes() {
        // A and B each win one hole; B needs fewer strokes overall
        let holes = vec![
            hole(1, 1, &[(A, 3), (B, 4)]),
            hole(2, 2, &[(A, 6), (B, 2)]),
        ];

        let standings = aggregator(ScoringMode::MatchPlay).aggregate(2, &holes);

        assert_eq!(summary(&standings), vec![(B, 1, 6, 1), (A, 1, 9, 2)]);
    }

    #[test]
    fn missing_record_marks_standings_provisional() {
        let holes = vec![
            hole(1, 1, &[(A, 3), (B, 4), (C, 5)]),
            hole(2, 2, &[(A, 3), (C, 5)]),
        ];

        let standings = aggregator(ScoringMode::MatchPlay).aggregate(3, &holes);

        assert!(standings.has_missing_scores);
        assert!(standings.holes[0].is_complete);
        assert!(!standings.holes[1].is_complete);
        assert_eq!(standings.entries.len(), 3);
    }

    #[test]
    fn hole_without_records_is_incomplete() {
        let holes = vec![hole(1, 1, &[(A, 3), (B, 4)]), hole(2, 2, &[])];

        let standings = aggregator(ScoringMode::Redistribution).aggregate(2, &holes);

        assert!(standings.has_missing_scores);
    }

    #[test]
    fn teams_without_records_are_not_ranked() {
        let holes = vec![hole(1, 1, &[(A, 3), (B, 4)])];

        let standings = aggregator(ScoringMode::Redistribution).aggregate(3, &holes);

        assert_eq!(standings.entries.len(), 2);
        assert!(standings.entries.iter().all(|e| e.team_id != C));
    }

    #[test]
    fn no_holes_means_empty_complete_table() {
        let standings = aggregator(ScoringMode::MatchPlay).aggregate(4, &[]);

        assert!(standings.entries.is_empty());
        assert!(!standings.has_missing_scores);
    }

    #[test]
    fn breakdown_follows_hole_position_not_input_order() {
        let holes = vec![
            hole(7, 3, &[(A, 3)]),
            hole(5, 1, &[(A, 4)]),
            hole(6, 2, &[(A, 5)]),
        ];

        let standings = aggregator(ScoringMode::StrokePlay).aggregate(1, &holes);

        let positions: Vec<i32> = standings.holes.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn large_stroke_counts_sum_without_wrapping() {
        let big = u32::MAX - 1;
        let holes = vec![
            hole(1, 1, &[(A, big), (B, 3)]),
            hole(2, 2, &[(A, big), (B, 4)]),
            hole(3, 3, &[(A, big), (B, 5)]),
        ];

        let standings = aggregator(ScoringMode::StrokePlay).aggregate(2, &holes);

        let expected = 3 * u64::from(big);
        assert_eq!(
            summary(&standings),
            vec![(B, 12, 12, 1), (A, expected, expected, 2)]
        );
    }

    #[test]
    fn repeated_aggregation_is_identical() {
        let holes = vec![
            hole(1, 1, &[(A, 4), (B, 4), (C, 6)]),
            hole(2, 2, &[(A, 5), (B, 3), (C, 3)]),
            hole(3, 3, &[(A, 2), (B, 7), (C, 4)]),
        ];

        for mode in ScoringMode::catalog() {
            let standings = aggregator(mode);
            let first = standings.aggregate(3, &holes);
            let second = standings.aggregate(3, &holes);
            assert_eq!(first, second);
        }
    }
}
