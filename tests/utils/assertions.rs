use hole_scores::Standings;

use super::setup::TestSetup;

// ============================================================================
// Standings Assertions
// ============================================================================

/// Fluent checks over a standings table, addressing teams by declaration index
pub struct StandingsAssertion<'a> {
    setup: &'a TestSetup,
    standings: Standings,
}

impl<'a> StandingsAssertion<'a> {
    pub async fn for_session(setup: &'a TestSetup) -> Self {
        let standings = setup.standings().await;
        Self { setup, standings }
    }

    /// Expects teams in this finishing order
    pub fn ranked(self, team_indexes: &[usize]) -> Self {
        let actual: Vec<i64> = self
            .standings
            .entries
            .iter()
            .map(|entry| entry.team_id)
            .collect();
        let expected: Vec<i64> = team_indexes
            .iter()
            .map(|index| self.setup.team_ids[*index])
            .collect();
        assert_eq!(actual, expected, "unexpected finishing order");

        let positions: Vec<u32> = self.standings.entries.iter().map(|e| e.position).collect();
        let sequential: Vec<u32> = (1..=positions.len() as u32).collect();
        assert_eq!(positions, sequential, "positions must be gapless");
        self
    }

    pub fn team_totals(self, team_index: usize, points: u64, strokes: u64) -> Self {
        let team_id = self.setup.team_ids[team_index];
        let entry = self
            .standings
            .entries
            .iter()
            .find(|entry| entry.team_id == team_id)
            .unwrap_or_else(|| panic!("team {} has no standing", team_index));
        assert_eq!(
            (entry.total_points, entry.total_strokes),
            (points, strokes),
            "totals for team {}",
            team_index
        );
        self
    }

    pub fn complete(self) -> Self {
        assert!(!self.standings.has_missing_scores, "expected final standings");
        self
    }

    pub fn provisional(self) -> Self {
        assert!(self.standings.has_missing_scores, "expected provisional standings");
        self
    }
}
