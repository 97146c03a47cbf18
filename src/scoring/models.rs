use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ScoringError, TeamId};

/// Strokes submitted for one played hole, keyed by team.
///
/// Teams that have not submitted yet are absent, never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleStrokes(BTreeMap<TeamId, u32>);

impl HoleStrokes {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds the stroke table for a hole, refusing a second record for the same team.
    pub fn from_records(
        played_hole_id: i64,
        records: impl IntoIterator<Item = (TeamId, u32)>,
    ) -> Result<Self, ScoringError> {
        let mut strokes = BTreeMap::new();
        for (team_id, value) in records {
            if strokes.insert(team_id, value).is_some() {
                return Err(ScoringError::DuplicateSubmission {
                    played_hole_id,
                    team_id,
                });
            }
        }
        Ok(Self(strokes))
    }

    pub fn get(&self, team_id: TeamId) -> Option<u32> {
        self.0.get(&team_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, u32)> + '_ {
        self.0.iter().map(|(team_id, strokes)| (*team_id, *strokes))
    }

    /// Groups teams by equal stroke count, lowest strokes first.
    /// Teams inside a group are ordered by id.
    pub fn groups(&self) -> Vec<Vec<TeamId>> {
        let mut by_strokes: BTreeMap<u32, Vec<TeamId>> = BTreeMap::new();
        for (team_id, strokes) in self.iter() {
            by_strokes.entry(strokes).or_default().push(team_id);
        }
        by_strokes.into_values().collect()
    }
}

impl FromIterator<(TeamId, u32)> for HoleStrokes {
    fn from_iter<I: IntoIterator<Item = (TeamId, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Points awarded on one played hole, over the same team set as its [`HoleStrokes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolePoints(BTreeMap<TeamId, u32>);

impl HolePoints {
    /// Every scored team starts at zero points.
    pub fn zeroed(strokes: &HoleStrokes) -> Self {
        Self(strokes.iter().map(|(team_id, _)| (team_id, 0)).collect())
    }

    pub fn award(&mut self, team_id: TeamId, points: u32) {
        *self.0.entry(team_id).or_default() += points;
    }

    pub fn get(&self, team_id: TeamId) -> Option<u32> {
        self.0.get(&team_id).copied()
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, u32)> + '_ {
        self.0.iter().map(|(team_id, points)| (*team_id, *points))
    }
}

impl FromIterator<(TeamId, u32)> for HolePoints {
    fn from_iter<I: IntoIterator<Item = (TeamId, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
