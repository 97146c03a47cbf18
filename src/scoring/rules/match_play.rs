use super::super::{HolePoints, HoleStrokes, ScoringMode, ScoringRule};

/// A unique lowest score wins the hole for 1 point. A shared lowest score halves it
/// and nobody scores.
pub struct MatchPlayRule;

impl ScoringRule for MatchPlayRule {
    fn score_hole(&self, strokes: &HoleStrokes) -> HolePoints {
        let mut points = HolePoints::zeroed(strokes);

        if let Some([winner]) = strokes.groups().first().map(Vec::as_slice) {
            points.award(*winner, 1);
        }

        points
    }

    fn mode(&self) -> ScoringMode {
        ScoringMode::MatchPlay
    }
}
