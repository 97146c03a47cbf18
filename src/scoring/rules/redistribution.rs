use super::super::{HolePoints, HoleStrokes, ScoringMode, ScoringRule};
use super::award_first_place;

/// Podium scoring with a runner-up bonus. First place is scored as in
/// [`NoSecondPlaceRule`](super::NoSecondPlaceRule). When a sole winner is followed
/// by a single team on the next-lowest score, that team earns 1 point. A two-way tie
/// for first already fills both podium places, so no bonus is paid behind it.
pub struct RedistributionRule;

impl ScoringRule for RedistributionRule {
    fn score_hole(&self, strokes: &HoleStrokes) -> HolePoints {
        let mut points = HolePoints::zeroed(strokes);
        let groups = strokes.groups();

        award_first_place(&groups, &mut points);

        if let [first, second, ..] = groups.as_slice() {
            if first.len() == 1 && second.len() == 1 {
                points.award(second[0], 1);
            }
        }

        points
    }

    fn mode(&self) -> ScoringMode {
        ScoringMode::Redistribution
    }
}
