use super::super::{HolePoints, HoleStrokes, ScoringMode, ScoringRule};
use super::award_first_place;

/// Podium scoring without a runner-up bonus: a sole winner takes 2 points, a
/// two-way tie for first takes 1 point each, a wider tie voids the hole.
pub struct NoSecondPlaceRule;

impl ScoringRule for NoSecondPlaceRule {
    fn score_hole(&self, strokes: &HoleStrokes) -> HolePoints {
        let mut points = HolePoints::zeroed(strokes);
        award_first_place(&strokes.groups(), &mut points);
        points
    }

    fn mode(&self) -> ScoringMode {
        ScoringMode::NoSecondPlace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![(1, 3), (2, 4), (3, 5)], vec![(1, 2), (2, 0), (3, 0)])]
    #[case(vec![(1, 3), (2, 3), (3, 5)], vec![(1, 1), (2, 1), (3, 0)])]
    #[case(vec![(1, 3), (2, 3), (3, 3)], vec![(1, 0), (2, 0), (3, 0)])]
    #[case(vec![(1, 3), (2, 4), (3, 4)], vec![(1, 2), (2, 0), (3, 0)])]
    #[case(vec![(1, 5)], vec![(1, 2)])]
    fn awards_first_place_only(
        #[case] input: Vec<(i64, u32)>,
        #[case] expected: Vec<(i64, u32)>,
    ) {
        let strokes: HoleStrokes = input.into_iter().collect();
        let expected: HolePoints = expected.into_iter().collect();

        assert_eq!(NoSecondPlaceRule.score_hole(&strokes), expected);
    }

    #[test]
    fn solo_runner_up_gets_nothing() {
        let strokes: HoleStrokes = [(1, 3), (2, 4), (3, 5)].into_iter().collect();

        assert_eq!(NoSecondPlaceRule.score_hole(&strokes).get(2), Some(0));
    }
}
