use super::super::{HolePoints, HoleStrokes, ScoringMode, ScoringRule};

/// Points are the raw strokes; lower is better.
pub struct StrokePlayRule;

impl ScoringRule for StrokePlayRule {
    fn score_hole(&self, strokes: &HoleStrokes) -> HolePoints {
        strokes.iter().collect()
    }

    fn mode(&self) -> ScoringMode {
        ScoringMode::StrokePlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![(1, 3), (2, 4), (3, 5)])]
    #[case(vec![(1, 4), (2, 4)])]
    #[case(vec![(1, 0)])]
    #[case(vec![])]
    fn points_equal_strokes(#[case] input: Vec<(i64, u32)>) {
        let strokes: HoleStrokes = input.into_iter().collect();

        let points = StrokePlayRule.score_hole(&strokes);

        assert_eq!(points.len(), strokes.len());
        for (team_id, value) in strokes.iter() {
            assert_eq!(points.get(team_id), Some(value));
        }
    }
}
