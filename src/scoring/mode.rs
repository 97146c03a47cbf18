use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use super::rules::{MatchPlayRule, NoSecondPlaceRule, RedistributionRule, StrokePlayRule};
use super::{ScoringError, ScoringRule};

static STROKE_PLAY: StrokePlayRule = StrokePlayRule;
static MATCH_PLAY: MatchPlayRule = MatchPlayRule;
static NO_SECOND_PLACE: NoSecondPlaceRule = NoSecondPlaceRule;
static REDISTRIBUTION: RedistributionRule = RedistributionRule;

/// Session-wide scoring mode catalog. Discriminants are the persisted ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    #[strum(to_string = "Stroke Play")]
    StrokePlay = 1,
    #[strum(to_string = "Match Play")]
    MatchPlay = 2,
    #[strum(to_string = "No Second Place")]
    NoSecondPlace = 3,
    #[strum(to_string = "Redistribution")]
    Redistribution = 4,
}

impl ScoringMode {
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Stroke play ranks on raw strokes, every other mode on points.
    pub fn ranks_by_points(self) -> bool {
        !matches!(self, ScoringMode::StrokePlay)
    }

    pub fn rule(self) -> &'static dyn ScoringRule {
        match self {
            ScoringMode::StrokePlay => &STROKE_PLAY,
            ScoringMode::MatchPlay => &MATCH_PLAY,
            ScoringMode::NoSecondPlace => &NO_SECOND_PLACE,
            ScoringMode::Redistribution => &REDISTRIBUTION,
        }
    }

    pub fn catalog() -> Vec<ScoringMode> {
        ScoringMode::iter().collect()
    }
}

impl TryFrom<i32> for ScoringMode {
    type Error = ScoringError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        ScoringMode::iter()
            .find(|mode| mode.id() == id)
            .ok_or(ScoringError::UnknownScoringMode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, ScoringMode::StrokePlay)]
    #[case(2, ScoringMode::MatchPlay)]
    #[case(3, ScoringMode::NoSecondPlace)]
    #[case(4, ScoringMode::Redistribution)]
    fn resolves_known_ids(#[case] id: i32, #[case] expected: ScoringMode) {
        assert_eq!(ScoringMode::try_from(id), Ok(expected));
        assert_eq!(expected.id(), id);
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(-1)]
    fn unknown_ids_fail_closed(#[case] id: i32) {
        assert_eq!(
            ScoringMode::try_from(id),
            Err(ScoringError::UnknownScoringMode(id))
        );
    }

    #[test]
    fn catalog_lists_modes_in_id_order() {
        let ids: Vec<i32> = ScoringMode::catalog().into_iter().map(ScoringMode::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn display_names() {
        assert_eq!(ScoringMode::StrokePlay.to_string(), "Stroke Play");
        assert_eq!(ScoringMode::NoSecondPlace.to_string(), "No Second Place");
    }

    #[test]
    fn each_mode_selects_its_own_rule() {
        for mode in ScoringMode::catalog() {
            assert_eq!(mode.rule().mode(), mode);
        }
    }
}
