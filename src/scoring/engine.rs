use tracing::{debug, instrument};

use super::{HolePoints, HoleStrokes, ScoringError, ScoringMode, ScoringRule};

/// Applies the rule of a session's scoring mode to individual holes.
#[derive(Clone, Copy)]
pub struct ScoringEngine {
    mode: ScoringMode,
    rule: &'static dyn ScoringRule,
}

impl ScoringEngine {
    pub fn new(mode: ScoringMode) -> Self {
        Self {
            mode,
            rule: mode.rule(),
        }
    }

    /// Resolves a persisted scoring mode id. Unknown ids are refused rather than
    /// defaulted to some other mode.
    pub fn for_mode_id(scoring_mode_id: i32) -> Result<Self, ScoringError> {
        ScoringMode::try_from(scoring_mode_id).map(Self::new)
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    #[instrument(skip(self, strokes), fields(mode = %self.mode, teams = strokes.len()))]
    pub fn score_hole(&self, strokes: &HoleStrokes) -> HolePoints {
        let points = self.rule.score_hole(strokes);
        debug!(awarded = points.total(), "Hole scored");
        points
    }
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("mode", &self.mode)
            .finish()
    }
}
