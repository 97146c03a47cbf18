pub mod engine;
pub mod mode;
pub mod models;
pub mod rules;
pub mod standings;

mod errors;

pub use engine::ScoringEngine;
pub use errors::ScoringError;
pub use mode::ScoringMode;
pub use models::{HolePoints, HoleStrokes};
pub use standings::{HoleBreakdown, HoleScores, StandingEntry, Standings, StandingsAggregator};

pub type TeamId = i64;

/// Converts the strokes of one played hole into points.
///
/// Implementations are pure: the same strokes always yield the same points, and
/// the output covers exactly the teams present in the input.
pub trait ScoringRule: Send + Sync {
    fn score_hole(&self, strokes: &HoleStrokes) -> HolePoints;

    fn mode(&self) -> ScoringMode;
}
