use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Unknown scoring mode: {0}")]
    UnknownScoringMode(i32),

    #[error("Duplicate score records for played hole {played_hole_id} and team {team_id}")]
    DuplicateSubmission { played_hole_id: i64, team_id: i64 },
}
