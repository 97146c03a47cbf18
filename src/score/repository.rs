use async_trait::async_trait;

use super::models::{ScoreRecordModel, ScoreSubmission, Scorecard};
use crate::shared::AppError;

/// Score submission gateway.
///
/// Submissions are upserts keyed by `(played_hole_id, team_id)`: a resubmission
/// replaces the stored record (keeping its id) and never adds a second row.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Fails with `NotFound` for an unknown hole or a team outside the hole's
    /// session, and with `InvalidStateTransition` once the session is closed.
    async fn upsert_score(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<ScoreRecordModel, AppError>;

    /// Reads a session and everything scored in it as one consistent view.
    /// `None` when the session does not exist.
    async fn load_scorecard(&self, session_id: i64) -> Result<Option<Scorecard>, AppError>;

    /// Ordered by team id
    async fn list_hole_scores(
        &self,
        played_hole_id: i64,
    ) -> Result<Vec<ScoreRecordModel>, AppError>;
}
